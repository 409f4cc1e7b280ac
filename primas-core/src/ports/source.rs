//! Report source port
//!
//! Defines the interface for reading the raw business-report table from
//! wherever the operations team drops it (Excel workbook, CSV export,
//! in-memory fixture). The ingestion pipeline and cache manager consume this
//! trait without knowing the concrete source.

use chrono::NaiveDateTime;
use std::time::SystemTime;

use crate::domain::result::Result;

/// One raw cell, preserving whatever type the source reader produced.
///
/// Keeping native numbers and datetimes distinct from text lets the value
/// normalizers short-circuit already-typed cells instead of re-parsing a
/// lossy string rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    Bool(bool),
}

impl CellValue {
    /// Trimmed text rendering of the cell, empty string for `Empty`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => {
                // Integral floats render without the trailing ".0" so
                // consecutivo/poliza numbers read like the source shows them
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// Whether the cell holds nothing useful.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// The raw table exactly as read: untrusted headers plus row cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Report source trait
///
/// Implementations read one named sheet/table from the externally-maintained
/// source file. The source is read-only from this subsystem's perspective;
/// external writes are only detected through `modified_at`.
pub trait ReportSource: Send + Sync {
    /// Source name for logs (e.g. "excel", "csv", "mock")
    fn name(&self) -> &str;

    /// Modification time of the backing file.
    ///
    /// Returns `SourceUnavailable` when the file is gone.
    fn modified_at(&self) -> Result<SystemTime>;

    /// Read the full table.
    ///
    /// A missing file or unreadable workbook is fatal (`SourceUnavailable`);
    /// malformed individual cells are not — they surface as odd `CellValue`s
    /// for the normalizers to degrade.
    fn read_table(&self) -> Result<RawTable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(CellValue::Empty.as_text(), "");
        assert_eq!(CellValue::Text("  hola  ".to_string()).as_text(), "hola");
        assert_eq!(CellValue::Number(88421.0).as_text(), "88421");
        assert_eq!(CellValue::Number(12.5).as_text(), "12.5");
    }

    #[test]
    fn test_cell_emptiness() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::Text("   ".to_string()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }
}
