//! Excel report source
//!
//! Reads one named sheet from the operations workbook with `calamine`.
//! Native Excel types are preserved into [`CellValue`] so the normalizers
//! can short-circuit real numbers and datetimes instead of re-parsing text.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use calamine::{open_workbook_auto, Data, DataType, Reader};

use crate::domain::result::{Error, Result};
use crate::ports::{CellValue, RawTable, ReportSource};

pub struct ExcelReportSource {
    path: PathBuf,
    sheet: String,
}

impl ExcelReportSource {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for ExcelReportSource {
    fn name(&self) -> &str {
        "excel"
    }

    fn modified_at(&self) -> Result<SystemTime> {
        let meta = std::fs::metadata(&self.path)
            .map_err(|e| Error::source_unavailable(format!("{}: {}", self.path.display(), e)))?;
        meta.modified().map_err(Error::Io)
    }

    fn read_table(&self) -> Result<RawTable> {
        if !self.path.exists() {
            return Err(Error::source_unavailable(format!(
                "workbook not found: {}",
                self.path.display()
            )));
        }

        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| Error::source_unavailable(format!("{}: {}", self.path.display(), e)))?;

        let range = workbook.worksheet_range(&self.sheet).map_err(|e| {
            Error::source_unavailable(format!(
                "sheet '{}' unreadable in {}: {}",
                self.sheet,
                self.path.display(),
                e
            ))
        })?;

        let mut rows_iter = range.rows();
        let header_row = rows_iter.next().ok_or_else(|| {
            Error::source_unavailable(format!("sheet '{}' has no header row", self.sheet))
        })?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in rows_iter {
            let cells: Vec<CellValue> = data_row.iter().map(to_cell).collect();
            // drop fully blank filler rows early
            if cells.iter().all(CellValue::is_empty) {
                continue;
            }
            rows.push(cells);
        }

        Ok(RawTable { headers, rows })
    }
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(t.to_string())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => data
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_workbook_is_source_unavailable() {
        let source = ExcelReportSource::new("/nonexistent/reporte.xlsx", "REPORTE");
        let err = source.read_table().unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));

        let err = source.modified_at().unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(to_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            to_cell(&Data::String("  ACME  ".to_string())),
            CellValue::Text("ACME".to_string())
        );
        assert_eq!(to_cell(&Data::Float(12.5)), CellValue::Number(12.5));
        assert_eq!(to_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(
            to_cell(&Data::String("   ".to_string())),
            CellValue::Empty
        );
    }
}
