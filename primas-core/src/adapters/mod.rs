//! Concrete implementations of the ports

mod csv;
mod estados;
mod excel;
mod metas;
pub mod mock;

use std::path::Path;
use std::sync::Arc;

pub use csv::CsvReportSource;
pub use estados::EstadoOverrides;
pub use excel::ExcelReportSource;
pub use metas::MetasStore;
pub use mock::MockReportSource;

use crate::domain::result::{Error, Result};
use crate::ports::ReportSource;

/// Pick the report source by file extension (xlsx/xls via calamine, csv via
/// the csv crate).
pub fn source_for_path(path: &Path, sheet: &str) -> Result<Arc<dyn ReportSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => Ok(Arc::new(ExcelReportSource::new(path, sheet))),
        "csv" => Ok(Arc::new(CsvReportSource::new(path))),
        other => Err(Error::config(format!(
            "unsupported source extension '{}' for {} (expected .xlsx/.xls/.csv)",
            other,
            path.display()
        ))),
    }
}
