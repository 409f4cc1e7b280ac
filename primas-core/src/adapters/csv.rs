//! CSV report source
//!
//! Some branches still hand over the report as a plain CSV export. Cells
//! arrive as text; the value normalizers handle the typing.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use csv::ReaderBuilder;

use crate::domain::result::{Error, Result};
use crate::ports::{CellValue, RawTable, ReportSource};

pub struct CsvReportSource {
    path: PathBuf,
}

impl CsvReportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSource for CsvReportSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn modified_at(&self) -> Result<SystemTime> {
        let meta = std::fs::metadata(&self.path)
            .map_err(|e| Error::source_unavailable(format!("{}: {}", self.path.display(), e)))?;
        meta.modified().map_err(Error::Io)
    }

    fn read_table(&self) -> Result<RawTable> {
        let file = File::open(&self.path)
            .map_err(|e| Error::source_unavailable(format!("{}: {}", self.path.display(), e)))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // export rows are not always the same width
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::source_unavailable(format!("{}: {}", self.path.display(), e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result
                .map_err(|e| Error::source_unavailable(format!("{}: {}", self.path.display(), e)))?;

            let cells: Vec<CellValue> = record
                .iter()
                .map(|value| {
                    let t = value.trim();
                    if t.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(t.to_string())
                    }
                })
                .collect();

            if cells.iter().all(CellValue::is_empty) {
                continue;
            }
            rows.push(cells);
        }

        Ok(RawTable { headers, rows })
    }
}
