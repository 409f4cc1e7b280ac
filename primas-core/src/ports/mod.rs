//! Trait definitions for external dependencies

mod source;

pub use source::{CellValue, RawTable, ReportSource};
