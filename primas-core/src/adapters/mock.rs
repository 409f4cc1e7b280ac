//! Mock report source for testing
//!
//! An in-memory [`ReportSource`] with a swappable table, a bumpable
//! modification time, failure injection, and a read counter. Cache tests use
//! the counter to prove when a rebuild actually touched the source.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::domain::result::{Error, Result};
use crate::ports::{CellValue, RawTable, ReportSource};

pub struct MockReportSource {
    table: Mutex<RawTable>,
    mtime: Mutex<SystemTime>,
    fail_read: AtomicBool,
    missing: AtomicBool,
    reads: AtomicUsize,
}

impl MockReportSource {
    pub fn new(table: RawTable) -> Self {
        // start in the past so a snapshot persisted right after construction
        // reads as fresh until someone touches the source
        let mtime = SystemTime::now()
            .checked_sub(Duration::from_secs(60))
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Self {
            table: Mutex::new(table),
            mtime: Mutex::new(mtime),
            fail_read: AtomicBool::new(false),
            missing: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
        }
    }

    /// Convenience constructor from header strings and text rows.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        let table = RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|v| {
                            let t = v.trim();
                            if t.is_empty() {
                                CellValue::Empty
                            } else {
                                CellValue::Text(t.to_string())
                            }
                        })
                        .collect()
                })
                .collect(),
        };
        Self::new(table)
    }

    /// Replace the table and advance the modification time, simulating an
    /// external writer touching the source file.
    pub fn set_table(&self, table: RawTable) {
        *self.table.lock().unwrap() = table;
        self.touch();
    }

    /// Advance the modification time past anything written so far.
    pub fn touch(&self) {
        let mut mtime = self.mtime.lock().unwrap();
        *mtime = SystemTime::now()
            .checked_add(Duration::from_secs(2))
            .unwrap_or_else(SystemTime::now);
    }

    /// Make subsequent reads fail as if the file disappeared mid-rebuild.
    pub fn set_fail_read(&self, fail: bool) {
        self.fail_read.store(fail, Ordering::SeqCst);
    }

    /// Make the whole source vanish (metadata included).
    pub fn set_missing(&self, missing: bool) {
        self.missing.store(missing, Ordering::SeqCst);
    }

    /// How many times the table has actually been read.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ReportSource for MockReportSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn modified_at(&self) -> Result<SystemTime> {
        if self.missing.load(Ordering::SeqCst) {
            return Err(Error::source_unavailable("mock source marked missing"));
        }
        Ok(*self.mtime.lock().unwrap())
    }

    fn read_table(&self) -> Result<RawTable> {
        if self.missing.load(Ordering::SeqCst) || self.fail_read.load(Ordering::SeqCst) {
            return Err(Error::source_unavailable("mock source marked unreadable"));
        }
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_counter() {
        let source = MockReportSource::from_rows(&["A"], &[&["1"]]);
        assert_eq!(source.read_count(), 0);
        source.read_table().unwrap();
        source.read_table().unwrap();
        assert_eq!(source.read_count(), 2);
    }

    #[test]
    fn test_touch_advances_mtime() {
        let source = MockReportSource::from_rows(&["A"], &[]);
        let before = source.modified_at().unwrap();
        source.touch();
        assert!(source.modified_at().unwrap() > before);
    }

    #[test]
    fn test_failure_injection() {
        let source = MockReportSource::from_rows(&["A"], &[]);
        source.set_fail_read(true);
        assert!(matches!(
            source.read_table().unwrap_err(),
            Error::SourceUnavailable(_)
        ));
        // metadata still answers while only reads fail
        assert!(source.modified_at().is_ok());

        source.set_missing(true);
        assert!(source.modified_at().is_err());
    }
}
