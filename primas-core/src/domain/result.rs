//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Only pipeline-fatal conditions become errors. A single unparseable cell
/// is not an error — see [`crate::normalize::Parsed`] for the degraded path.
#[derive(Error, Debug)]
pub enum Error {
    /// The source workbook is missing or unreadable at rebuild time.
    /// The previous snapshot (memory and disk) stays usable.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// No raw header reconciled to the mandatory expedition-date field.
    #[error("Schema incomplete: {0}")]
    SchemaIncomplete(String),

    /// The persisted snapshot could not be read or decoded. Recoverable:
    /// the cache manager falls back to a full rebuild.
    #[error("Snapshot corrupt: {0}")]
    SnapshotCorrupt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a source-unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Create a schema-incomplete error
    pub fn schema_incomplete(msg: impl Into<String>) -> Self {
        Self::SchemaIncomplete(msg.into())
    }

    /// Create a snapshot-corrupt error
    pub fn snapshot_corrupt(msg: impl Into<String>) -> Self {
        Self::SnapshotCorrupt(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::source_unavailable("no such file: reporte.xlsx");
        assert!(err.to_string().contains("Source unavailable"));

        let err = Error::schema_incomplete("no expedition date header");
        assert!(err.to_string().contains("Schema incomplete"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
