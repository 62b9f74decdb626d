//! Error types for snp-fixtures

use thiserror::Error;

/// Result type alias for fixture generation and parsing
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Output file could not be created, written or measured
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited reader/writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Score matrix could not be shaped from the parsed rows
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// A data row of a Final Report is malformed.
    /// `line` is 1-based and counts header lines.
    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    /// Sequential ids or the row count of a panel do not fit in a `u64`
    #[error("Id overflow: {0}")]
    IdOverflow(String),

    #[error("Missing [Data] section")]
    MissingDataSection,

    #[error("Unknown format: {0}")]
    UnknownFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRow {
            line: 4,
            reason: "expected 11 fields, found 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid row at line 4: expected 11 fields, found 3"
        );
        assert_eq!(Error::MissingDataSection.to_string(), "Missing [Data] section");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
