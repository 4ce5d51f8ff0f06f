use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for cleaning operations.
pub type CleanResult<T> = Result<T, CleanError>;

/// Error type returned by clause parsing and the cleaning pipeline.
///
/// Every variant is fatal to the run; there is no partial recovery.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Underlying I/O error (permission denied, disk full, ...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error (malformed quoting, invalid UTF-8, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The `--where` text could not be split into `<column><op><value>`.
    #[error("invalid filter expression '{expression}': {reason}")]
    InvalidFilterExpression { expression: String, reason: String },

    /// The input path does not exist.
    #[error("input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The input contains no header record.
    #[error("missing header: input has no header row")]
    MissingHeader,

    /// One or more selected columns are not present in the header.
    #[error("selected columns not found: {} (available: {})", missing.join(", "), available.join(", "))]
    ColumnsNotFound {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// An operator symbol outside `==, !=, >=, <=, >, <`.
    #[error("unsupported operator: '{op}'")]
    UnsupportedOperator { op: String },

    /// The delimiter is not a single ASCII character.
    #[error("invalid delimiter '{raw}': expected a single ASCII character")]
    InvalidDelimiter { raw: String },
}
