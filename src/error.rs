// Crate-wide error type
//
// Per-record and per-row problems during imports are NOT errors: they are
// collected as messages next to the counters in the import results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogbookError {
    /// Caller passed a value outside the accepted domain (grid codec)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unable to parse date: {0}")]
    InvalidDate(String),

    #[error("Unable to parse time: {0}")]
    InvalidTime(String),

    #[error("Unable to parse date/time: {0}")]
    InvalidDateTime(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid CSV mapping: {0}")]
    Mapping(#[from] crate::import::MappingError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LogbookError>;
