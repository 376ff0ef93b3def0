//! Error types for zonecal.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::time::format_date_time;

/// Errors that can occur in zonecal operations.
///
/// Every variant is local to one command: callers render the message and keep going.
#[derive(Error, Debug)]
pub enum CalError {
    #[error("Event already exists: {subject} at {}", format_date_time(.start))]
    DuplicateEvent {
        subject: String,
        start: NaiveDateTime,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Calendar with name {0} already exists")]
    AlreadyExists(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for zonecal operations.
pub type CalResult<T> = Result<T, CalError>;
