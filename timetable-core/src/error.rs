//! Error types for the timetable workspace.

use thiserror::Error;

/// Errors that can occur in timetable operations.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Invalid day: {0}")]
    InvalidDay(String),

    #[error("Outside of the visible week: {0}")]
    OutOfView(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TimetableError {
    fn from(err: serde_json::Error) -> Self {
        TimetableError::Serialization(err.to_string())
    }
}

/// Result type alias for timetable operations.
pub type TimetableResult<T> = Result<T, TimetableError>;
