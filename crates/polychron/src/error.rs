//! Error types for polychron operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Field out of range: {0}")]
    OutOfRange(String),

    #[error("Calendar mismatch: {left} vs {right}")]
    CalendarMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("Unsupported date: {0}")]
    UnsupportedDate(String),

    #[error("Unsupported unit: {0}")]
    UnsupportedUnit(&'static str),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(&'static str),

    #[error("Unknown serialization tag: {0}")]
    UnknownTag(u8),

    #[error("Malformed stream: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, CalendarError>;
