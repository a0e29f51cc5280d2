//! Error types for zone lookups and DST classification.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneResolutionError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid UTC offset: {0} seconds")]
    InvalidOffset(i32),
}

pub type Result<T> = std::result::Result<T, ZoneResolutionError>;
