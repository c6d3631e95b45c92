//! Typed errors for the tail core. The application layer wraps these in `anyhow`.

use std::num::ParseIntError;

use thiserror::Error;

/// `--since` could not be read as a relative duration or an absolute timestamp.
#[derive(Debug, Error)]
#[error("invalid time value {input:?}: {cause}")]
pub struct ParseError {
    pub input: String,
    #[source]
    pub cause: ParseCause,
}

impl ParseError {
    pub fn new(input: &str, cause: ParseCause) -> Self {
        Self {
            input: input.to_string(),
            cause,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseCause {
    #[error("malformed duration")]
    InvalidDuration,
    #[error("malformed timestamp")]
    InvalidTimestamp(#[source] chrono::ParseError),
    #[error("malformed zone offset {0:?}")]
    InvalidOffset(String),
    #[error("not a duration, timestamp or unix time")]
    InvalidUnix(#[source] ParseIntError),
    #[error("value out of range")]
    OutOfRange,
}

/// Failures that end a tail session.
#[derive(Debug, Error)]
pub enum TailError {
    #[error("failed to get logs")]
    Query(#[source] anyhow::Error),
}
