//! Transport-level protocol errors.

use thiserror::Error;

/// Errors raised while framing or decoding the byte stream.
///
/// These are transport errors: any of them terminates the offending
/// connection. Command-level problems (unknown verb, wrong arity) are
/// recoverable and live in [`crate::command::CommandError`] instead.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line too long: {actual} bytes exceeds limit of {limit}")]
    LineTooLong { actual: usize, limit: usize },

    #[error("invalid UTF-8 at byte {byte_pos}: {details}")]
    InvalidUtf8 { byte_pos: usize, details: String },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
