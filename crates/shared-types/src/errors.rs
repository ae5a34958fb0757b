//! # Error Types
//!
//! Errors raised while parsing primitive values.

use thiserror::Error;

/// Errors that can occur when parsing an `Address` or `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The input was not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The decoded byte length did not match the target type.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
