//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while building lookup tables.
#[derive(Debug, Error, PartialEq)]
pub enum LutError {
    /// Gamma exponent is zero, negative or not finite.
    #[error("invalid gamma {0}: exponent must be a positive finite number")]
    InvalidGamma(f32),
}
