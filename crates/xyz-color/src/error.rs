//! Color error types.

use thiserror::Error;

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;

/// Errors raised by matrix selection and row conversion.
#[derive(Debug, Error)]
pub enum ColorError {
    /// Matrix name not among the fixed variants.
    #[error("unknown color matrix '{0}' (expected identity, smpte or stem)")]
    UnknownMatrix(String),

    /// Gamma strategy name not recognized.
    #[error("unknown gamma strategy '{0}' (expected lut or power)")]
    UnknownStrategy(String),

    /// Input/output row buffers do not match the pixel count.
    #[error(transparent)]
    Row(#[from] xyz_core::Error),
}
