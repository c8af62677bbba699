//! Error types for xyz-core operations.
//!
//! # Usage
//!
//! ```rust
//! use xyz_core::{BitDepth, Error};
//!
//! let err = BitDepth::from_bits(12).unwrap_err();
//! assert!(matches!(err, Error::UnsupportedBitDepth(12)));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while describing or allocating image data.
#[derive(Debug, Error)]
pub enum Error {
    /// Only 8 and 16 bits per sample are handled.
    #[error("unsupported bit depth: {0} bits/sample (expected 8 or 16)")]
    UnsupportedBitDepth(u16),

    /// Width, height or sample count cannot describe a raster.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// A buffer does not hold the number of samples a scanline needs.
    #[error("scanline size mismatch: expected {expected} samples, got {actual}")]
    ScanlineSize {
        /// Samples required by the spec
        expected: usize,
        /// Samples supplied
        actual: usize,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_message() {
        let err = Error::invalid_dimensions(0, 10, "width must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("0x10"));
        assert!(msg.contains("width must be > 0"));
    }

    #[test]
    fn test_scanline_size_message() {
        let err = Error::ScanlineSize { expected: 6, actual: 4 };
        assert!(err.to_string().contains("expected 6"));
    }
}
