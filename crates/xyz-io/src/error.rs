//! Error types for scanline I/O.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but is not a readable TIFF.
    #[error("invalid TIFF: {0}")]
    BadFormat(String),

    /// A scanline could not be read (truncated or corrupt strip, or past the
    /// last row).
    #[error("no data for row {row}: {reason}")]
    EndOfData {
        /// Row that failed.
        row: u32,
        /// Decoder message.
        reason: String,
    },

    /// Writing or encoding the output failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Bits per sample other than 8 or 16.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// Tag values or sample buffers do not agree with the image layout.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
}

impl IoError {
    /// Shorthand for [`IoError::EndOfData`].
    pub fn end_of_data(row: u32, reason: impl Into<String>) -> Self {
        Self::EndOfData {
            row,
            reason: reason.into(),
        }
    }
}

impl From<xyz_core::Error> for IoError {
    fn from(err: xyz_core::Error) -> Self {
        match err {
            xyz_core::Error::UnsupportedBitDepth(bits) => Self::UnsupportedBitDepth(bits),
            other => Self::InvalidMetadata(other.to_string()),
        }
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
