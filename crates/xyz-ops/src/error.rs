//! Error types for the conversion and diagnostics pipelines.

use thiserror::Error;
use tracing::warn;
use xyz_color::ColorError;
use xyz_core::Photometric;
use xyz_io::{IoError, ScanlineSink};
use xyz_lut::LutError;

/// Input rejected before any output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Bits per sample other than 8 or 16.
    #[error("image must have 8 or 16 bits per sample, found {0}")]
    BadBitDepth(u16),

    /// Photometric is not RGB, or fewer than three samples per pixel.
    #[error("image must have RGB data (photometric {photometric:?}, {samples} samples per pixel)")]
    NotRgb {
        /// Declared photometric interpretation.
        photometric: Photometric,
        /// Declared samples per pixel.
        samples: u16,
    },

    /// Planar (per-channel) layout.
    #[error("can only handle contiguous data packing")]
    NotContiguous,

    /// Two inputs disagree on a layout property.
    #[error("input images don't have the same specifications: {field} {left} vs {right}")]
    Mismatch {
        /// Property that differs.
        field: &'static str,
        /// Value in the first input.
        left: u32,
        /// Value in the second input.
        right: u32,
    },
}

/// Pipeline error.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Non-positive or non-finite gamma exponent.
    #[error(transparent)]
    InvalidGamma(#[from] LutError),

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An input file could not be opened.
    #[error("cannot open input: {0}")]
    OpenInput(#[source] IoError),

    /// The output could not be created or configured.
    #[error("cannot open output: {0}")]
    OpenOutput(#[source] IoError),

    /// Writing a row or finalizing the output failed.
    #[error("write failed{}: {source}", .row.map(|r| format!(" at row {r}")).unwrap_or_default())]
    Write {
        /// Row being written, `None` when finalizing.
        row: Option<u32>,
        /// Underlying error.
        #[source]
        source: IoError,
    },

    /// A row did not fit the converter's layout.
    #[error(transparent)]
    Convert(#[from] ColorError),
}

/// Coarse classification of a failure, used for pipeline state and exit
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Invalid gamma exponent.
    InvalidGamma,
    /// Unsupported bit depth.
    BadBitDepth,
    /// Not RGB or too few channels.
    NotRgb,
    /// Planar layout.
    NotContiguous,
    /// Diff inputs differ in layout.
    Mismatch,
    /// Input could not be opened.
    OpenInput,
    /// Output could not be opened.
    OpenOutput,
    /// Write or conversion failure during processing.
    WriteError,
}

impl From<&ValidationError> for FailureKind {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::BadBitDepth(_) => Self::BadBitDepth,
            ValidationError::NotRgb { .. } => Self::NotRgb,
            ValidationError::NotContiguous => Self::NotContiguous,
            ValidationError::Mismatch { .. } => Self::Mismatch,
        }
    }
}

impl OpsError {
    /// Classifies the error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidGamma(_) => FailureKind::InvalidGamma,
            Self::Validation(v) => v.into(),
            Self::OpenInput(_) => FailureKind::OpenInput,
            Self::OpenOutput(_) => FailureKind::OpenOutput,
            Self::Write { .. } | Self::Convert(_) => FailureKind::WriteError,
        }
    }

    pub(crate) fn write(row: u32, source: IoError) -> Self {
        Self::Write {
            row: Some(row),
            source,
        }
    }

    pub(crate) fn finish(source: IoError) -> Self {
        Self::Write { row: None, source }
    }

    /// Finalizes `sink` after a failed row so earlier rows stay in the
    /// output, then hands the original error back.
    pub(crate) fn closing<K: ScanlineSink + ?Sized>(self, sink: &mut K) -> Self {
        if let Err(err) = sink.finish() {
            warn!(error = %err, "Could not finalize output after failure");
        }
        self
    }
}

/// Result type for pipeline operations.
pub type OpsResult<T> = Result<T, OpsError>;
