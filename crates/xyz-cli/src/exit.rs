//! Process exit statuses.
//!
//! | Status | Code |
//! |--------|------|
//! | success, `--help`, `--version` | 0 |
//! | bad usage or gamma | -1 |
//! | output cannot be opened | -2 |
//! | bit depth not 8/16 | -3 |
//! | not RGB | -4 |
//! | not contiguous | -5 |
//! | input cannot be opened | -6 |
//! | diff inputs differ | -7 |
//! | write failure | -8 |

use xyz_ops::{FailureKind, OpsError};

/// Outcome of a tool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// Finished (possibly on a truncated input).
    Success,
    /// Bad arguments.
    Usage,
    /// Output could not be opened.
    OpenOutput,
    /// Unsupported bit depth.
    BadBitDepth,
    /// Not RGB.
    NotRgb,
    /// Planar layout.
    NotContiguous,
    /// Input could not be opened.
    OpenInput,
    /// Diff inputs differ in layout.
    Mismatch,
    /// Write failed.
    WriteFailed,
}

impl ExitStatus {
    /// Process exit code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Usage => -1,
            Self::OpenOutput => -2,
            Self::BadBitDepth => -3,
            Self::NotRgb => -4,
            Self::NotContiguous => -5,
            Self::OpenInput => -6,
            Self::Mismatch => -7,
            Self::WriteFailed => -8,
        }
    }
}

impl From<FailureKind> for ExitStatus {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::InvalidGamma => Self::Usage,
            FailureKind::BadBitDepth => Self::BadBitDepth,
            FailureKind::NotRgb => Self::NotRgb,
            FailureKind::NotContiguous => Self::NotContiguous,
            FailureKind::Mismatch => Self::Mismatch,
            FailureKind::OpenInput => Self::OpenInput,
            FailureKind::OpenOutput => Self::OpenOutput,
            FailureKind::WriteError => Self::WriteFailed,
        }
    }
}

/// Exit status for an error chain.
///
/// Pipeline errors map by kind, bare I/O errors (stdout) count as write
/// failures, anything else as usage errors.
pub fn status_of(err: &anyhow::Error) -> ExitStatus {
    if let Some(ops) = err.chain().find_map(|e| e.downcast_ref::<OpsError>()) {
        return ops.kind().into();
    }
    if err.chain().any(|e| e.is::<std::io::Error>()) {
        return ExitStatus::WriteFailed;
    }
    ExitStatus::Usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use xyz_io::IoError;
    use xyz_ops::ValidationError;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            ExitStatus::Success,
            ExitStatus::Usage,
            ExitStatus::OpenOutput,
            ExitStatus::BadBitDepth,
            ExitStatus::NotRgb,
            ExitStatus::NotContiguous,
            ExitStatus::OpenInput,
            ExitStatus::Mismatch,
            ExitStatus::WriteFailed,
        ];
        let mut codes: Vec<i32> = all.iter().map(|s| s.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_status_through_context() {
        let err = Err::<(), _>(OpsError::from(ValidationError::NotContiguous))
            .context("Failed to convert in.tif")
            .unwrap_err();
        assert_eq!(status_of(&err), ExitStatus::NotContiguous);

        let err = Err::<(), _>(OpsError::OpenInput(IoError::NotFound("x.tif".into())))
            .context("Failed to open")
            .unwrap_err();
        assert_eq!(status_of(&err).code(), -6);
    }

    #[test]
    fn test_fallbacks() {
        let err = anyhow::Error::new(std::io::Error::other("broken pipe"));
        assert_eq!(status_of(&err), ExitStatus::WriteFailed);
        assert_eq!(status_of(&anyhow::anyhow!("nope")), ExitStatus::Usage);
        assert_eq!(ExitStatus::from(FailureKind::InvalidGamma), ExitStatus::Usage);
    }
}
