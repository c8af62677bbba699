//! Tool implementations.

pub mod convert;
pub mod diff;
pub mod hist;

use std::path::Path;

use anyhow::{Context, Result};
use xyz_io::TiffSource;
use xyz_ops::OpsError;

/// Opens an input TIFF, tagging failures as open-input errors.
pub fn open_input(path: &Path) -> Result<TiffSource> {
    xyz_io::open_read(path)
        .map_err(OpsError::OpenInput)
        .with_context(|| format!("Failed to open: {}", path.display()))
}
