//! Whole-image sample buffer behind the in-memory sink.

use xyz_core::{ImageSpec, SampleBuf, Samples};

use crate::{IoError, IoResult};

/// Row-addressable buffer holding every sample of one image.
///
/// Unwritten rows stay zero.
#[derive(Debug, Clone)]
pub(crate) struct Raster {
    spec: ImageSpec,
    data: SampleBuf,
    written: Vec<bool>,
}

impl Raster {
    /// Allocates a zeroed buffer for `spec`.
    pub(crate) fn new(spec: ImageSpec) -> IoResult<Self> {
        spec.check_dimensions()?;
        let depth = spec.bit_depth()?;
        let len = spec.samples_per_row() * spec.height as usize;
        Ok(Self {
            data: SampleBuf::zeroed(depth, len),
            written: vec![false; spec.height as usize],
            spec,
        })
    }

    pub(crate) fn spec(&self) -> &ImageSpec {
        &self.spec
    }

    pub(crate) fn data(&self) -> &SampleBuf {
        &self.data
    }

    pub(crate) fn into_parts(self) -> (ImageSpec, SampleBuf) {
        (self.spec, self.data)
    }

    /// Number of distinct rows stored so far.
    pub(crate) fn rows_written(&self) -> u32 {
        self.written.iter().filter(|w| **w).count() as u32
    }

    /// Copies one row into place.
    pub(crate) fn store(&mut self, row: u32, samples: Samples<'_>) -> IoResult<()> {
        if row >= self.spec.height {
            return Err(IoError::WriteFailed(format!(
                "row {row} out of range (height {})",
                self.spec.height
            )));
        }
        let per_row = self.spec.samples_per_row();
        if samples.len() != per_row {
            return Err(IoError::WriteFailed(format!(
                "row {row}: expected {per_row} samples, got {}",
                samples.len()
            )));
        }
        if !self.data.copy_from(row as usize * per_row, samples) {
            return Err(IoError::WriteFailed(format!(
                "row {row}: {}-bit samples written to {}-bit image",
                samples.bit_depth().bits(),
                self.spec.bits_per_sample
            )));
        }
        self.written[row as usize] = true;
        Ok(())
    }
}
