//! In-memory scanline source and sink.
//!
//! Used by tests and by library callers that already hold decoded pixels.
//!
//! # Example
//!
//! ```rust
//! use xyz_io::{MemorySink, MemorySource, ScanlineSink, ScanlineSource};
//!
//! let mut src = MemorySource::rgb16(1, 2, vec![1, 2, 3, 4, 5, 6])?;
//! let mut sink = MemorySink::new();
//! sink.set_spec(src.spec().clone())?;
//! for row in 0..2 {
//!     let line = src.read_scanline(row)?;
//!     sink.write_scanline(row, line)?;
//! }
//! sink.finish()?;
//! assert_eq!(sink.rows_written(), 2);
//! # Ok::<(), xyz_io::IoError>(())
//! ```

use xyz_core::{BitDepth, ImageSpec, SampleBuf, Samples};

use crate::raster::Raster;
use crate::{IoError, IoResult, ScanlineSink, ScanlineSource};

/// Scanline source over a sample buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    spec: ImageSpec,
    data: SampleBuf,
    readable_rows: u32,
}

impl MemorySource {
    /// Wraps `data` laid out as `spec` describes.
    ///
    /// The spec may carry values the tools reject (12-bit samples, planar
    /// layout, non-RGB photometric) so that validation can be exercised;
    /// only the buffer length is checked, plus the buffer depth when the
    /// declared depth is 8 or 16.
    pub fn new(spec: ImageSpec, data: SampleBuf) -> IoResult<Self> {
        let expected = spec.samples_per_row() * spec.height as usize;
        if data.len() != expected {
            return Err(IoError::InvalidMetadata(format!(
                "buffer holds {} samples, {}x{}x{} needs {expected}",
                data.len(),
                spec.width,
                spec.height,
                spec.samples_per_pixel
            )));
        }
        if let Ok(depth) = spec.bit_depth() {
            if depth != data.bit_depth() {
                return Err(IoError::InvalidMetadata(format!(
                    "spec declares {depth}, buffer holds {}",
                    data.bit_depth()
                )));
            }
        }
        Ok(Self {
            readable_rows: spec.height,
            spec,
            data,
        })
    }

    /// 16-bit RGB image.
    pub fn rgb16(width: u32, height: u32, data: Vec<u16>) -> IoResult<Self> {
        Self::new(ImageSpec::rgb(width, height, BitDepth::U16), SampleBuf::U16(data))
    }

    /// 8-bit RGB image.
    pub fn rgb8(width: u32, height: u32, data: Vec<u8>) -> IoResult<Self> {
        Self::new(ImageSpec::rgb(width, height, BitDepth::U8), SampleBuf::U8(data))
    }

    /// Makes every row at or after `rows` unreadable, like a short file.
    pub fn truncated(mut self, rows: u32) -> Self {
        self.readable_rows = rows.min(self.spec.height);
        self
    }

    /// Underlying samples.
    pub fn data(&self) -> &SampleBuf {
        &self.data
    }
}

impl ScanlineSource for MemorySource {
    fn spec(&self) -> &ImageSpec {
        &self.spec
    }

    fn read_scanline(&mut self, row: u32) -> IoResult<Samples<'_>> {
        if row >= self.readable_rows {
            return Err(IoError::end_of_data(row, "past end of readable rows"));
        }
        let per_row = self.spec.samples_per_row();
        let start = row as usize * per_row;
        Ok(self.data.as_samples().slice(start..start + per_row))
    }
}

/// Scanline sink collecting rows into memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    raster: Option<Raster>,
    finished: bool,
    fail_at: Option<u32>,
}

impl MemorySink {
    /// Empty sink awaiting [`set_spec`](ScanlineSink::set_spec).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose write of row `row` fails, for exercising write errors.
    pub fn failing_at(row: u32) -> Self {
        Self {
            fail_at: Some(row),
            ..Self::default()
        }
    }

    /// Collected samples, once a spec has been set.
    pub fn data(&self) -> Option<&SampleBuf> {
        self.raster.as_ref().map(Raster::data)
    }

    /// Number of distinct rows written.
    pub fn rows_written(&self) -> u32 {
        self.raster.as_ref().map_or(0, Raster::rows_written)
    }

    /// True after [`finish`](ScanlineSink::finish).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Turns the collected image into a source.
    pub fn into_source(self) -> IoResult<MemorySource> {
        let raster = self
            .raster
            .ok_or_else(|| IoError::InvalidMetadata("sink has no image".into()))?;
        let (spec, data) = raster.into_parts();
        MemorySource::new(spec, data)
    }
}

impl ScanlineSink for MemorySink {
    fn set_spec(&mut self, spec: ImageSpec) -> IoResult<()> {
        if self.raster.is_some() {
            return Err(IoError::WriteFailed("output spec already set".into()));
        }
        self.raster = Some(Raster::new(spec)?);
        Ok(())
    }

    fn spec(&self) -> Option<&ImageSpec> {
        self.raster.as_ref().map(Raster::spec)
    }

    fn write_scanline(&mut self, row: u32, samples: Samples<'_>) -> IoResult<()> {
        if self.fail_at == Some(row) {
            return Err(IoError::WriteFailed(format!("row {row}: injected failure")));
        }
        if self.finished {
            return Err(IoError::WriteFailed("sink already finished".into()));
        }
        self.raster
            .as_mut()
            .ok_or_else(|| IoError::WriteFailed("output spec not set".into()))?
            .store(row, samples)
    }

    fn finish(&mut self) -> IoResult<()> {
        if self.raster.is_none() {
            return Err(IoError::WriteFailed("output spec not set".into()));
        }
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xyz_core::Photometric;

    #[test]
    fn test_source_rows() {
        let mut src = MemorySource::rgb8(2, 2, (0..12).collect()).unwrap();
        assert_eq!(src.dimensions(), (2, 2));
        assert_eq!(src.read_scanline(1).unwrap(), Samples::U8(&[6, 7, 8, 9, 10, 11]));
        assert!(matches!(
            src.read_scanline(2),
            Err(IoError::EndOfData { row: 2, .. })
        ));
    }

    #[test]
    fn test_source_length_and_depth_checks() {
        assert!(MemorySource::rgb16(2, 2, vec![0; 11]).is_err());
        let spec = ImageSpec::rgb(1, 1, BitDepth::U16);
        assert!(MemorySource::new(spec, SampleBuf::U8(vec![0; 3])).is_err());
    }

    #[test]
    fn test_source_accepts_unsupported_depth() {
        let mut spec = ImageSpec::rgb(1, 1, BitDepth::U16).with_photometric(Photometric::MinIsBlack);
        spec.bits_per_sample = 12;
        assert!(MemorySource::new(spec, SampleBuf::U16(vec![0; 3])).is_ok());
    }

    #[test]
    fn test_truncated_source() {
        let mut src = MemorySource::rgb16(1, 4, vec![0; 12]).unwrap().truncated(2);
        assert!(src.read_scanline(1).is_ok());
        assert!(src.read_scanline(2).is_err());
        assert_eq!(src.spec().height, 4);
    }

    #[test]
    fn test_sink_lifecycle() {
        let mut sink = MemorySink::new();
        assert!(sink.write_scanline(0, Samples::U16(&[0, 0, 0])).is_err());
        sink.set_spec(ImageSpec::rgb(1, 2, BitDepth::U16)).unwrap();
        assert!(sink.set_spec(ImageSpec::rgb(1, 2, BitDepth::U16)).is_err());
        sink.write_scanline(1, Samples::U16(&[7, 8, 9])).unwrap();
        sink.finish().unwrap();
        assert!(sink.is_finished());
        assert!(sink.write_scanline(0, Samples::U16(&[0, 0, 0])).is_err());
        assert_eq!(sink.data(), Some(&SampleBuf::U16(vec![0, 0, 0, 7, 8, 9])));

        let mut src = sink.into_source().unwrap();
        assert_eq!(src.read_scanline(1).unwrap(), Samples::U16(&[7, 8, 9]));
    }

    #[test]
    fn test_failing_sink() {
        let mut sink = MemorySink::failing_at(1);
        sink.set_spec(ImageSpec::rgb(1, 2, BitDepth::U8)).unwrap();
        sink.write_scanline(0, Samples::U8(&[1, 2, 3])).unwrap();
        assert!(matches!(
            sink.write_scanline(1, Samples::U8(&[1, 2, 3])),
            Err(IoError::WriteFailed(_))
        ));
    }
}
