//! Per-channel level histogram.
//!
//! 8-bit images get 256 buckets, 16-bit images 65536. Samples are widened
//! directly, so an 8-bit level `n` counts in bucket `n`. The text form
//! prints one line per level, `level / divisor` followed by the red, green
//! and blue counts, where the divisor is 1 for 8-bit and 16 for 16-bit data.

use std::io::{self, Write};

use tracing::{debug, trace, warn};
use xyz_core::{BitDepth, Widening, RGB_CHANNELS};
use xyz_io::{Normalizer, ScanlineSource};

use crate::validate::validate_histogram_input;
use crate::OpsResult;

/// Red, green and blue level counts of one image.
///
/// # Example
///
/// ```rust
/// use xyz_io::MemorySource;
/// use xyz_ops::Histogram;
///
/// let mut src = MemorySource::rgb8(2, 1, vec![0, 1, 2, 0, 1, 255])?;
/// let hist = Histogram::compute(&mut src)?;
/// assert_eq!(hist.red()[0], 2);
/// assert_eq!(hist.blue()[255], 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    depth: BitDepth,
    counts: [Vec<u64>; RGB_CHANNELS],
    rows_processed: u32,
}

impl Histogram {
    /// Empty histogram for the given depth.
    pub fn new(depth: BitDepth) -> Self {
        let levels = depth.levels();
        Self {
            depth,
            counts: [vec![0; levels], vec![0; levels], vec![0; levels]],
            rows_processed: 0,
        }
    }

    /// Counts every readable row of `source`.
    ///
    /// # Errors
    ///
    /// [`OpsError::Validation`](crate::OpsError::Validation) unless the image
    /// is 8/16-bit, contiguous, with exactly three samples per pixel.
    pub fn compute<S>(source: &mut S) -> OpsResult<Self>
    where
        S: ScanlineSource + ?Sized,
    {
        let spec = source.spec().clone();
        let depth = validate_histogram_input(&spec)?;
        trace!(width = spec.width, height = spec.height, bits = depth.bits(), "Histogram::compute");

        let spp = spec.samples_per_pixel as usize;
        let mut hist = Self::new(depth);
        let mut norm = Normalizer::new(Widening::Direct);
        for row in 0..spec.height {
            match norm.normalize(source, row) {
                Ok(line) => hist.accumulate(line, spp),
                Err(err) => {
                    warn!(row, height = spec.height, error = %err, "Input ended before declared height");
                    break;
                }
            }
            hist.rows_processed += 1;
        }
        debug!(rows = hist.rows_processed, levels = hist.levels(), "Histogram computed");
        Ok(hist)
    }

    /// Adds one normalized row with `samples_per_pixel` samples per pixel.
    ///
    /// Samples beyond the bucket range of the histogram's depth are ignored.
    pub fn accumulate(&mut self, line: &[u16], samples_per_pixel: usize) {
        let spp = samples_per_pixel.max(RGB_CHANNELS);
        for pixel in line.chunks_exact(spp) {
            for (counts, &level) in self.counts.iter_mut().zip(pixel) {
                if let Some(bucket) = counts.get_mut(level as usize) {
                    *bucket += 1;
                }
            }
        }
    }

    /// Sample depth.
    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    /// Number of buckets per channel.
    pub fn levels(&self) -> usize {
        self.depth.levels()
    }

    /// Level divisor used by the text form.
    pub fn divisor(&self) -> f32 {
        match self.depth {
            BitDepth::U8 => 1.0,
            BitDepth::U16 => 16.0,
        }
    }

    /// Rows counted.
    pub fn rows_processed(&self) -> u32 {
        self.rows_processed
    }

    /// Counts of channel `index` (0 = red).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`.
    pub fn channel(&self, index: usize) -> &[u64] {
        &self.counts[index]
    }

    /// Red counts.
    pub fn red(&self) -> &[u64] {
        self.channel(0)
    }

    /// Green counts.
    pub fn green(&self) -> &[u64] {
        self.channel(1)
    }

    /// Blue counts.
    pub fn blue(&self) -> &[u64] {
        self.channel(2)
    }

    /// Sum of the buckets of channel `index`.
    pub fn total(&self, index: usize) -> u64 {
        self.channel(index).iter().sum()
    }

    /// Writes the text form, one line per level.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        let div = self.divisor();
        for (level, ((r, g), b)) in self
            .red()
            .iter()
            .zip(self.green())
            .zip(self.blue())
            .enumerate()
        {
            writeln!(out, "{:.6} {} {} {}", level as f32 / div, r, g, b)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, OpsError};
    use xyz_core::{ImageSpec, Photometric, PlanarConfig, SampleBuf};
    use xyz_io::MemorySource;

    #[test]
    fn test_8bit_counts_and_totals() {
        let data: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
        let mut src = MemorySource::rgb8(4, 3, data).unwrap();
        let hist = Histogram::compute(&mut src).unwrap();
        assert_eq!(hist.levels(), 256);
        for c in 0..3 {
            assert_eq!(hist.total(c), 12);
        }
        assert_eq!(hist.red()[0], 1);
        assert_eq!(hist.green()[7], 1);
        assert_eq!(hist.rows_processed(), 3);
    }

    #[test]
    fn test_16bit_levels() {
        let mut src = MemorySource::rgb16(1, 2, vec![65535, 0, 256, 65535, 1, 256]).unwrap();
        let hist = Histogram::compute(&mut src).unwrap();
        assert_eq!(hist.levels(), 65536);
        assert_eq!(hist.red()[65535], 2);
        assert_eq!(hist.green()[0], 1);
        assert_eq!(hist.green()[1], 1);
        assert_eq!(hist.blue()[256], 2);
    }

    #[test]
    fn test_text_form_8bit() {
        let mut src = MemorySource::rgb8(1, 1, vec![0, 1, 1]).unwrap();
        let hist = Histogram::compute(&mut src).unwrap();
        let mut out = Vec::new();
        hist.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 256);
        assert_eq!(lines[0], "0.000000 1 0 0");
        assert_eq!(lines[1], "1.000000 0 1 1");
        assert_eq!(lines[255], "255.000000 0 0 0");
    }

    #[test]
    fn test_text_form_16bit_divisor() {
        let hist = Histogram::new(BitDepth::U16);
        let mut out = Vec::new();
        hist.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 65536);
        assert_eq!(lines[8], "0.500000 0 0 0");
        assert_eq!(lines[65535], "4095.937500 0 0 0");
    }

    #[test]
    fn test_extra_channels_rejected() {
        let spec = ImageSpec::rgb(2, 1, BitDepth::U8).with_samples_per_pixel(4);
        let mut src = MemorySource::new(spec, SampleBuf::U8(vec![1, 2, 3, 9, 1, 2, 3, 9])).unwrap();
        let err = Histogram::compute(&mut src).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotRgb);
    }

    #[test]
    fn test_any_photometric_accepted() {
        let spec = ImageSpec::rgb(1, 1, BitDepth::U8).with_photometric(Photometric::MinIsBlack);
        let mut src = MemorySource::new(spec, SampleBuf::U8(vec![4, 5, 6])).unwrap();
        assert!(Histogram::compute(&mut src).is_ok());
    }

    #[test]
    fn test_rejects_planar_and_bad_depth() {
        let spec = ImageSpec::rgb(1, 1, BitDepth::U8).with_planar(PlanarConfig::Planar);
        let mut src = MemorySource::new(spec, SampleBuf::U8(vec![0; 3])).unwrap();
        let err = Histogram::compute(&mut src).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NotContiguous);

        let mut spec = ImageSpec::rgb(1, 1, BitDepth::U16);
        spec.bits_per_sample = 32;
        let mut src = MemorySource::new(spec, SampleBuf::U16(vec![0; 3])).unwrap();
        assert!(matches!(
            Histogram::compute(&mut src),
            Err(OpsError::Validation(_))
        ));
    }

    #[test]
    fn test_truncated_counts_partial_rows() {
        let mut src = MemorySource::rgb8(2, 4, vec![1; 24]).unwrap().truncated(3);
        let hist = Histogram::compute(&mut src).unwrap();
        assert_eq!(hist.rows_processed(), 3);
        assert_eq!(hist.red()[1], 6);
    }
}
