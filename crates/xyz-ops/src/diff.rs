//! Per-sample absolute difference of two RGB images.
//!
//! Both inputs must pass the conversion input checks and share width,
//! height, bit depth and samples per pixel. The output has the inputs' bit
//! depth and three channels holding `|a - b|` of the first three samples of
//! every pixel. As with conversion, the output is opened only once both
//! inputs are known to be compatible, and a short input ends the run early.

use tracing::{debug, info, trace, warn};
use xyz_core::{BitDepth, ImageSpec, Samples, Widening, RGB_CHANNELS};
use xyz_io::{default_rows_per_strip, IoResult, Normalizer, ScanlineSink, ScanlineSource};

use crate::validate::{check_contiguous, check_same_layout, validate_rgb_input};
use crate::{OpsError, OpsResult};

/// Difference settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Rows per output strip, 0 for the default strip size.
    pub rows_per_strip: u32,
}

impl DiffOptions {
    /// Sets rows per output strip (0 = default).
    pub fn with_rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = rows;
        self
    }

    /// Spec of the difference image.
    pub fn output_spec(&self, input: &ImageSpec, depth: BitDepth) -> ImageSpec {
        let spec = ImageSpec::rgb(input.width, input.height, depth);
        let rows = default_rows_per_strip(spec.scanline_bytes(), self.rows_per_strip);
        spec.with_rows_per_strip(rows)
    }
}

/// Outcome of a difference run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    /// Image width.
    pub width: u32,
    /// Declared height.
    pub height: u32,
    /// Sample depth of inputs and output.
    pub bit_depth: BitDepth,
    /// Rows compared and written.
    pub rows_processed: u32,
    /// Largest difference seen per channel (R, G, B).
    pub max_diff: [u16; 3],
    /// Pixels with any non-zero channel difference.
    pub differing_pixels: u64,
}

impl DiffReport {
    /// True if every compared sample was equal.
    pub fn is_identical(&self) -> bool {
        self.max_diff == [0; 3]
    }
}

/// Writes `|first - second|` to the output opened by `open_output`.
///
/// # Errors
///
/// - [`OpsError::Validation`] if either input is unsupported or they differ
///   in layout
/// - [`OpsError::OpenOutput`] if the output cannot be opened or configured
/// - [`OpsError::Write`] if a row or the final flush fails
///
/// # Example
///
/// ```rust
/// use xyz_io::{MemorySink, MemorySource};
/// use xyz_ops::{diff_images, DiffOptions};
///
/// let mut a = MemorySource::rgb8(1, 1, vec![10, 20, 30])?;
/// let mut b = MemorySource::rgb8(1, 1, vec![15, 20, 0])?;
/// let mut sink = MemorySink::new();
/// let report = diff_images(&mut a, &mut b, &DiffOptions::default(), || Ok(&mut sink))?;
/// assert_eq!(report.max_diff, [5, 0, 30]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn diff_images<A, B, K, F>(
    first: &mut A,
    second: &mut B,
    options: &DiffOptions,
    open_output: F,
) -> OpsResult<DiffReport>
where
    A: ScanlineSource + ?Sized,
    B: ScanlineSource + ?Sized,
    K: ScanlineSink,
    F: FnOnce() -> IoResult<K>,
{
    trace!(rows_per_strip = options.rows_per_strip, "diff_images");

    let spec = first.spec().clone();
    let depth = validate_rgb_input(&spec)?;
    check_contiguous(second.spec())?;
    check_same_layout(&spec, second.spec())?;

    let out_spec = options.output_spec(&spec, depth);
    debug!(
        width = spec.width,
        height = spec.height,
        bits = depth.bits(),
        rows_per_strip = ?out_spec.rows_per_strip,
        "Inputs compatible"
    );
    let mut sink = open_output().map_err(OpsError::OpenOutput)?;
    sink.set_spec(out_spec).map_err(OpsError::OpenOutput)?;

    let spp = spec.samples_per_pixel as usize;
    let out_len = spec.width as usize * RGB_CHANNELS;
    let mut line_a = Vec::with_capacity(spec.samples_per_row());
    let mut line_b = Vec::with_capacity(spec.samples_per_row());
    let mut out16 = vec![0u16; out_len];
    let mut out8 = vec![0u8; out_len];
    let mut max_diff = [0u16; 3];
    let mut differing_pixels = 0u64;

    let mut rows = 0u32;
    while rows < spec.height {
        let row = rows;
        let read = Normalizer::normalize_with(Widening::Direct, first, row, &mut line_a)
            .and_then(|()| Normalizer::normalize_with(Widening::Direct, second, row, &mut line_b));
        if let Err(err) = read {
            warn!(row, height = spec.height, error = %err, "Input ended before declared height");
            break;
        }

        for ((a, b), out) in line_a
            .chunks_exact(spp)
            .zip(line_b.chunks_exact(spp))
            .zip(out16.chunks_exact_mut(RGB_CHANNELS))
        {
            let mut differs = false;
            for c in 0..RGB_CHANNELS {
                let d = a[c].abs_diff(b[c]);
                out[c] = d;
                max_diff[c] = max_diff[c].max(d);
                differs |= d != 0;
            }
            differing_pixels += u64::from(differs);
        }

        let samples = match depth {
            BitDepth::U16 => Samples::U16(&out16),
            BitDepth::U8 => {
                // Direct widening keeps 8-bit differences below 256.
                for (dst, src) in out8.iter_mut().zip(&out16) {
                    *dst = *src as u8;
                }
                Samples::U8(&out8)
            }
        };
        if let Err(err) = sink.write_scanline(row, samples) {
            return Err(OpsError::write(row, err).closing(&mut sink));
        }
        rows += 1;
    }

    sink.finish().map_err(OpsError::finish)?;

    let report = DiffReport {
        width: spec.width,
        height: spec.height,
        bit_depth: depth,
        rows_processed: rows,
        max_diff,
        differing_pixels,
    };
    info!(
        rows = report.rows_processed,
        max_r = max_diff[0],
        max_g = max_diff[1],
        max_b = max_diff[2],
        differing_pixels,
        "Difference finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, ValidationError};
    use xyz_core::{PlanarConfig, SampleBuf};
    use xyz_io::{MemorySink, MemorySource};

    fn run(a: &mut MemorySource, b: &mut MemorySource) -> (OpsResult<DiffReport>, MemorySink) {
        let mut sink = MemorySink::new();
        let result = diff_images(a, b, &DiffOptions::default(), || Ok(&mut sink));
        (result, sink)
    }

    #[test]
    fn test_self_diff_is_zero() {
        let data: Vec<u16> = (0..2 * 3 * 3).map(|i| i * 3000).collect();
        let mut a = MemorySource::rgb16(2, 3, data.clone()).unwrap();
        let mut b = MemorySource::rgb16(2, 3, data).unwrap();
        let (result, sink) = run(&mut a, &mut b);
        let report = result.unwrap();
        assert!(report.is_identical());
        assert_eq!(report.differing_pixels, 0);
        assert_eq!(sink.data(), Some(&SampleBuf::U16(vec![0; 18])));
    }

    #[test]
    fn test_absolute_difference_16bit() {
        let mut a = MemorySource::rgb16(2, 1, vec![100, 0, 65535, 5, 5, 5]).unwrap();
        let mut b = MemorySource::rgb16(2, 1, vec![0, 100, 0, 5, 5, 5]).unwrap();
        let (result, sink) = run(&mut a, &mut b);
        let report = result.unwrap();
        assert_eq!(report.max_diff, [100, 100, 65535]);
        assert_eq!(report.differing_pixels, 1);
        assert_eq!(
            sink.data(),
            Some(&SampleBuf::U16(vec![100, 100, 65535, 0, 0, 0]))
        );
    }

    #[test]
    fn test_8bit_output_keeps_depth() {
        let mut a = MemorySource::rgb8(1, 2, vec![255, 0, 7, 1, 2, 3]).unwrap();
        let mut b = MemorySource::rgb8(1, 2, vec![0, 255, 7, 3, 2, 1]).unwrap();
        let (result, sink) = run(&mut a, &mut b);
        assert_eq!(result.unwrap().bit_depth, BitDepth::U8);
        assert_eq!(sink.spec().unwrap().bits_per_sample, 8);
        assert_eq!(sink.data(), Some(&SampleBuf::U8(vec![255, 255, 0, 2, 0, 2])));
    }

    #[test]
    fn test_extra_channels_ignored() {
        let spec = ImageSpec::rgb(1, 1, BitDepth::U16).with_samples_per_pixel(4);
        let mut a = MemorySource::new(spec.clone(), SampleBuf::U16(vec![1, 2, 3, 100])).unwrap();
        let mut b = MemorySource::new(spec, SampleBuf::U16(vec![1, 2, 3, 900])).unwrap();
        let (result, sink) = run(&mut a, &mut b);
        assert!(result.unwrap().is_identical());
        assert_eq!(sink.spec().unwrap().samples_per_pixel, 3);
    }

    #[test]
    fn test_width_mismatch_never_opens_output() {
        let mut a = MemorySource::rgb16(2, 1, vec![0; 6]).unwrap();
        let mut b = MemorySource::rgb16(3, 1, vec![0; 9]).unwrap();
        let mut opened = false;
        let result = diff_images(&mut a, &mut b, &DiffOptions::default(), || {
            opened = true;
            Ok(MemorySink::new())
        });
        let err = result.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Mismatch);
        assert!(matches!(
            err,
            OpsError::Validation(ValidationError::Mismatch { field: "width", .. })
        ));
        assert!(!opened);
    }

    #[test]
    fn test_second_input_must_be_contiguous() {
        let mut a = MemorySource::rgb16(1, 1, vec![0; 3]).unwrap();
        let spec = ImageSpec::rgb(1, 1, BitDepth::U16).with_planar(PlanarConfig::Planar);
        let mut b = MemorySource::new(spec, SampleBuf::U16(vec![0; 3])).unwrap();
        let (result, _) = run(&mut a, &mut b);
        assert_eq!(result.unwrap_err().kind(), FailureKind::NotContiguous);
    }

    #[test]
    fn test_short_second_input_stops_early() {
        let mut a = MemorySource::rgb16(1, 3, vec![9; 9]).unwrap();
        let mut b = MemorySource::rgb16(1, 3, vec![4; 9]).unwrap().truncated(1);
        let (result, sink) = run(&mut a, &mut b);
        let report = result.unwrap();
        assert_eq!(report.rows_processed, 1);
        assert_eq!(report.max_diff, [5, 5, 5]);
        assert_eq!(sink.rows_written(), 1);
        assert!(sink.is_finished());
    }

    #[test]
    fn test_write_failure_closes_output() {
        let mut a = MemorySource::rgb16(1, 3, vec![9; 9]).unwrap();
        let mut b = MemorySource::rgb16(1, 3, vec![4; 9]).unwrap();
        let mut sink = MemorySink::failing_at(1);
        let result = diff_images(&mut a, &mut b, &DiffOptions::default(), || Ok(&mut sink));
        assert!(matches!(result, Err(OpsError::Write { row: Some(1), .. })));
        assert!(sink.is_finished());
        assert_eq!(
            sink.data(),
            Some(&SampleBuf::U16(vec![5, 5, 5, 0, 0, 0, 0, 0, 0]))
        );
    }

    #[test]
    fn test_rows_per_strip_option() {
        let input = ImageSpec::rgb(10, 10, BitDepth::U8);
        let spec = DiffOptions::default().output_spec(&input, BitDepth::U8);
        assert_eq!(spec.rows_per_strip, Some(8192 / 30));
        let spec = DiffOptions::default()
            .with_rows_per_strip(2)
            .output_spec(&input, BitDepth::U8);
        assert_eq!(spec.rows_per_strip, Some(2));
    }
}
