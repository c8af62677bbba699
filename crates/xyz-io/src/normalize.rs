//! Sample normalization to 16-bit scanlines.
//!
//! 16-bit rows pass through unchanged. 8-bit rows are widened with the
//! chosen [`Widening`] rule: [`Widening::Shift`] for color conversion,
//! [`Widening::Direct`] for diagnostics that count native levels.

use thiserror::Error;
use xyz_core::{BitDepth, Samples, Widening};

use crate::{IoError, ScanlineSource};

/// Normalization error.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Source bit depth is neither 8 nor 16.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// The source could not supply the row.
    #[error("cannot read row {row}: {source}")]
    ReadError {
        /// Requested row.
        row: u32,
        /// Underlying accessor error.
        #[source]
        source: IoError,
    },
}

/// Widens one row into `out`, replacing its contents.
pub fn widen_into(samples: Samples<'_>, widening: Widening, out: &mut Vec<u16>) {
    out.clear();
    match samples {
        Samples::U16(s) => out.extend_from_slice(s),
        Samples::U8(s) => out.extend(s.iter().map(|&b| widening.widen(b))),
    }
}

/// Reads rows from a source and returns them as 16-bit samples.
///
/// Holds one reusable line buffer.
///
/// # Example
///
/// ```rust
/// use xyz_core::Widening;
/// use xyz_io::{MemorySource, Normalizer};
///
/// let mut src = MemorySource::rgb8(1, 1, vec![1, 128, 255])?;
/// let mut norm = Normalizer::new(Widening::Shift);
/// assert_eq!(norm.normalize(&mut src, 0).unwrap(), &[256, 32768, 65280]);
/// # Ok::<(), xyz_io::IoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    widening: Widening,
    line: Vec<u16>,
}

impl Normalizer {
    /// Creates a normalizer with the given 8-bit rule.
    pub fn new(widening: Widening) -> Self {
        Self {
            widening,
            line: Vec::new(),
        }
    }

    /// Widening rule in use.
    pub fn widening(&self) -> Widening {
        self.widening
    }

    /// Reads and normalizes row `row` into the internal buffer.
    pub fn normalize<S>(&mut self, source: &mut S, row: u32) -> Result<&[u16], NormalizeError>
    where
        S: ScanlineSource + ?Sized,
    {
        let mut line = std::mem::take(&mut self.line);
        let result = Self::normalize_with(self.widening, source, row, &mut line);
        self.line = line;
        result?;
        Ok(&self.line)
    }

    /// Reads and normalizes row `row` into a caller-owned buffer.
    ///
    /// # Errors
    ///
    /// - [`NormalizeError::UnsupportedBitDepth`] if the declared depth is
    ///   not 8 or 16
    /// - [`NormalizeError::ReadError`] if the row cannot be read or is
    ///   shorter than the declared width
    pub fn normalize_with<S>(
        widening: Widening,
        source: &mut S,
        row: u32,
        out: &mut Vec<u16>,
    ) -> Result<(), NormalizeError>
    where
        S: ScanlineSource + ?Sized,
    {
        let spec = source.spec();
        let depth = BitDepth::from_bits(spec.bits_per_sample)
            .map_err(|_| NormalizeError::UnsupportedBitDepth(spec.bits_per_sample))?;
        let expected = spec.samples_per_row();

        let samples = source
            .read_scanline(row)
            .map_err(|source| NormalizeError::ReadError { row, source })?;
        if samples.bit_depth() != depth || samples.len() != expected {
            return Err(NormalizeError::ReadError {
                row,
                source: IoError::end_of_data(
                    row,
                    format!(
                        "got {} {}-bit samples, expected {expected} {}-bit",
                        samples.len(),
                        samples.bit_depth().bits(),
                        depth.bits()
                    ),
                ),
            });
        }
        widen_into(samples, widening, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;
    use xyz_core::{ImageSpec, SampleBuf};

    #[test]
    fn test_16bit_passthrough() {
        let mut src = MemorySource::rgb16(2, 1, vec![0, 1, 2, 65533, 65534, 65535]).unwrap();
        let mut norm = Normalizer::new(Widening::Shift);
        assert_eq!(
            norm.normalize(&mut src, 0).unwrap(),
            &[0, 1, 2, 65533, 65534, 65535]
        );
    }

    #[test]
    fn test_8bit_widening_modes() {
        let mut src = MemorySource::rgb8(1, 1, vec![0, 1, 255]).unwrap();
        let mut shift = Normalizer::new(Widening::Shift);
        assert_eq!(shift.normalize(&mut src, 0).unwrap(), &[0, 256, 65280]);
        let mut direct = Normalizer::new(Widening::Direct);
        assert_eq!(direct.normalize(&mut src, 0).unwrap(), &[0, 1, 255]);
    }

    #[test]
    fn test_unsupported_depth() {
        let mut spec = ImageSpec::rgb(1, 1, xyz_core::BitDepth::U16);
        spec.bits_per_sample = 12;
        let mut src = MemorySource::new(spec, SampleBuf::U16(vec![0; 3])).unwrap();
        let mut norm = Normalizer::new(Widening::Shift);
        assert!(matches!(
            norm.normalize(&mut src, 0),
            Err(NormalizeError::UnsupportedBitDepth(12))
        ));
    }

    #[test]
    fn test_read_error_on_truncation() {
        let mut src = MemorySource::rgb16(1, 3, vec![7; 9]).unwrap().truncated(1);
        let mut norm = Normalizer::new(Widening::Shift);
        assert!(norm.normalize(&mut src, 0).is_ok());
        assert!(matches!(
            norm.normalize(&mut src, 1),
            Err(NormalizeError::ReadError { row: 1, .. })
        ));
    }

    #[test]
    fn test_buffer_reused_across_rows() {
        let mut src = MemorySource::rgb8(1, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let mut out = Vec::with_capacity(3);
        Normalizer::normalize_with(Widening::Direct, &mut src, 0, &mut out).unwrap();
        assert_eq!(out, [1, 2, 3]);
        Normalizer::normalize_with(Widening::Direct, &mut src, 1, &mut out).unwrap();
        assert_eq!(out, [4, 5, 6]);
    }
}
