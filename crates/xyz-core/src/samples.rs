//! Scanline sample storage.
//!
//! [`Samples`] borrows one scanline in its native storage width, which lets
//! accessors hand out rows without copying. [`SampleBuf`] is the owned
//! counterpart used for images held in memory.

use crate::BitDepth;

/// One scanline of interleaved samples in native storage width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Samples<'a> {
    /// 8-bit samples.
    U8(&'a [u8]),
    /// 16-bit samples.
    U16(&'a [u16]),
}

impl<'a> Samples<'a> {
    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::U16(s) => s.len(),
        }
    }

    /// True when no samples are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage width of the samples.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        match self {
            Self::U8(_) => BitDepth::U8,
            Self::U16(_) => BitDepth::U16,
        }
    }

    /// Sub-range of the scanline.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    #[inline]
    pub fn slice(&self, range: std::ops::Range<usize>) -> Samples<'a> {
        match *self {
            Self::U8(s) => Samples::U8(&s[range]),
            Self::U16(s) => Samples::U16(&s[range]),
        }
    }
}

/// Owned interleaved sample storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleBuf {
    /// 8-bit samples.
    U8(Vec<u8>),
    /// 16-bit samples.
    U16(Vec<u16>),
}

impl SampleBuf {
    /// Zero-filled buffer of `len` samples.
    pub fn zeroed(depth: BitDepth, len: usize) -> Self {
        match depth {
            BitDepth::U8 => Self::U8(vec![0; len]),
            BitDepth::U16 => Self::U16(vec![0; len]),
        }
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_samples().len()
    }

    /// True when no samples are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage width of the samples.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.as_samples().bit_depth()
    }

    /// Borrows the whole buffer.
    #[inline]
    pub fn as_samples(&self) -> Samples<'_> {
        match self {
            Self::U8(v) => Samples::U8(v),
            Self::U16(v) => Samples::U16(v),
        }
    }

    /// Copies `src` into `self` starting at sample `offset`.
    ///
    /// Returns `false` without copying when the depths differ or the range
    /// does not fit.
    pub fn copy_from(&mut self, offset: usize, src: Samples<'_>) -> bool {
        let end = offset + src.len();
        match (self, src) {
            (Self::U8(dst), Samples::U8(s)) if end <= dst.len() => {
                dst[offset..end].copy_from_slice(s);
                true
            }
            (Self::U16(dst), Samples::U16(s)) if end <= dst.len() => {
                dst[offset..end].copy_from_slice(s);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_len_and_depth() {
        let data = [1u16, 2, 3];
        let s = Samples::U16(&data);
        assert_eq!(s.len(), 3);
        assert_eq!(s.bit_depth(), BitDepth::U16);
        assert_eq!(s.slice(1..3), Samples::U16(&[2, 3]));
    }

    #[test]
    fn test_buf_copy_from() {
        let mut buf = SampleBuf::zeroed(BitDepth::U8, 6);
        assert!(buf.copy_from(3, Samples::U8(&[7, 8, 9])));
        assert_eq!(buf, SampleBuf::U8(vec![0, 0, 0, 7, 8, 9]));
        // Depth mismatch
        assert!(!buf.copy_from(0, Samples::U16(&[1])));
        // Out of range
        assert!(!buf.copy_from(5, Samples::U8(&[1, 2])));
    }
}
