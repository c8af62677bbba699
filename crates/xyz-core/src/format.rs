//! Sample formats and container layout tags.
//!
//! # Types
//!
//! - [`BitDepth`] - bits per stored sample (8 or 16)
//! - [`Photometric`] - how samples map to a color model
//! - [`PlanarConfig`] - interleaved vs. per-plane channel storage
//! - [`Widening`] - promotion rule from 8-bit storage to 16-bit samples
//!
//! # Usage
//!
//! ```rust
//! use xyz_core::{BitDepth, Widening};
//!
//! let depth = BitDepth::from_bits(8).unwrap();
//! assert_eq!(depth.levels(), 256);
//! assert_eq!(Widening::Shift.widen(0xAB), 0xAB00);
//! assert_eq!(Widening::Direct.widen(0xAB), 0x00AB);
//! ```

use crate::{Error, Result};

/// Bits per stored sample.
///
/// Only byte-aligned unsigned integer depths are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 8-bit unsigned integer [0, 255].
    U8,
    /// 16-bit unsigned integer [0, 65535].
    U16,
}

impl BitDepth {
    /// Parses a `BitsPerSample` tag value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitDepth`] for anything but 8 or 16.
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(Self::U8),
            16 => Ok(Self::U16),
            other => Err(Error::UnsupportedBitDepth(other)),
        }
    }

    /// Number of bits per sample.
    #[inline]
    pub const fn bits(&self) -> u16 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
        }
    }

    /// Bytes used to store one sample.
    #[inline]
    pub const fn bytes(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
        }
    }

    /// Number of distinct sample levels (256 or 65536).
    #[inline]
    pub const fn levels(&self) -> usize {
        1 << self.bits()
    }

    /// Largest representable sample value.
    #[inline]
    pub const fn max_value(&self) -> u16 {
        match self {
            Self::U8 => u8::MAX as u16,
            Self::U16 => u16::MAX,
        }
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Photometric interpretation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Photometric {
    /// 0 is white.
    MinIsWhite,
    /// 0 is black.
    MinIsBlack,
    /// RGB triples.
    Rgb,
    /// Color-mapped samples.
    Palette,
    /// Any other interpretation, with its raw tag value.
    Other(u16),
}

impl Photometric {
    /// Decodes the raw tag value.
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::MinIsWhite,
            1 => Self::MinIsBlack,
            2 => Self::Rgb,
            3 => Self::Palette,
            other => Self::Other(other),
        }
    }

    /// Encodes back to the raw tag value.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::MinIsWhite => 0,
            Self::MinIsBlack => 1,
            Self::Rgb => 2,
            Self::Palette => 3,
            Self::Other(v) => v,
        }
    }
}

/// Planar configuration tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanarConfig {
    /// Interleaved channels (RGB RGB RGB ...).
    #[default]
    Contiguous,
    /// One plane per channel.
    Planar,
}

impl PlanarConfig {
    /// Decodes the raw tag value. Unknown values are treated as planar,
    /// which every consumer rejects.
    pub const fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::Contiguous,
            _ => Self::Planar,
        }
    }

    /// Encodes back to the raw tag value.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Contiguous => 1,
            Self::Planar => 2,
        }
    }
}

/// Promotion rule applied to 8-bit samples.
///
/// The conversion path needs full-range 16-bit codes while the diagnostics
/// keep native levels, so both rules coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widening {
    /// `sample16 = byte << 8`.
    Shift,
    /// `sample16 = byte`.
    Direct,
}

impl Widening {
    /// Promotes one 8-bit sample.
    #[inline]
    pub const fn widen(self, byte: u8) -> u16 {
        match self {
            Self::Shift => (byte as u16) << 8,
            Self::Direct => byte as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth_parse() {
        assert_eq!(BitDepth::from_bits(8).unwrap(), BitDepth::U8);
        assert_eq!(BitDepth::from_bits(16).unwrap(), BitDepth::U16);
        assert!(BitDepth::from_bits(1).is_err());
        assert!(BitDepth::from_bits(32).is_err());
    }

    #[test]
    fn test_bit_depth_levels() {
        assert_eq!(BitDepth::U8.levels(), 256);
        assert_eq!(BitDepth::U16.levels(), 65536);
        assert_eq!(BitDepth::U8.max_value(), 255);
        assert_eq!(BitDepth::U16.bytes(), 2);
    }

    #[test]
    fn test_photometric_roundtrip_values() {
        assert_eq!(Photometric::from_u16(2), Photometric::Rgb);
        assert_eq!(Photometric::from_u16(6), Photometric::Other(6));
        assert_eq!(Photometric::Other(6).to_u16(), 6);
        assert_eq!(Photometric::MinIsBlack.to_u16(), 1);
    }

    #[test]
    fn test_planar_config() {
        assert_eq!(PlanarConfig::from_u16(1), PlanarConfig::Contiguous);
        assert_eq!(PlanarConfig::from_u16(2), PlanarConfig::Planar);
        assert_eq!(PlanarConfig::default().to_u16(), 1);
    }

    #[test]
    fn test_widening() {
        assert_eq!(Widening::Shift.widen(0), 0);
        assert_eq!(Widening::Shift.widen(255), 0xFF00);
        assert_eq!(Widening::Direct.widen(255), 255);
    }
}
