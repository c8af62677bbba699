//! Fixed RGB to X'Y'Z' matrices.
//!
//! | Variant | Source |
//! |---------|--------|
//! | [`Identity`](ColorMatrix::Identity) | 1:1, gamma round trip only |
//! | [`Smpte`](ColorMatrix::Smpte) | SMPTE DC28.30 (2006-02-24) |
//! | [`Stem`](ColorMatrix::Stem) | StEM mini-movie reference matrix |
//!
//! Matrices are immutable constants; selection happens once per run.

use std::fmt;
use std::str::FromStr;

use xyz_math::{Mat3, Vec3};

use crate::ColorError;

/// SMPTE DC28.30 (2006-02-24) RGB to XYZ matrix.
pub const SMPTE_DC28_30: Mat3 = Mat3::from_rows([
    [0.4451698156, 0.2771344092, 0.1722826698],
    [0.2094916779, 0.7215952542, 0.0689130679],
    [0.0000000000, 0.0470605601, 0.9073553944],
]);

/// StEM RGB to XYZ matrix.
pub const STEM: Mat3 = Mat3::from_rows([
    [0.464, 0.2692, 0.1610],
    [0.2185, 0.7010, 0.0805],
    [0.0000, 0.0457, 0.9087],
]);

/// One of the three supported color matrices.
///
/// # Example
///
/// ```rust
/// use xyz_color::ColorMatrix;
/// use xyz_color::math::Vec3;
///
/// let xyz = ColorMatrix::Smpte.apply(Vec3::ONE);
/// assert!((xyz.y - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMatrix {
    /// Identity (1:1).
    Identity,
    /// SMPTE DC28.30.
    #[default]
    Smpte,
    /// StEM.
    Stem,
}

impl ColorMatrix {
    /// All variants.
    pub const ALL: [ColorMatrix; 3] = [Self::Identity, Self::Smpte, Self::Stem];

    /// The 3x3 coefficients, row-major.
    #[inline]
    pub const fn matrix(self) -> Mat3 {
        match self {
            Self::Identity => Mat3::IDENTITY,
            Self::Smpte => SMPTE_DC28_30,
            Self::Stem => STEM,
        }
    }

    /// `out = M * in`.
    #[inline]
    pub fn apply(self, rgb: Vec3) -> Vec3 {
        self.matrix() * rgb
    }

    /// Human-readable label written into output image descriptions.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "Identity (1:1)",
            Self::Smpte => "SMPTE DC28.30 2006-02-24",
            Self::Stem => "StEM",
        }
    }

    /// Short identifier accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Smpte => "smpte",
            Self::Stem => "stem",
        }
    }
}

impl fmt::Display for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ColorMatrix {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" | "1" | "ident" => Ok(Self::Identity),
            "smpte" | "dc28" | "dc28.30" | "smpte-dc28.30" => Ok(Self::Smpte),
            "stem" => Ok(Self::Stem),
            _ => Err(ColorError::UnknownMatrix(s.to_string())),
        }
    }
}
