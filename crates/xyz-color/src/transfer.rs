//! Gamma transfer strategies.
//!
//! Two strategies decode 16-bit codes into linear light and encode linear
//! values back into 16-bit codes:
//!
//! - **LUT** ([`xyz_lut::GammaLut`]): table lookups, 24-bit linear
//!   quantization, full 16-bit output scale (`x * 65535`).
//! - **Power** ([`PowerCurve`]): direct `powf`, 12-bit output quantization
//!   (`x * 4095`, truncated) then multiplied by 16.
//!
//! The two output scalings are not equivalent. A linear 1.0 encodes to 65535
//! with the LUT and to 65520 with the power curve; every power-curve output
//! is a multiple of 16. Callers that compare outputs across strategies must
//! account for this.

use std::fmt;
use std::str::FromStr;

use xyz_lut::GammaLut;

use crate::ColorError;

/// Largest 12-bit code used by the power curve.
pub const POWER_CODE_MAX: f32 = 4095.0;

/// Scale from 12-bit power-curve codes to the 16-bit output range.
pub const POWER_OUTPUT_STEP: u16 = 16;

const U16_MAX_F32: f32 = u16::MAX as f32;

/// Decode/encode pair shared read-only across row workers.
pub trait TransferCurve: Send + Sync {
    /// 16-bit code to linear light in [0, 1].
    fn decode(&self, sample: u16) -> f32;

    /// Linear light (already clamped to [0, 1]) to a 16-bit output code.
    fn encode(&self, linear: f32) -> u16;

    /// Strategy this curve implements.
    fn strategy(&self) -> GammaStrategy;
}

impl TransferCurve for GammaLut {
    #[inline]
    fn decode(&self, sample: u16) -> f32 {
        GammaLut::decode(self, sample)
    }

    #[inline]
    fn encode(&self, linear: f32) -> u16 {
        GammaLut::encode(self, linear)
    }

    fn strategy(&self) -> GammaStrategy {
        GammaStrategy::Lut
    }
}

/// Direct power-function evaluation (slow path).
///
/// # Example
///
/// ```rust
/// use xyz_color::{PowerCurve, TransferCurve};
///
/// let curve = PowerCurve::new(2.6, 1.0 / 2.6);
/// assert_eq!(curve.encode(1.0), 65520);
/// assert_eq!(curve.encode(0.0), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerCurve {
    /// Input (decode) exponent.
    pub gamma_in: f32,
    /// Output (encode) exponent.
    pub gamma_out: f32,
}

impl PowerCurve {
    /// Creates a curve; exponents are validated by the caller.
    pub const fn new(gamma_in: f32, gamma_out: f32) -> Self {
        Self { gamma_in, gamma_out }
    }
}

impl TransferCurve for PowerCurve {
    #[inline]
    fn decode(&self, sample: u16) -> f32 {
        (sample as f32 / U16_MAX_F32).powf(self.gamma_in)
    }

    #[inline]
    fn encode(&self, linear: f32) -> u16 {
        let v = if linear.is_nan() { 0.0 } else { linear.clamp(0.0, 1.0) };
        let code12 = (v.powf(self.gamma_out) * POWER_CODE_MAX) as u16;
        code12 * POWER_OUTPUT_STEP
    }

    fn strategy(&self) -> GammaStrategy {
        GammaStrategy::Power
    }
}

/// Which transfer strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GammaStrategy {
    /// Precomputed tables (default).
    #[default]
    Lut,
    /// Direct `powf` per channel.
    Power,
}

impl GammaStrategy {
    /// Short identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lut => "lut",
            Self::Power => "power",
        }
    }
}

impl fmt::Display for GammaStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GammaStrategy {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lut" => Ok(Self::Lut),
            "power" | "pow" => Ok(Self::Power),
            _ => Err(ColorError::UnknownStrategy(s.to_string())),
        }
    }
}
