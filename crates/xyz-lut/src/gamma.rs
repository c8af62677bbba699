//! Gamma decode/encode table pair.
//!
//! # Table sizes
//!
//! | Table  | Index domain          | Entries    | Entry type |
//! |--------|-----------------------|------------|------------|
//! | decode | 16-bit code value     | 65 536     | `f32`      |
//! | encode | 24-bit linear value   | 16 777 216 | `u16`      |
//!
//! Both tables are monotonically non-decreasing for any positive exponent,
//! since `x^g` is monotonic on [0, 1].

use rayon::prelude::*;
use tracing::debug;

use crate::{LutError, LutResult};

/// Extra bits of linear precision carried by the encode table over 16 bits.
pub const PRECISION: u32 = 8;

/// Entries in the decode table (one per 16-bit code value).
pub const DECODE_LEN: usize = 1 << 16;

/// Entries in the encode table (`2^(16 + PRECISION)`).
pub const ENCODE_LEN: usize = DECODE_LEN << PRECISION;

/// Largest encode-table index, also the quantization scale.
pub const ENCODE_MAX: u32 = (ENCODE_LEN - 1) as u32;

const CODE_MAX: f64 = u16::MAX as f64;

/// Rejects non-positive or non-finite exponents.
///
/// # Example
///
/// ```rust
/// use xyz_lut::check_gamma;
///
/// assert!(check_gamma(2.6).is_ok());
/// assert!(check_gamma(0.0).is_err());
/// assert!(check_gamma(f32::NAN).is_err());
/// ```
pub fn check_gamma(gamma: f32) -> LutResult<f32> {
    if gamma.is_finite() && gamma > 0.0 {
        Ok(gamma)
    } else {
        Err(LutError::InvalidGamma(gamma))
    }
}

/// Builds the decode table: `table[i] = (i / 65535)^gamma_in`.
///
/// The exponent is not validated; use [`GammaLut::build`] for checked
/// construction.
pub fn build_decode_table(gamma_in: f32) -> Vec<f32> {
    let g = gamma_in as f64;
    (0..DECODE_LEN)
        .map(|i| (i as f64 / CODE_MAX).powf(g) as f32)
        .collect()
}

/// Builds the encode table:
/// `table[i] = round((i / (2^24 - 1))^gamma_out * 65535)`.
///
/// Filled in parallel; every entry depends on its index only.
pub fn build_encode_table(gamma_out: f32) -> Vec<u16> {
    let g = gamma_out as f64;
    let scale = ENCODE_MAX as f64;
    let mut table = vec![0u16; ENCODE_LEN];
    table
        .par_chunks_mut(DECODE_LEN)
        .enumerate()
        .for_each(|(chunk, out)| {
            let base = chunk * DECODE_LEN;
            for (j, v) in out.iter_mut().enumerate() {
                let t = (base + j) as f64 / scale;
                *v = (t.powf(g) * CODE_MAX).round() as u16;
            }
        });
    table
}

/// Decode and encode tables for one `(gamma_in, gamma_out)` pair.
///
/// Built once before processing and shared read-only by every row worker.
///
/// # Example
///
/// ```rust,no_run
/// use xyz_lut::GammaLut;
///
/// let lut = GammaLut::build(1.0, 1.0)?;
/// assert_eq!(lut.encode(lut.decode(1234)), 1234);
/// # Ok::<(), xyz_lut::LutError>(())
/// ```
#[derive(Clone)]
pub struct GammaLut {
    gamma_in: f32,
    gamma_out: f32,
    decode: Vec<f32>,
    encode: Vec<u16>,
}

impl GammaLut {
    /// Validates both exponents and builds the tables.
    ///
    /// # Errors
    ///
    /// [`LutError::InvalidGamma`] if either exponent is not positive.
    pub fn build(gamma_in: f32, gamma_out: f32) -> LutResult<Self> {
        check_gamma(gamma_in)?;
        check_gamma(gamma_out)?;

        debug!(
            gamma_in,
            gamma_out,
            decode_len = DECODE_LEN,
            encode_len = ENCODE_LEN,
            "Building gamma LUTs"
        );

        let decode = build_decode_table(gamma_in);
        let encode = build_encode_table(gamma_out);

        Ok(Self {
            gamma_in,
            gamma_out,
            decode,
            encode,
        })
    }

    /// Input exponent.
    #[inline]
    pub fn gamma_in(&self) -> f32 {
        self.gamma_in
    }

    /// Output exponent.
    #[inline]
    pub fn gamma_out(&self) -> f32 {
        self.gamma_out
    }

    /// Linear value for a 16-bit code.
    #[inline]
    pub fn decode(&self, sample: u16) -> f32 {
        self.decode[sample as usize]
    }

    /// Clamps a linear value to [0, 1] and rounds it onto the 24-bit
    /// encode index domain. NaN maps to 0.
    #[inline]
    pub fn quantize(linear: f32) -> u32 {
        let v = if linear.is_nan() { 0.0 } else { linear.clamp(0.0, 1.0) };
        ((v as f64) * ENCODE_MAX as f64).round() as u32
    }

    /// Output code for an already quantized index.
    ///
    /// # Panics
    ///
    /// Panics if `index > ENCODE_MAX`.
    #[inline]
    pub fn encode_index(&self, index: u32) -> u16 {
        self.encode[index as usize]
    }

    /// Output code for a linear value (clamp, quantize, look up).
    #[inline]
    pub fn encode(&self, linear: f32) -> u16 {
        self.encode_index(Self::quantize(linear))
    }

    /// The decode table.
    #[inline]
    pub fn decode_table(&self) -> &[f32] {
        &self.decode
    }

    /// The encode table.
    #[inline]
    pub fn encode_table(&self) -> &[u16] {
        &self.encode
    }
}

impl std::fmt::Debug for GammaLut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaLut")
            .field("gamma_in", &self.gamma_in)
            .field("gamma_out", &self.gamma_out)
            .field("decode_len", &self.decode.len())
            .field("encode_len", &self.encode.len())
            .finish()
    }
}
