//! # xyz-lut
//!
//! Gamma lookup tables for the RGB to X'Y'Z' conversion path.
//!
//! A [`GammaLut`] pairs two tables built once per run:
//!
//! - **decode**: 16-bit code value to linear light, `(i / 65535)^gamma_in`
//! - **encode**: 24-bit quantized linear value to 16-bit code value,
//!   `round((i / (2^24 - 1))^gamma_out * 65535)`
//!
//! The encode table carries [`PRECISION`] extra bits over the 16-bit sample
//! domain so that dark linear values keep distinct output codes.
//!
//! # Usage
//!
//! ```rust,no_run
//! use xyz_lut::GammaLut;
//!
//! let lut = GammaLut::build(2.6, 1.0 / 2.6)?;
//! let linear = lut.decode(32768);
//! let code = lut.encode(linear);
//! # Ok::<(), xyz_lut::LutError>(())
//! ```
//!
//! # Used By
//!
//! - `xyz-color` - LUT transfer strategy

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod gamma;

pub use error::{LutError, LutResult};
pub use gamma::{
    build_decode_table, build_encode_table, check_gamma, GammaLut, DECODE_LEN, ENCODE_LEN,
    ENCODE_MAX, PRECISION,
};
