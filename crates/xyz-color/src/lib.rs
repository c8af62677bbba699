//! # xyz-color
//!
//! Per-pixel color conversion for 16-bit RGB scanlines.
//!
//! # Architecture
//!
//! ```text
//!   16-bit code --decode--> linear RGB --matrix--> linear X'Y'Z'
//!                                                     |
//!   16-bit code <--encode-- clamp [0, 1] <------------+
//! ```
//!
//! - [`ColorMatrix`] - the three fixed 3x3 transforms
//! - [`TransferCurve`] - decode/encode strategy, implemented by
//!   [`xyz_lut::GammaLut`] (table lookups) and [`PowerCurve`] (direct `powf`)
//! - [`RgbConverter`] - matrix + curve applied to pixels and rows
//!
//! # Quick Start
//!
//! ```rust
//! use xyz_color::{ColorMatrix, PowerCurve, RgbConverter};
//!
//! let conv = RgbConverter::new(ColorMatrix::Identity, PowerCurve::new(1.0, 1.0));
//! let out = conv.convert_pixel([65535, 0, 0]);
//! assert_eq!(out, [4095 * 16, 0, 0]);
//! ```
//!
//! # Dependencies
//!
//! - [`xyz-math`] - `Mat3` / `Vec3`
//! - [`xyz-lut`] - gamma tables
//!
//! # Used By
//!
//! - `xyz-ops` - conversion pipeline

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod convert;
pub mod matrix;
pub mod transfer;

pub use convert::RgbConverter;
pub use error::{ColorError, ColorResult};
pub use matrix::ColorMatrix;
pub use transfer::{GammaStrategy, PowerCurve, TransferCurve};

pub use xyz_lut as lut;
pub use xyz_math as math;
