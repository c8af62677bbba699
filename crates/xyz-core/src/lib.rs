//! # xyz-core
//!
//! Core types shared by the xyz-rs crates.
//!
//! - [`ImageSpec`] - dimensions and layout of a striped raster image
//! - [`BitDepth`], [`Photometric`], [`PlanarConfig`] - container-level tags
//! - [`Samples`], [`SampleBuf`] - borrowed and owned scanline storage
//! - [`Widening`] - how 8-bit samples are promoted to 16-bit semantics
//!
//! ## Crate Structure
//!
//! ```text
//! xyz-core (this crate)
//!    ^
//!    |
//!    +-- xyz-io (scanline accessors, TIFF, normalizer)
//!    +-- xyz-lut (gamma lookup tables)
//!    +-- xyz-color (matrices, transfer curves)
//!    +-- xyz-ops (conversion, difference, histogram)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod format;
pub mod samples;
pub mod spec;

pub use error::{Error, Result};
pub use format::{BitDepth, Photometric, PlanarConfig, Widening};
pub use samples::{SampleBuf, Samples};
pub use spec::ImageSpec;

/// Number of color channels processed per pixel (R, G, B).
pub const RGB_CHANNELS: usize = 3;
