//! # xyz-ops
//!
//! Whole-image operations built on the scanline accessors:
//!
//! - [`ConversionPipeline`] - RGB to X'Y'Z' conversion with a state machine
//!   (`Init`, `Validating`, `PreparingOutput`, `Processing`, `Done`, `Failed`)
//! - [`diff_images`] - per-sample absolute difference of two images
//! - [`Histogram`] - per-channel level counts
//!
//! All three share the input checks in [`validate`] and tolerate short
//! inputs: a row that cannot be read ends the run with fewer rows than the
//! declared height, while write failures abort.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use xyz_io::{open_read, open_write};
//! use xyz_ops::{ConversionPipeline, ConvertOptions};
//!
//! let mut input = open_read("rgb.tif")?;
//! let mut pipeline = ConversionPipeline::new(ConvertOptions::default());
//! let report = pipeline.run(&mut input, || open_write("xyz.tif"))?;
//! println!("{} rows", report.rows_processed);
//! ```
//!
//! # Dependencies
//!
//! - [`xyz-io`] - scanline sources and sinks
//! - [`xyz-color`] - matrices and transfer curves
//! - [`xyz-lut`] - gamma tables
//! - [`rayon`] - parallel row conversion
//!
//! # Used By
//!
//! - `xyz-cli` - `toxyz`, `tiffdiff`, `tiffhist`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod convert;
pub mod diff;
pub mod histogram;
pub mod validate;

pub use convert::{
    software_tag, ConversionPipeline, ConversionState, ConvertOptions, ConvertReport,
    DEFAULT_BATCH_ROWS, DEFAULT_GAMMA_IN, DEFAULT_GAMMA_OUT,
};
pub use diff::{diff_images, DiffOptions, DiffReport};
pub use error::{FailureKind, OpsError, OpsResult, ValidationError};
pub use histogram::Histogram;
pub use validate::{validate_histogram_input, validate_rgb_input};
