//! # xyz-io
//!
//! Scanline image I/O for the RGB to X'Y'Z' tools.
//!
//! All tools process images one row at a time. This crate provides the
//! row-level accessor traits and their backends:
//!
//! - [`ScanlineSource`] / [`ScanlineSink`] - row reader and writer traits
//! - [`TiffSource`] / [`TiffSink`] - strip TIFF backend (feature `tiff`)
//! - [`MemorySource`] / [`MemorySink`] - in-memory backend
//! - [`Normalizer`] - 8/16-bit rows to 16-bit samples
//! - [`StripLayout`] - row to strip geometry for striped outputs
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use xyz_core::Widening;
//! use xyz_io::{open_read, Normalizer, ScanlineSource};
//!
//! let mut src = open_read("plate.tif")?;
//! let mut norm = Normalizer::new(Widening::Shift);
//! for row in 0..src.spec().height {
//!     let line = norm.normalize(&mut src, row)?;
//!     // line: &[u16], samples_per_pixel values per pixel
//! }
//! ```
//!
//! # Dependencies
//!
//! - [`xyz-core`] - image spec and sample buffers
//! - [`tiff`] - TIFF decoding and encoding
//! - [`tracing`] - structured logging
//!
//! # Used By
//!
//! - `xyz-ops` - conversion and diagnostics pipelines
//! - `xyz-cli` - command-line tools

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod memory;
mod normalize;
mod raster;
mod strip;
mod traits;

#[cfg(feature = "tiff")]
pub mod tiff;

pub use error::{IoError, IoResult};
pub use memory::{MemorySink, MemorySource};
pub use normalize::{widen_into, NormalizeError, Normalizer};
pub use strip::{default_rows_per_strip, StripLayout, DEFAULT_STRIP_BYTES};
pub use traits::{ScanlineSink, ScanlineSource};

#[cfg(feature = "tiff")]
pub use self::tiff::{TiffSink, TiffSource};

/// Opens a TIFF file for row reading.
///
/// # Errors
///
/// See [`TiffSource::open`].
#[cfg(feature = "tiff")]
pub fn open_read<P: AsRef<std::path::Path>>(path: P) -> IoResult<TiffSource> {
    TiffSource::open(path)
}

/// Creates a TIFF file for row writing.
///
/// # Errors
///
/// See [`TiffSink::create`].
#[cfg(feature = "tiff")]
pub fn open_write<P: AsRef<std::path::Path>>(path: P) -> IoResult<TiffSink> {
    TiffSink::create(path)
}
