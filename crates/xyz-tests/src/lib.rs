//! Integration tests for xyz-rs crates.
//!
//! These run the conversion and diagnostic pipelines against real TIFF
//! files on disk, written either through [`xyz_io::TiffSink`] or directly
//! with the `tiff` encoder for layouts the sink does not produce.
