//! Scanline source and sink traits.
//!
//! Every tool in the workspace reads images one row at a time, in
//! ascending order, and writes rows the same way. The traits below are the
//! seam between that row loop and the concrete storage ([`TiffSource`],
//! [`MemorySource`] and their sinks).
//!
//! [`TiffSource`]: crate::TiffSource
//! [`MemorySource`]: crate::MemorySource

use xyz_core::{ImageSpec, Samples};

use crate::IoResult;

/// Row-by-row image reader.
///
/// # Implementation Notes
///
/// - Rows are requested in ascending order; implementations may cache the
///   strip holding the current row.
/// - The returned samples are the raw interleaved values of one row, with
///   [`ImageSpec::samples_per_row`] entries at the declared bit depth.
pub trait ScanlineSource {
    /// Layout and tag values of the image.
    fn spec(&self) -> &ImageSpec;

    /// Reads row `row`.
    ///
    /// # Errors
    ///
    /// [`IoError::EndOfData`](crate::IoError::EndOfData) when the row lies
    /// past the end of the image or its data cannot be decoded.
    fn read_scanline(&mut self, row: u32) -> IoResult<Samples<'_>>;

    /// Image dimensions (width, height).
    fn dimensions(&self) -> (u32, u32) {
        let spec = self.spec();
        (spec.width, spec.height)
    }
}

/// Row-by-row image writer.
///
/// Lifecycle: [`set_spec`](Self::set_spec) once, any number of
/// [`write_scanline`](Self::write_scanline) calls, then
/// [`finish`](Self::finish). Rows never written are stored as zeros.
pub trait ScanlineSink {
    /// Declares the output layout and metadata.
    fn set_spec(&mut self, spec: ImageSpec) -> IoResult<()>;

    /// Layout declared by [`set_spec`](Self::set_spec), if any.
    fn spec(&self) -> Option<&ImageSpec>;

    /// Stores one row.
    ///
    /// # Errors
    ///
    /// [`IoError::WriteFailed`](crate::IoError::WriteFailed) if the spec is
    /// missing, the row is out of range, or the sample count or depth does
    /// not match.
    fn write_scanline(&mut self, row: u32, samples: Samples<'_>) -> IoResult<()>;

    /// Flushes everything and closes the output.
    fn finish(&mut self) -> IoResult<()>;
}

impl<S: ScanlineSource + ?Sized> ScanlineSource for Box<S> {
    fn spec(&self) -> &ImageSpec {
        (**self).spec()
    }

    fn read_scanline(&mut self, row: u32) -> IoResult<Samples<'_>> {
        (**self).read_scanline(row)
    }
}

impl<S: ScanlineSink + ?Sized> ScanlineSink for Box<S> {
    fn set_spec(&mut self, spec: ImageSpec) -> IoResult<()> {
        (**self).set_spec(spec)
    }

    fn spec(&self) -> Option<&ImageSpec> {
        (**self).spec()
    }

    fn write_scanline(&mut self, row: u32, samples: Samples<'_>) -> IoResult<()> {
        (**self).write_scanline(row, samples)
    }

    fn finish(&mut self) -> IoResult<()> {
        (**self).finish()
    }
}

impl<S: ScanlineSource + ?Sized> ScanlineSource for &mut S {
    fn spec(&self) -> &ImageSpec {
        (**self).spec()
    }

    fn read_scanline(&mut self, row: u32) -> IoResult<Samples<'_>> {
        (**self).read_scanline(row)
    }
}

impl<S: ScanlineSink + ?Sized> ScanlineSink for &mut S {
    fn set_spec(&mut self, spec: ImageSpec) -> IoResult<()> {
        (**self).set_spec(spec)
    }

    fn spec(&self) -> Option<&ImageSpec> {
        (**self).spec()
    }

    fn write_scanline(&mut self, row: u32, samples: Samples<'_>) -> IoResult<()> {
        (**self).write_scanline(row, samples)
    }

    fn finish(&mut self) -> IoResult<()> {
        (**self).finish()
    }
}
