//! Strip geometry for striped outputs.
//!
//! Available without the `tiff` feature so pipelines can size their output
//! specs whatever backend receives them.

use xyz_core::ImageSpec;

/// Target strip size in bytes when no rows-per-strip value is requested.
pub const DEFAULT_STRIP_BYTES: usize = 8192;

/// Rows per strip for an output image.
///
/// Returns `requested` when non-zero, otherwise as many rows as fit in
/// [`DEFAULT_STRIP_BYTES`], never less than one.
///
/// ```rust
/// use xyz_io::default_rows_per_strip;
///
/// assert_eq!(default_rows_per_strip(6 * 1998, 0), 1);
/// assert_eq!(default_rows_per_strip(12, 0), 682);
/// assert_eq!(default_rows_per_strip(12, 16), 16);
/// ```
pub fn default_rows_per_strip(scanline_bytes: usize, requested: u32) -> u32 {
    if requested > 0 {
        return requested;
    }
    (DEFAULT_STRIP_BYTES / scanline_bytes.max(1)).max(1) as u32
}

/// How the rows of one image map onto strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    height: u32,
    rows_per_strip: u32,
    samples_per_row: usize,
}

impl StripLayout {
    /// Layout for `spec`, using its rows-per-strip or the default strip
    /// size, clamped to `1..=height`.
    pub fn new(spec: &ImageSpec) -> Self {
        let rows = spec
            .rows_per_strip
            .unwrap_or_else(|| default_rows_per_strip(spec.scanline_bytes(), 0));
        Self {
            height: spec.height,
            rows_per_strip: rows.clamp(1, spec.height.max(1)),
            samples_per_row: spec.samples_per_row(),
        }
    }

    /// Rows in every strip but possibly the last.
    #[inline]
    pub fn rows_per_strip(&self) -> u32 {
        self.rows_per_strip
    }

    /// Samples in one row.
    #[inline]
    pub fn samples_per_row(&self) -> usize {
        self.samples_per_row
    }

    /// Number of strips covering the image.
    #[inline]
    pub fn strip_count(&self) -> u32 {
        self.height.div_ceil(self.rows_per_strip)
    }

    /// Strip holding `row`.
    #[inline]
    pub fn strip_of(&self, row: u32) -> u32 {
        row / self.rows_per_strip
    }

    /// Sample offset of `row` inside its strip.
    #[inline]
    pub fn offset_in_strip(&self, row: u32) -> usize {
        (row % self.rows_per_strip) as usize * self.samples_per_row
    }

    /// Samples in a full strip.
    #[inline]
    pub fn full_strip_samples(&self) -> usize {
        self.rows_per_strip as usize * self.samples_per_row
    }

    /// Samples in strip `strip`; the last one may be short.
    pub fn strip_samples(&self, strip: u32) -> usize {
        let start = strip.saturating_mul(self.rows_per_strip).min(self.height);
        let rows = (self.height - start).min(self.rows_per_strip);
        rows as usize * self.samples_per_row
    }
}
