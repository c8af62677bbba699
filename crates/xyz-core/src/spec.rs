//! Image specification.
//!
//! [`ImageSpec`] is the "header" of a striped raster: everything needed to
//! interpret one scanline of raw samples. Input accessors report it once at
//! open time; output accessors receive it before the first row is written.
//!
//! # Usage
//!
//! ```rust
//! use xyz_core::{BitDepth, ImageSpec};
//!
//! let spec = ImageSpec::rgb(1998, 1080, BitDepth::U16)
//!     .with_rows_per_strip(8)
//!     .with_description("graded plate");
//! assert_eq!(spec.samples_per_row(), 1998 * 3);
//! ```

use crate::{BitDepth, Error, Photometric, PlanarConfig, Result, RGB_CHANNELS};

/// Dimensions, sample layout and descriptive tags of a raster image.
///
/// `bits_per_sample` keeps the raw tag value so that unsupported depths can
/// be reported by validation instead of failing at open time.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in rows.
    pub height: u32,
    /// Raw bits-per-sample tag.
    pub bits_per_sample: u16,
    /// Samples stored per pixel (the first three are R, G, B).
    pub samples_per_pixel: u16,
    /// Photometric interpretation.
    pub photometric: Photometric,
    /// Planar configuration.
    pub planar: PlanarConfig,
    /// Rows per strip, when known or requested.
    pub rows_per_strip: Option<u32>,
    /// `ImageDescription` text.
    pub description: Option<String>,
    /// `Software` text.
    pub software: Option<String>,
}

impl ImageSpec {
    /// Contiguous RGB image with three samples per pixel.
    pub fn rgb(width: u32, height: u32, depth: BitDepth) -> Self {
        Self {
            width,
            height,
            bits_per_sample: depth.bits(),
            samples_per_pixel: RGB_CHANNELS as u16,
            photometric: Photometric::Rgb,
            planar: PlanarConfig::Contiguous,
            rows_per_strip: None,
            description: None,
            software: None,
        }
    }

    /// Sets the samples per pixel.
    pub fn with_samples_per_pixel(mut self, spp: u16) -> Self {
        self.samples_per_pixel = spp;
        self
    }

    /// Sets the photometric interpretation.
    pub fn with_photometric(mut self, photometric: Photometric) -> Self {
        self.photometric = photometric;
        self
    }

    /// Sets the planar configuration.
    pub fn with_planar(mut self, planar: PlanarConfig) -> Self {
        self.planar = planar;
        self
    }

    /// Sets rows per strip.
    pub fn with_rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = Some(rows);
        self
    }

    /// Sets the image description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Sets the software tag.
    pub fn with_software(mut self, text: impl Into<String>) -> Self {
        self.software = Some(text.into());
        self
    }

    /// Parsed bit depth.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedBitDepth`] for depths other than 8 and 16.
    #[inline]
    pub fn bit_depth(&self) -> Result<BitDepth> {
        BitDepth::from_bits(self.bits_per_sample)
    }

    /// Samples in one scanline (`width * samples_per_pixel`).
    #[inline]
    pub fn samples_per_row(&self) -> usize {
        self.width as usize * self.samples_per_pixel as usize
    }

    /// Bytes in one packed scanline.
    #[inline]
    pub fn scanline_bytes(&self) -> usize {
        (self.samples_per_row() * self.bits_per_sample as usize).div_ceil(8)
    }

    /// Checks that the spec can describe a non-empty raster.
    pub fn check_dimensions(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_dimensions(
                self.width,
                self.height,
                "width and height must be > 0",
            ));
        }
        if self.samples_per_pixel == 0 {
            return Err(Error::invalid_dimensions(
                self.width,
                self.height,
                "samples per pixel must be > 0",
            ));
        }
        Ok(())
    }
}
