//! Pixel and scanline conversion.
//!
//! [`RgbConverter`] combines a [`ColorMatrix`] with a [`TransferCurve`] and
//! applies decode, matrix, clamp and encode to every pixel of a row.

use xyz_core::{Error as CoreError, RGB_CHANNELS};
use xyz_math::{Mat3, Vec3};

use crate::{ColorMatrix, ColorResult, TransferCurve};

/// Matrix plus transfer curve.
///
/// Holds no mutable state, so one converter can be shared by reference
/// across rayon workers.
///
/// # Example
///
/// ```rust
/// use xyz_color::{ColorMatrix, PowerCurve, RgbConverter};
///
/// let conv = RgbConverter::new(ColorMatrix::Smpte, PowerCurve::new(2.6, 1.0 / 2.6));
/// let mut out = vec![0u16; 6];
/// conv.convert_row(&[65535, 65535, 65535, 0, 0, 0], 3, &mut out)?;
/// assert_eq!(&out[3..], &[0, 0, 0]);
/// # Ok::<(), xyz_color::ColorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RgbConverter<C> {
    matrix: ColorMatrix,
    m: Mat3,
    curve: C,
}

impl<C: TransferCurve> RgbConverter<C> {
    /// Creates a converter for the given matrix and curve.
    pub fn new(matrix: ColorMatrix, curve: C) -> Self {
        Self {
            matrix,
            m: matrix.matrix(),
            curve,
        }
    }

    /// Selected matrix.
    #[inline]
    pub fn matrix(&self) -> ColorMatrix {
        self.matrix
    }

    /// Transfer curve.
    #[inline]
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Converts one RGB triple of 16-bit codes.
    #[inline]
    pub fn convert_pixel(&self, rgb: [u16; 3]) -> [u16; 3] {
        let lin = Vec3::new(
            self.curve.decode(rgb[0]),
            self.curve.decode(rgb[1]),
            self.curve.decode(rgb[2]),
        );
        let out = (self.m * lin).clamp01();
        [
            self.curve.encode(out.x),
            self.curve.encode(out.y),
            self.curve.encode(out.z),
        ]
    }

    /// Converts a normalized scanline.
    ///
    /// `input` holds `samples_per_pixel` interleaved samples per pixel of
    /// which the first three are R, G, B; further samples are skipped.
    /// `output` receives exactly three samples per pixel.
    ///
    /// # Errors
    ///
    /// [`CoreError::ScanlineSize`] if `samples_per_pixel < 3`, if `input` is
    /// not a whole number of pixels, or if `output` does not hold three
    /// samples for each input pixel.
    pub fn convert_row(
        &self,
        input: &[u16],
        samples_per_pixel: usize,
        output: &mut [u16],
    ) -> ColorResult<()> {
        if samples_per_pixel < RGB_CHANNELS || input.len() % samples_per_pixel != 0 {
            return Err(CoreError::ScanlineSize {
                expected: input.len().next_multiple_of(samples_per_pixel.max(RGB_CHANNELS)),
                actual: input.len(),
            }
            .into());
        }
        let pixels = input.len() / samples_per_pixel;
        if output.len() != pixels * RGB_CHANNELS {
            return Err(CoreError::ScanlineSize {
                expected: pixels * RGB_CHANNELS,
                actual: output.len(),
            }
            .into());
        }

        for (src, dst) in input
            .chunks_exact(samples_per_pixel)
            .zip(output.chunks_exact_mut(RGB_CHANNELS))
        {
            let out = self.convert_pixel([src[0], src[1], src[2]]);
            dst.copy_from_slice(&out);
        }
        Ok(())
    }
}
