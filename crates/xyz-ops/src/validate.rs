//! Input checks shared by the three tools.
//!
//! Checks run in a fixed order (bit depth, color model, packing) so that an
//! image failing several of them always reports the same reason.

use xyz_core::{BitDepth, ImageSpec, Photometric, PlanarConfig, RGB_CHANNELS};

use crate::ValidationError;

/// Bits per sample must be 8 or 16.
pub fn check_bit_depth(spec: &ImageSpec) -> Result<BitDepth, ValidationError> {
    BitDepth::from_bits(spec.bits_per_sample)
        .map_err(|_| ValidationError::BadBitDepth(spec.bits_per_sample))
}

/// At least three samples per pixel.
pub fn check_channels(spec: &ImageSpec) -> Result<(), ValidationError> {
    if (spec.samples_per_pixel as usize) < RGB_CHANNELS {
        return Err(ValidationError::NotRgb {
            photometric: spec.photometric,
            samples: spec.samples_per_pixel,
        });
    }
    Ok(())
}

/// RGB photometric with at least three samples per pixel.
pub fn check_rgb(spec: &ImageSpec) -> Result<(), ValidationError> {
    if spec.photometric != Photometric::Rgb {
        return Err(ValidationError::NotRgb {
            photometric: spec.photometric,
            samples: spec.samples_per_pixel,
        });
    }
    check_channels(spec)
}

/// Interleaved (chunky) sample layout.
pub fn check_contiguous(spec: &ImageSpec) -> Result<(), ValidationError> {
    match spec.planar {
        PlanarConfig::Contiguous => Ok(()),
        PlanarConfig::Planar => Err(ValidationError::NotContiguous),
    }
}

/// Full check for conversion and difference inputs.
///
/// ```rust
/// use xyz_core::{BitDepth, ImageSpec, Photometric};
/// use xyz_ops::{validate_rgb_input, ValidationError};
///
/// let spec = ImageSpec::rgb(4, 4, BitDepth::U8);
/// assert_eq!(validate_rgb_input(&spec), Ok(BitDepth::U8));
///
/// let gray = spec.with_photometric(Photometric::MinIsBlack);
/// assert!(matches!(validate_rgb_input(&gray), Err(ValidationError::NotRgb { .. })));
/// ```
pub fn validate_rgb_input(spec: &ImageSpec) -> Result<BitDepth, ValidationError> {
    let depth = check_bit_depth(spec)?;
    check_rgb(spec)?;
    check_contiguous(spec)?;
    Ok(depth)
}

/// Histogram inputs need exactly three channels but any photometric.
pub fn validate_histogram_input(spec: &ImageSpec) -> Result<BitDepth, ValidationError> {
    let depth = check_bit_depth(spec)?;
    if spec.samples_per_pixel as usize != RGB_CHANNELS {
        return Err(ValidationError::NotRgb {
            photometric: spec.photometric,
            samples: spec.samples_per_pixel,
        });
    }
    check_contiguous(spec)?;
    Ok(depth)
}

/// Width, height, bit depth and samples per pixel must agree.
pub fn check_same_layout(a: &ImageSpec, b: &ImageSpec) -> Result<(), ValidationError> {
    let fields = [
        ("width", a.width, b.width),
        ("height", a.height, b.height),
        ("bits per sample", a.bits_per_sample.into(), b.bits_per_sample.into()),
        ("samples per pixel", a.samples_per_pixel.into(), b.samples_per_pixel.into()),
    ];
    for (field, left, right) in fields {
        if left != right {
            return Err(ValidationError::Mismatch { field, left, right });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb16() -> ImageSpec {
        ImageSpec::rgb(8, 4, BitDepth::U16)
    }

    #[test]
    fn test_accepts_rgb() {
        assert_eq!(validate_rgb_input(&rgb16()), Ok(BitDepth::U16));
        assert_eq!(
            validate_rgb_input(&rgb16().with_samples_per_pixel(4)),
            Ok(BitDepth::U16)
        );
    }

    #[test]
    fn test_check_order() {
        let mut spec = rgb16()
            .with_photometric(Photometric::Palette)
            .with_planar(PlanarConfig::Planar);
        spec.bits_per_sample = 1;
        assert_eq!(validate_rgb_input(&spec), Err(ValidationError::BadBitDepth(1)));
        spec.bits_per_sample = 8;
        assert!(matches!(
            validate_rgb_input(&spec),
            Err(ValidationError::NotRgb { .. })
        ));
        spec.photometric = Photometric::Rgb;
        assert_eq!(validate_rgb_input(&spec), Err(ValidationError::NotContiguous));
    }

    #[test]
    fn test_too_few_channels() {
        let spec = rgb16().with_samples_per_pixel(2);
        assert_eq!(
            validate_rgb_input(&spec),
            Err(ValidationError::NotRgb {
                photometric: Photometric::Rgb,
                samples: 2
            })
        );
        assert!(validate_histogram_input(&spec).is_err());
    }

    #[test]
    fn test_histogram_needs_exactly_three_channels() {
        let spec = rgb16().with_samples_per_pixel(4);
        assert!(validate_rgb_input(&spec).is_ok());
        assert_eq!(
            validate_histogram_input(&spec),
            Err(ValidationError::NotRgb {
                photometric: Photometric::Rgb,
                samples: 4
            })
        );
    }

    #[test]
    fn test_histogram_ignores_photometric() {
        let spec = rgb16().with_photometric(Photometric::MinIsBlack);
        assert_eq!(validate_histogram_input(&spec), Ok(BitDepth::U16));
    }

    #[test]
    fn test_same_layout() {
        assert!(check_same_layout(&rgb16(), &rgb16()).is_ok());
        let wider = ImageSpec::rgb(9, 4, BitDepth::U16);
        assert_eq!(
            check_same_layout(&rgb16(), &wider),
            Err(ValidationError::Mismatch {
                field: "width",
                left: 8,
                right: 9
            })
        );
        let eight = ImageSpec::rgb(8, 4, BitDepth::U8);
        assert!(matches!(
            check_same_layout(&rgb16(), &eight),
            Err(ValidationError::Mismatch {
                field: "bits per sample",
                ..
            })
        ));
    }
}
