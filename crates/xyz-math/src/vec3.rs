//! Color triplet.

/// Three `f32` channels: R, G, B before the matrix, X, Y, Z after it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Vec3 {
    /// R or X.
    pub x: f32,
    /// G or Y.
    pub y: f32,
    /// B or Z.
    pub z: f32,
}

impl Vec3 {
    /// Equal-energy white.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a triplet.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Limits every channel to [0, 1]. NaN channels stay NaN.
    ///
    /// ```rust
    /// use xyz_math::Vec3;
    ///
    /// assert_eq!(Vec3::new(1.5, 0.5, -0.25).clamp01(), Vec3::new(1.0, 0.5, 0.0));
    /// ```
    #[inline]
    pub fn clamp01(self) -> Self {
        Self::new(
            self.x.clamp(0.0, 1.0),
            self.y.clamp(0.0, 1.0),
            self.z.clamp(0.0, 1.0),
        )
    }

    /// Channels as an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01_limits_each_channel() {
        let v = Vec3::new(-0.5, 0.25, 7.0).clamp01();
        assert_eq!(v.to_array(), [0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_clamp01_keeps_nan() {
        assert!(Vec3::new(f32::NAN, 0.0, 0.0).clamp01().x.is_nan());
    }
}
