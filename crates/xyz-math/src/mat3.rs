//! Row-major 3x3 matrix applied to column vectors.
//!
//! ```text
//! | m00 m01 m02 |   | r |   | m00*r + m01*g + m02*b |
//! | m10 m11 m12 | * | g | = | m10*r + m11*g + m12*b |
//! | m20 m21 m22 |   | b |   | m20*r + m21*g + m22*b |
//! ```

use std::ops::{Index, Mul};

use crate::Vec3;

/// 3x3 color matrix.
///
/// # Example
///
/// ```rust
/// use xyz_math::{Mat3, Vec3};
///
/// const SWAP_RB: Mat3 = Mat3::from_rows([[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
/// assert_eq!(SWAP_RB * Vec3::new(0.1, 0.2, 0.3), Vec3::new(0.3, 0.2, 0.1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// `rows[r][c]`.
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    /// Identity.
    pub const IDENTITY: Self = Self::diagonal(1.0, 1.0, 1.0);

    /// Builds a matrix from its rows.
    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Scales each channel independently.
    #[inline]
    pub const fn diagonal(a: f32, b: f32, c: f32) -> Self {
        Self::from_rows([[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]])
    }

    /// Row sums; for an RGB to XYZ matrix, the XYZ of RGB white.
    #[inline]
    pub fn white(&self) -> Vec3 {
        *self * Vec3::ONE
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        let [r0, r1, r2] = self.rows;
        let dot = |r: [f32; 3]| r[0] * v.x + r[1] * v.y + r[2] * v.z;
        Vec3::new(dot(r0), dot(r1), dot(r2))
    }
}

impl Index<usize> for Mat3 {
    type Output = [f32; 3];

    #[inline]
    fn index(&self, row: usize) -> &[f32; 3] {
        &self.rows[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_and_default() {
        let v = Vec3::new(0.2, 0.4, 0.8);
        assert_eq!(Mat3::IDENTITY * v, v);
        assert_eq!(Mat3::default(), Mat3::IDENTITY);
    }

    #[test]
    fn test_product_uses_rows() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m * Vec3::new(1.0, 0.0, 1.0), Vec3::new(4.0, 10.0, 16.0));
        assert_eq!(m[2], [7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_white() {
        let m = Mat3::from_rows([[0.25, 0.25, 0.5], [0.1, 0.2, 0.3], [0.0, 0.0, 1.0]]);
        let w = m.white();
        assert_abs_diff_eq!(w.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(w.y, 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(w.z, 1.0, epsilon = 1e-6);
    }
}
