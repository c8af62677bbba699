//! # xyz-math
//!
//! Small linear-algebra primitives for color matrices.
//!
//! - [`Mat3`] - 3x3 matrix, row-major, applied to column vectors
//! - [`Vec3`] - RGB / XYZ triplet
//!
//! ```rust
//! use xyz_math::{Mat3, Vec3};
//!
//! let m = Mat3::diagonal(0.5, 1.0, 2.0);
//! assert_eq!(m * Vec3::ONE, Vec3::new(0.5, 1.0, 2.0));
//! ```
//!
//! # Used By
//!
//! - `xyz-color` - fixed RGB to X'Y'Z' matrices

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;

pub use mat3::*;
pub use vec3::*;
