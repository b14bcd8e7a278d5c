//! Math helpers on top of `glam`.
//!
//! Rigid transforms are carried as [`glam::Affine3A`]; this module adds the
//! two pieces `glam` does not provide directly: direction-consistent normal
//! matrices and the fixed-order Euler conversion used by rotation
//! constraints.

pub mod euler;

pub use euler::EulerXyz;

use glam::{Affine3A, Mat3, Quat};

/// Transpose of the inverse of the transform's upper 3×3 block.
///
/// Transforms direction vectors consistently with `transform`, and stays
/// correct under non-uniform scale (for purely rigid transforms it equals the
/// rotation part).
#[must_use]
pub fn normal_matrix(transform: &Affine3A) -> Mat3 {
    Mat3::from(transform.matrix3).inverse().transpose()
}

/// Component-wise approximate quaternion equality.
pub(crate) fn quat_approx_eq(a: Quat, b: Quat, epsilon: f32) -> bool {
    (a.x - b.x).abs() <= epsilon
        && (a.y - b.y).abs() <= epsilon
        && (a.z - b.z).abs() <= epsilon
        && (a.w - b.w).abs() <= epsilon
}
