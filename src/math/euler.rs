//! Fixed-order Euler angles with discontinuity-aware extraction.
//!
//! Decomposing a quaternion into Euler angles always has two solutions; a
//! naive extraction flips between them as a rotation passes ±90° on the
//! middle axis. [`EulerXyz::from_quat_compatible`] computes both and keeps
//! the one closest to a caller-supplied reference, which is what lets
//! per-axis rotation mixing stay continuous across frames.

use std::f32::consts::{PI, TAU};

use glam::{Mat3, Quat};

/// Euler angles in fixed XYZ order.
///
/// The composed rotation is `Rz(z) * Ry(y) * Rx(x)`: a vector is rotated
/// about X first, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerXyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerXyz {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Composes the angles back into a quaternion.
    #[must_use]
    pub fn to_quat(self) -> Quat {
        Quat::from_rotation_z(self.z) * Quat::from_rotation_y(self.y) * Quat::from_rotation_x(self.x)
    }

    /// Extracts Euler angles from `q`, choosing the analytic solution whose
    /// summed per-axis angular distance to `reference` is smallest.
    ///
    /// In the gimbal-locked branch (middle axis at ±90°) only one solution
    /// exists; its Z angle is fixed to 0.
    #[must_use]
    pub fn from_quat_compatible(q: Quat, reference: Self) -> Self {
        let m = Mat3::from_quat(q.normalize());

        let cy = m.x_axis.x.hypot(m.x_axis.y);
        let (first, second) = if cy > 16.0 * f32::MIN_POSITIVE {
            (
                Self::new(
                    m.y_axis.z.atan2(m.z_axis.z),
                    (-m.x_axis.z).atan2(cy),
                    m.x_axis.y.atan2(m.x_axis.x),
                ),
                Self::new(
                    (-m.y_axis.z).atan2(-m.z_axis.z),
                    (-m.x_axis.z).atan2(-cy),
                    (-m.x_axis.y).atan2(-m.x_axis.x),
                ),
            )
        } else {
            let degenerate = Self::new((-m.z_axis.y).atan2(m.y_axis.y), (-m.x_axis.z).atan2(cy), 0.0);
            (degenerate, degenerate)
        };

        if distance_sum(first, reference) < distance_sum(second, reference) {
            first
        } else {
            second
        }
    }
}

fn distance_sum(candidate: EulerXyz, reference: EulerXyz) -> f32 {
    angle_distance(candidate.x, reference.x)
        + angle_distance(candidate.y, reference.y)
        + angle_distance(candidate.z, reference.z)
}

/// Shortest absolute angular distance between two angles, in `[0, PI]`.
fn angle_distance(a: f32, b: f32) -> f32 {
    let diff = ((a - b) % TAU).abs();
    if diff > PI { TAU - diff } else { diff }
}
