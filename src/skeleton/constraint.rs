//! Procedural bone constraints.
//!
//! The only kind currently defined is copy-rotation, which mirrors Blender's
//! `rotlike` constraint: it rewrites the controlled bone's rotation from the
//! target bone's, per axis, in a configurable coordinate system and mix mode.
//! Constraints are a closed set — descriptions carrying an unrecognized kind
//! tag are rejected when the skeleton is built.

use bitflags::bitflags;
use glam::{Affine3A, Quat};

use crate::errors::{MarionetteError, Result};
use crate::math::{self, EulerXyz};
use crate::skeleton::bone::Bone;

/// Results within this distance of the input skip the write-back entirely.
/// An approximate-equality heuristic, not a precision contract.
const WRITE_BACK_EPSILON: f32 = 1e-8;

bitflags! {
    /// Per-axis enable and invert options, matching the description format's
    /// option byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AxisFlags: u8 {
        const USE_X = 0x01;
        const USE_Y = 0x02;
        const USE_Z = 0x04;
        const INVERT_X = 0x10;
        const INVERT_Y = 0x20;
        const INVERT_Z = 0x40;
    }
}

impl AxisFlags {
    pub const USE_ALL: Self = Self::USE_X.union(Self::USE_Y).union(Self::USE_Z);

    /// Decodes the description option byte. Unassigned bits are dropped.
    #[must_use]
    pub fn from_wire(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }
}

/// The coordinate system a constraint reads or writes a bone's rotation in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    /// The bone's own transformation, with parent posing undone. A bone is
    /// at rest iff this is the identity.
    Local,
    /// The bone's total transform after parenting, relative to its rest
    /// position.
    LocalWithParent,
    /// The bone's transformation in skeleton space, disregarding rest poses.
    Pose,
}

impl CoordinateSystem {
    pub fn decode(coded: u8) -> Result<Self> {
        match coded {
            0 => Ok(Self::Local),
            1 => Ok(Self::LocalWithParent),
            2 => Ok(Self::Pose),
            _ => Err(MarionetteError::UnknownCoordinateSystem(coded)),
        }
    }
}

/// How the copied rotation combines with the controlled bone's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixMode {
    /// Replace the enabled axes of the controlled rotation.
    Replace,
    /// Apply the copied rotation before the controlled one.
    Before,
    /// Apply the copied rotation on top of the controlled one.
    After,
}

impl MixMode {
    pub fn decode(coded: u8) -> Result<Self> {
        match coded {
            0 => Ok(Self::Replace),
            1 => Ok(Self::Before),
            2 => Ok(Self::After),
            _ => Err(MarionetteError::UnknownMixMode(coded)),
        }
    }
}

/// Kind tags for the closed constraint set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    CopyRotation,
}

impl ConstraintKind {
    pub const COPY_ROTATION_TAG: [u8; 4] = *b"CPYR";

    /// Resolves a description fourcc tag, rejecting unknown kinds.
    pub fn from_tag(tag: [u8; 4]) -> Result<Self> {
        match &tag {
            b"CPYR" => Ok(Self::CopyRotation),
            _ => Err(MarionetteError::UnknownConstraintKind {
                tag: String::from_utf8_lossy(&tag).into_owned(),
            }),
        }
    }
}

/// A constraint entry as recorded by the builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintRecord {
    CopyRotation(CopyRotation),
}

impl ConstraintRecord {
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::CopyRotation(_) => ConstraintKind::CopyRotation,
        }
    }
}

/// Copies the target bone's rotation onto the controlled bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyRotation {
    /// The bone being rewritten.
    pub controlled: usize,
    /// The bone the rotation is copied from.
    pub target: usize,
    /// Blend between the controlled bone's own rotation (0) and the fully
    /// constrained one (1).
    pub influence: f32,
    pub axes: AxisFlags,
    pub mix_mode: MixMode,
    pub controlled_system: CoordinateSystem,
    pub target_system: CoordinateSystem,
}

impl CopyRotation {
    #[must_use]
    pub fn new(controlled: usize, target: usize) -> Self {
        Self {
            controlled,
            target,
            influence: 1.0,
            axes: AxisFlags::USE_ALL,
            mix_mode: MixMode::Replace,
            controlled_system: CoordinateSystem::Local,
            target_system: CoordinateSystem::Local,
        }
    }

    #[must_use]
    pub fn with_influence(mut self, influence: f32) -> Self {
        self.influence = influence;
        self
    }

    #[must_use]
    pub fn with_axes(mut self, axes: AxisFlags) -> Self {
        self.axes = axes;
        self
    }

    #[must_use]
    pub fn with_mix_mode(mut self, mix_mode: MixMode) -> Self {
        self.mix_mode = mix_mode;
        self
    }

    #[must_use]
    pub fn with_systems(mut self, controlled: CoordinateSystem, target: CoordinateSystem) -> Self {
        self.controlled_system = controlled;
        self.target_system = target;
        self
    }

    /// Evaluates the constraint against the current posed transforms.
    ///
    /// Runs after the controlled bone's and the target's parenting
    /// operations; the scheduler guarantees that ordering.
    pub(crate) fn apply(&self, bones: &mut [Bone]) {
        let target_local = extract_local(bones, self.target, self.target_system);
        let controlled_local = extract_local(bones, self.controlled, self.controlled_system);

        let (_, target_rotation, _) = target_local.to_scale_rotation_translation();
        let (scale, controlled_rotation, translation) =
            controlled_local.to_scale_rotation_translation();

        let mixed = self.mix(target_rotation, controlled_rotation);
        let blended = controlled_rotation.slerp(mixed, self.influence);

        if math::quat_approx_eq(blended, controlled_rotation, WRITE_BACK_EPSILON) {
            return;
        }

        let rebuilt = Affine3A::from_scale_rotation_translation(scale, blended, translation);
        store_local(bones, self.controlled, self.controlled_system, rebuilt);
    }

    /// Restricts the copied rotation to the enabled axes, applies inversions,
    /// and combines it with the controlled rotation per mix mode.
    fn mix(&self, target: Quat, controlled: Quat) -> Quat {
        // Work in Euler angles so single axes can be picked apart; resolve
        // the target's two-solution ambiguity against the controlled angles.
        let controlled_euler = EulerXyz::from_quat_compatible(controlled, EulerXyz::ZERO);
        let mut target_euler = EulerXyz::from_quat_compatible(target, controlled_euler);

        if self.axes.contains(AxisFlags::INVERT_X) {
            target_euler.x = -target_euler.x;
        }
        if self.axes.contains(AxisFlags::INVERT_Y) {
            target_euler.y = -target_euler.y;
        }
        if self.axes.contains(AxisFlags::INVERT_Z) {
            target_euler.z = -target_euler.z;
        }

        match self.mix_mode {
            MixMode::Replace => {
                let mut combined = controlled_euler;
                if self.axes.contains(AxisFlags::USE_X) {
                    combined.x = target_euler.x;
                }
                if self.axes.contains(AxisFlags::USE_Y) {
                    combined.y = target_euler.y;
                }
                if self.axes.contains(AxisFlags::USE_Z) {
                    combined.z = target_euler.z;
                }
                combined.to_quat()
            }
            MixMode::Before | MixMode::After => {
                if !self.axes.contains(AxisFlags::USE_X) {
                    target_euler.x = 0.0;
                }
                if !self.axes.contains(AxisFlags::USE_Y) {
                    target_euler.y = 0.0;
                }
                if !self.axes.contains(AxisFlags::USE_Z) {
                    target_euler.z = 0.0;
                }
                let partial = target_euler.to_quat();
                if self.mix_mode == MixMode::Before {
                    controlled * partial
                } else {
                    partial * controlled
                }
            }
        }
    }
}

/// Reads a bone's current transform in the requested coordinate system.
///
/// With `g2tg` the posed transform, `l2g`/`g2l` the bind matrices:
/// - `LocalWithParent`: `g2l * g2tg * l2g`
/// - `Local` (parented): `g2l * parent.g2tg⁻¹ * g2tg * l2g`
/// - `Pose`: `g2tg` itself
fn extract_local(bones: &[Bone], index: usize, system: CoordinateSystem) -> Affine3A {
    let bone = &bones[index];
    match system {
        CoordinateSystem::Local => match bone.parent() {
            Some(parent) => {
                let parent_posed = bones[parent].transform();
                bone.global_to_local()
                    * parent_posed.inverse()
                    * bone.transform()
                    * bone.local_to_global()
            }
            // without a parent, local == local-with-parent
            None => local_with_parent(bone),
        },
        CoordinateSystem::LocalWithParent => local_with_parent(bone),
        CoordinateSystem::Pose => bone.transform(),
    }
}

fn local_with_parent(bone: &Bone) -> Affine3A {
    bone.global_to_local() * bone.transform() * bone.local_to_global()
}

/// Inverse of [`extract_local`]: writes a coordinate-system-local transform
/// back into the bone's posed transform.
fn store_local(bones: &mut [Bone], index: usize, system: CoordinateSystem, local: Affine3A) {
    let bone = &bones[index];
    let transform = match system {
        CoordinateSystem::Local => match bone.parent() {
            Some(parent) => {
                let parent_posed = bones[parent].transform();
                parent_posed * bone.local_to_global() * local * bone.global_to_local()
            }
            None => bone.local_to_global() * local * bone.global_to_local(),
        },
        CoordinateSystem::LocalWithParent => {
            bone.local_to_global() * local * bone.global_to_local()
        }
        CoordinateSystem::Pose => local,
    };
    bones[index].set_transform(transform);
}
