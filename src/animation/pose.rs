//! Pose and animation sources.
//!
//! A [`Pose`] is a stateless query from bone name to local transform for one
//! frame; an [`Animation`] is the frame-indexed variant. Keyframe curve
//! storage and evaluation live with the caller — the skeleton only ever sees
//! these two traits.

use glam::{Affine3A, Quat, Vec3};

/// A bone's local transform as sampled from an animation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    pub rotation: Quat,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl BoneTransform {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(rotation: Quat, translation: Vec3, scale: Vec3) -> Self {
        Self { rotation, translation, scale }
    }

    /// Rotation-only transform.
    #[must_use]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self { rotation, ..Self::IDENTITY }
    }

    /// Translation-only transform.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A pose the skeleton can be set up in.
///
/// Conceptually an animation bound to one frame. `None` means the pose does
/// not know the bone, which the skeleton treats as the identity transform.
pub trait Pose {
    fn transform_for(&self, bone: &str) -> Option<BoneTransform>;
}

/// A frame-indexed source of bone transforms.
///
/// `frame` is a direct index into externally-owned keyframe curves; how it is
/// interpolated is up to the implementation.
pub trait Animation {
    fn transform_for(&self, bone: &str, frame: f32) -> Option<BoneTransform>;
}

/// The bind pose: knows no bones, so every bone stays at its rest transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindPose;

impl Pose for BindPose {
    fn transform_for(&self, _bone: &str) -> Option<BoneTransform> {
        None
    }
}

/// An [`Animation`] bound to a frame, usable as a [`Pose`].
pub struct AnimationPose<'a> {
    animation: &'a dyn Animation,
    frame: f32,
}

impl<'a> AnimationPose<'a> {
    #[must_use]
    pub fn new(animation: &'a dyn Animation, frame: f32) -> Self {
        Self { animation, frame }
    }

    #[must_use]
    pub fn frame(&self) -> f32 {
        self.frame
    }
}

impl Pose for AnimationPose<'_> {
    fn transform_for(&self, bone: &str) -> Option<BoneTransform> {
        self.animation.transform_for(bone, self.frame)
    }
}
