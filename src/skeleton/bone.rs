use glam::{Affine3A, Mat3, Vec3};

use crate::math;

/// A rigid joint node in a skeleton.
///
/// Two static matrices describe the bind pose: `local_to_global` composes the
/// bone's bind-local transform with all ancestors down to the root, and
/// `global_to_local` is its inverse. Two derived matrices are recomputed on
/// every [`crate::Skeleton::setup`]: the posed transform
/// (`global_to_transformed_global`, used for positions) and its normal
/// matrix (used for directions). Invariant:
/// `local_to_global = parent.local_to_global * local_bind` (root: the bind
/// transform itself).
#[derive(Debug, Clone)]
pub struct Bone {
    name: String,
    parent: Option<usize>,

    // === Bind pose (static after build) ===
    local_to_global: Affine3A,
    global_to_local: Affine3A,

    // === Runtime data (overwritten each setup) ===
    global_to_transformed_global: Affine3A,
    normal_matrix: Mat3,
}

impl Bone {
    pub(crate) fn new(name: &str, parent: Option<usize>, local_to_global: Affine3A) -> Self {
        Self {
            name: name.to_string(),
            parent,
            local_to_global,
            global_to_local: local_to_global.inverse(),
            global_to_transformed_global: Affine3A::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
        }
    }

    /// The sentinel bone behind unknown references: identity everywhere, so
    /// transforming through it is a no-op.
    pub(crate) fn identity() -> Self {
        Self::new("", None, Affine3A::IDENTITY)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn local_to_global(&self) -> Affine3A {
        self.local_to_global
    }

    #[inline]
    #[must_use]
    pub fn global_to_local(&self) -> Affine3A {
        self.global_to_local
    }

    /// The posed transform computed by the last `setup`, mapping bind-pose
    /// global space to posed global space.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> Affine3A {
        self.global_to_transformed_global
    }

    /// Normal matrix matching [`Bone::transform`].
    #[inline]
    #[must_use]
    pub fn normal_matrix(&self) -> Mat3 {
        self.normal_matrix
    }

    /// Transforms a bind-pose global position by the current posed transform.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, position: Vec3) -> Vec3 {
        self.global_to_transformed_global.transform_point3(position)
    }

    /// Transforms a bind-pose normal by the current posed transform. The
    /// result is not renormalized.
    #[inline]
    #[must_use]
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.normal_matrix * normal
    }

    /// Maps a bind-pose global transform into this bone's local frame.
    /// Bind-space only: the current pose does not participate.
    #[must_use]
    pub fn transform_to_local(&self, transform: Affine3A) -> Affine3A {
        self.global_to_local * transform
    }

    /// Maps a transform in this bone's local frame out to posed global
    /// space. Unlike [`Bone::transform_to_local`] this includes the current
    /// pose, so attachment points follow the animated bone.
    #[must_use]
    pub fn transform_from_local(&self, transform: Affine3A) -> Affine3A {
        self.global_to_transformed_global * self.local_to_global * transform
    }

    /// Posed position of the bone's origin. Debug/visualization helper.
    #[must_use]
    pub fn head_position(&self) -> Vec3 {
        (self.global_to_transformed_global * self.local_to_global)
            .translation
            .into()
    }

    /// Posed position of the bone's +Y unit point. Debug/visualization
    /// helper; together with [`Bone::head_position`] this spans the bone line.
    #[must_use]
    pub fn tail_position(&self) -> Vec3 {
        (self.global_to_transformed_global * self.local_to_global).transform_point3(Vec3::Y)
    }

    // ========================================================================
    // Per-frame updates, driven by the skeleton's operation list
    // ========================================================================

    /// Phase 1: `g2tg = local_to_global * pose_local * global_to_local`.
    pub(crate) fn apply_pose(&mut self, pose_local: &Affine3A) {
        self.global_to_transformed_global = self.local_to_global * *pose_local * self.global_to_local;
    }

    /// Phase 2: fold the parent's finished posed transform in front.
    pub(crate) fn apply_parent(&mut self, parent_transform: &Affine3A) {
        self.global_to_transformed_global = *parent_transform * self.global_to_transformed_global;
    }

    /// Constraint write-back: replace the posed transform wholesale.
    pub(crate) fn set_transform(&mut self, transform: Affine3A) {
        self.global_to_transformed_global = transform;
    }

    /// Phase 3: refresh the normal matrix from the posed transform.
    pub(crate) fn recompute_normal_matrix(&mut self) {
        self.normal_matrix = math::normal_matrix(&self.global_to_transformed_global);
    }
}
