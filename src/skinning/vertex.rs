use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::skeleton::Skeleton;

/// One bone influence on a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneBinding {
    pub bone: usize,
    pub weight: f32,
}

impl BoneBinding {
    #[must_use]
    pub fn new(bone: usize, weight: f32) -> Self {
        Self { bone, weight }
    }
}

/// A mesh vertex with its bind-pose data and normalized bone bindings.
#[derive(Debug, Clone)]
pub struct SkinnedVertex {
    pub bind_position: Vec3,
    pub bind_normal: Vec3,
    pub uv: Vec2,
    bindings: SmallVec<[BoneBinding; 4]>,
}

impl SkinnedVertex {
    /// Builds a vertex from raw influences.
    ///
    /// Non-positive weights are discarded and the rest renormalized to sum
    /// to 1. An empty result means the vertex rides along rigidly with the
    /// identity transform.
    #[must_use]
    pub fn new(bind_position: Vec3, bind_normal: Vec3, uv: Vec2, raw: &[BoneBinding]) -> Self {
        let mut bindings: SmallVec<[BoneBinding; 4]> =
            raw.iter().copied().filter(|binding| binding.weight > 0.0).collect();

        let total: f32 = bindings.iter().map(|binding| binding.weight).sum();
        if total > 0.0 {
            for binding in &mut bindings {
                binding.weight /= total;
            }
        }

        Self { bind_position, bind_normal, uv, bindings }
    }

    /// A vertex without bone influences.
    #[must_use]
    pub fn rigid(bind_position: Vec3, bind_normal: Vec3, uv: Vec2) -> Self {
        Self {
            bind_position,
            bind_normal,
            uv,
            bindings: SmallVec::new(),
        }
    }

    /// The normalized bindings (weights sum to 1, or empty for rigid).
    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &[BoneBinding] {
        &self.bindings
    }

    #[inline]
    #[must_use]
    pub fn is_rigid(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Deforms the bind position and normal by the skeleton's current pose.
    ///
    /// Bindings referencing bones the skeleton does not have resolve to the
    /// identity static bone. The returned normal is not renormalized.
    #[must_use]
    pub fn deform(&self, skeleton: &Skeleton) -> (Vec3, Vec3) {
        if self.bindings.is_empty() {
            return (self.bind_position, self.bind_normal);
        }

        let mut position = Vec3::ZERO;
        let mut normal = Vec3::ZERO;
        for binding in &self.bindings {
            let bone = skeleton.bone(binding.bone);
            position += bone.transform_point(self.bind_position) * binding.weight;
            normal += bone.transform_normal(self.bind_normal) * binding.weight;
        }
        (position, normal)
    }
}
