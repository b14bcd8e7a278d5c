use glam::{Affine3A, Vec2, Vec3};

use crate::math;
use crate::skeleton::Skeleton;
use crate::skinning::vertex::SkinnedVertex;

/// A fully deformed vertex, ready for draw submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// A skinned mesh: vertices plus the mesh's own placement transform.
///
/// The placement is applied after blending, so bones deform in skeleton
/// space and the whole result is then moved to where the mesh sits.
#[derive(Debug, Clone)]
pub struct SkinnedMesh {
    pub vertices: Vec<SkinnedVertex>,
    pub placement: Affine3A,
}

impl SkinnedMesh {
    #[must_use]
    pub fn new(vertices: Vec<SkinnedVertex>) -> Self {
        Self {
            vertices,
            placement: Affine3A::IDENTITY,
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: Affine3A) -> Self {
        self.placement = placement;
        self
    }

    /// Deforms every vertex into `out`.
    ///
    /// `out` is cleared and refilled, so a caller that keeps the buffer
    /// around pays no steady-state allocation on this path.
    pub fn deform_into(&self, skeleton: &Skeleton, out: &mut Vec<DeformedVertex>) {
        out.clear();
        out.reserve(self.vertices.len());

        let placement_normal = math::normal_matrix(&self.placement);
        for vertex in &self.vertices {
            let (position, normal) = vertex.deform(skeleton);
            out.push(DeformedVertex {
                position: self.placement.transform_point3(position),
                normal: placement_normal * normal,
                uv: vertex.uv,
            });
        }
    }
}
