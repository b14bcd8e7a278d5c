use rustc_hash::FxHashMap;

use crate::animation::Pose;
use crate::skeleton::bone::Bone;
use crate::skeleton::builder::SkeletonBuilder;
use crate::skeleton::constraint::CopyRotation;

/// One step of the per-frame operation list.
///
/// The list is computed once at build time and replayed verbatim by every
/// [`Skeleton::setup`] call, in three phases: pose application, parenting
/// interleaved with constraints, normal-matrix refresh.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BoneOp {
    Pose { bone: usize },
    Parent { child: usize, parent: usize },
    Constraint { index: usize },
    Normals { bone: usize },
}

/// A built skeleton: flat bone arena, name lookup, and the replayable
/// operation list.
///
/// Skeletons are immutable apart from `setup`; a reload builds a fresh
/// instance and swaps it in wholesale between frames. Distinct instances
/// share nothing and are safe to process in parallel; one instance's `setup`
/// is not reentrant.
#[derive(Debug)]
pub struct Skeleton {
    bones: Vec<Bone>,
    by_name: FxHashMap<String, usize>,
    constraints: Vec<CopyRotation>,
    ops: Vec<BoneOp>,
    static_bone: Bone,
}

impl Skeleton {
    #[must_use]
    pub fn builder() -> SkeletonBuilder {
        SkeletonBuilder::new()
    }

    /// A skeleton with no bones. `setup` is a no-op and every index resolves
    /// to the static bone; useful as a fallback when a load fails and no
    /// prior skeleton exists to keep.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), FxHashMap::default(), Vec::new(), Vec::new())
    }

    pub(crate) fn from_parts(
        bones: Vec<Bone>,
        by_name: FxHashMap<String, usize>,
        constraints: Vec<CopyRotation>,
        ops: Vec<BoneOp>,
    ) -> Self {
        Self {
            bones,
            by_name,
            constraints,
            ops,
            static_bone: Bone::identity(),
        }
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Resolves a bone by index. Out-of-range indices yield the static
    /// identity bone, so malformed skinning data degrades silently instead
    /// of faulting the frame.
    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> &Bone {
        self.bones.get(index).unwrap_or(&self.static_bone)
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bone_index(name).map(|index| &self.bones[index])
    }

    /// Poses every bone for the current frame.
    ///
    /// Replays the precomputed operation list; must complete before any bone
    /// transform is read. Bones the pose does not know stay at their bind
    /// transform. Never fails, whatever the pose returns.
    pub fn setup(&mut self, pose: &dyn Pose) {
        for i in 0..self.ops.len() {
            let op = self.ops[i];
            match op {
                BoneOp::Pose { bone } => {
                    let local = pose
                        .transform_for(self.bones[bone].name())
                        .unwrap_or_default()
                        .to_affine();
                    self.bones[bone].apply_pose(&local);
                }
                BoneOp::Parent { child, parent } => {
                    let parent_transform = self.bones[parent].transform();
                    self.bones[child].apply_parent(&parent_transform);
                }
                BoneOp::Constraint { index } => {
                    let constraint = self.constraints[index];
                    constraint.apply(&mut self.bones);
                }
                BoneOp::Normals { bone } => {
                    self.bones[bone].recompute_normal_matrix();
                }
            }
        }
    }

    /// Human-readable names of the per-frame operations, in replay order.
    /// Debug/diagnostic helper; the format is not stable.
    #[must_use]
    pub fn operation_names(&self) -> Vec<String> {
        self.ops
            .iter()
            .map(|op| match *op {
                BoneOp::Pose { bone } => format!("pose({})", self.bones[bone].name()),
                BoneOp::Parent { child, parent } => format!(
                    "\"{}\".parent = \"{}\"",
                    self.bones[child].name(),
                    self.bones[parent].name()
                ),
                BoneOp::Constraint { index } => {
                    let constraint = &self.constraints[index];
                    format!(
                        "copyRot({} -> {})",
                        self.bones[constraint.target].name(),
                        self.bones[constraint.controlled].name()
                    )
                }
                BoneOp::Normals { bone } => format!("normals({})", self.bones[bone].name()),
            })
            .collect()
    }
}
