use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::errors::{MarionetteError, Result};
use crate::skeleton::bone::Bone;
use crate::skeleton::constraint::{ConstraintRecord, CopyRotation};
use crate::skeleton::schedule;
use crate::skeleton::skeleton::{BoneOp, Skeleton};

/// A declarative bone entry: name, optional parent index, and the bind-local
/// transform relative to the parent (unit rotation + offset, no scale).
#[derive(Debug, Clone)]
pub struct BoneRecord {
    pub name: String,
    pub parent: Option<usize>,
    pub rotation: Quat,
    pub offset: Vec3,
}

impl BoneRecord {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            rotation: Quat::IDENTITY,
            offset: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    fn local_bind(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation, self.offset)
    }
}

/// Records a skeleton description and turns it into a [`Skeleton`].
///
/// Entries are recorded in declaration order; all validation, leveling, and
/// bone construction happen in [`SkeletonBuilder::build`], so the caller can
/// push records in whatever order its description format delivers them
/// (forward parent references included).
#[derive(Debug, Default)]
pub struct SkeletonBuilder {
    bones: Vec<BoneRecord>,
    constraints: Vec<ConstraintRecord>,
}

impl SkeletonBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a bone and returns its index.
    pub fn add_bone(&mut self, record: BoneRecord) -> usize {
        self.bones.push(record);
        self.bones.len() - 1
    }

    pub fn add_constraint(&mut self, record: ConstraintRecord) {
        self.constraints.push(record);
    }

    pub fn add_copy_rotation(&mut self, constraint: CopyRotation) {
        self.constraints.push(ConstraintRecord::CopyRotation(constraint));
    }

    /// Validates the description and builds the skeleton.
    ///
    /// Rejects duplicate bone names and out-of-range parent or constraint
    /// indices. Dependency cycles are not rejected — the scheduler breaks
    /// them with a warning so malformed data still renders.
    pub fn build(self) -> Result<Skeleton> {
        let bone_count = self.bones.len();

        let mut by_name = FxHashMap::default();
        for (index, record) in self.bones.iter().enumerate() {
            if by_name.insert(record.name.clone(), index).is_some() {
                return Err(MarionetteError::DuplicateBoneName {
                    name: record.name.clone(),
                });
            }
        }
        for record in &self.bones {
            if let Some(parent) = record.parent {
                if parent >= bone_count {
                    return Err(MarionetteError::BoneIndexOutOfBounds {
                        context: "bone parent",
                        index: parent,
                        count: bone_count,
                    });
                }
            }
        }
        for record in &self.constraints {
            let ConstraintRecord::CopyRotation(constraint) = record;
            if constraint.controlled >= bone_count {
                return Err(MarionetteError::BoneIndexOutOfBounds {
                    context: "constraint controlled bone",
                    index: constraint.controlled,
                    count: bone_count,
                });
            }
            if constraint.target >= bone_count {
                return Err(MarionetteError::BoneIndexOutOfBounds {
                    context: "constraint target bone",
                    index: constraint.target,
                    count: bone_count,
                });
            }
        }

        // Build graph: parent edges only. A bone's bind matrices depend on
        // its parent's, so bind composition runs in this order.
        let build_deps: Vec<Vec<usize>> = self
            .bones
            .iter()
            .map(|record| record.parent.into_iter().collect())
            .collect();
        let build_order = schedule::level_order(&build_deps);

        let locals: Vec<Affine3A> = self.bones.iter().map(BoneRecord::local_bind).collect();
        let mut local_to_global = locals.clone();
        for &index in &build_order {
            if let Some(parent) = self.bones[index].parent {
                local_to_global[index] = local_to_global[parent] * locals[index];
            }
        }

        let bones: Vec<Bone> = self
            .bones
            .iter()
            .zip(&local_to_global)
            .map(|(record, &l2g)| Bone::new(&record.name, record.parent, l2g))
            .collect();

        // Modifier graph: parent edges plus constraint target edges. Orders
        // the per-frame parenting and constraint operations.
        let mut modifier_deps = build_deps;
        let mut constraints = Vec::with_capacity(self.constraints.len());
        let mut constraints_by_bone: Vec<Vec<usize>> = vec![Vec::new(); bone_count];
        for record in self.constraints {
            let ConstraintRecord::CopyRotation(constraint) = record;
            modifier_deps[constraint.controlled].push(constraint.target);
            constraints_by_bone[constraint.controlled].push(constraints.len());
            constraints.push(constraint);
        }
        let modifier_order = schedule::level_order(&modifier_deps);

        // Per-frame operation list: pose every bone, then parenting
        // interleaved with the constraints controlling each bone (a
        // constraint must read fully parented transforms, and children of a
        // constrained bone must parent after the constraint ran), then
        // normal matrices.
        let mut ops = Vec::with_capacity(bone_count * 3 + constraints.len());
        for index in 0..bone_count {
            ops.push(BoneOp::Pose { bone: index });
        }
        for &index in &modifier_order {
            if let Some(parent) = bones[index].parent() {
                ops.push(BoneOp::Parent { child: index, parent });
            }
            for &slot in &constraints_by_bone[index] {
                ops.push(BoneOp::Constraint { index: slot });
            }
        }
        for index in 0..bone_count {
            ops.push(BoneOp::Normals { bone: index });
        }

        log::debug!(
            "skeleton built: {} bones, {} constraints, {} operations",
            bone_count,
            constraints.len(),
            ops.len()
        );

        Ok(Skeleton::from_parts(bones, by_name, constraints, ops))
    }
}
