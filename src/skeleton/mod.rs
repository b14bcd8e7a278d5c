//! Bone hierarchy, procedural constraints, and the per-frame scheduler.
//!
//! - [`Bone`]: a joint node with bind and posed transforms
//! - [`SkeletonBuilder`]: records a declarative description, validates it,
//!   and linearizes the dependency graphs into a replayable operation list
//! - [`Skeleton`]: the built bone arena; `setup` replays the list each frame
//! - `constraint`: the copy-rotation rule and its wire-format decoders

pub mod bone;
pub mod builder;
pub mod constraint;
mod schedule;
pub mod skeleton;

pub use bone::Bone;
pub use builder::{BoneRecord, SkeletonBuilder};
pub use constraint::{
    AxisFlags, ConstraintKind, ConstraintRecord, CoordinateSystem, CopyRotation, MixMode,
};
pub use skeleton::Skeleton;
