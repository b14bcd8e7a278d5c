#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod errors;
pub mod math;
pub mod skeleton;
pub mod skinning;

pub use animation::{Animation, AnimationPose, BindPose, BoneTransform, Pose};
pub use errors::{MarionetteError, Result};
pub use math::EulerXyz;
pub use skeleton::{
    AxisFlags, Bone, BoneRecord, ConstraintKind, ConstraintRecord, CoordinateSystem, CopyRotation,
    MixMode, Skeleton, SkeletonBuilder,
};
pub use skinning::{BoneBinding, DeformedVertex, SkinnedMesh, SkinnedVertex};
