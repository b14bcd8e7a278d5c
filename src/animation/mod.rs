pub mod pose;

pub use pose::{Animation, AnimationPose, BindPose, BoneTransform, Pose};
