//! Vertex skinning tests
//!
//! Tests for:
//! - Weight filtering and renormalization at construction
//! - Rigid (unbound) vertices
//! - Single full-weight binding vs. direct bone transform
//! - Multi-bone blending and order independence
//! - Unknown bone indices degrading to identity
//! - Mesh placement applied after blending

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::{Affine3A, Quat, Vec2, Vec3};
use marionette::{
    BindPose, BoneBinding, BoneRecord, BoneTransform, DeformedVertex, Pose, SkinnedMesh,
    SkinnedVertex, Skeleton,
};

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

struct MapPose(HashMap<String, BoneTransform>);

impl MapPose {
    fn new(entries: &[(&str, BoneTransform)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(name, transform)| ((*name).to_string(), *transform))
                .collect(),
        )
    }
}

impl Pose for MapPose {
    fn transform_for(&self, bone: &str) -> Option<BoneTransform> {
        self.0.get(bone).copied()
    }
}

fn chain() -> Skeleton {
    let mut builder = Skeleton::builder();
    let root = builder.add_bone(BoneRecord::new("root"));
    let mid = builder.add_bone(BoneRecord::new("mid").with_parent(root).with_offset(Vec3::Y));
    builder.add_bone(BoneRecord::new("tip").with_parent(mid).with_offset(Vec3::Y));
    builder.build().expect("chain builds")
}

// ============================================================================
// Construction: weight normalization
// ============================================================================

#[test]
fn weights_renormalize_to_sum_one() {
    let vertex = SkinnedVertex::new(
        Vec3::ZERO,
        Vec3::Y,
        Vec2::ZERO,
        &[BoneBinding::new(0, 0.3), BoneBinding::new(1, 0.3)],
    );
    let weights: Vec<f32> = vertex.bindings().iter().map(|b| b.weight).collect();
    assert_eq!(weights.len(), 2);
    assert!((weights[0] - 0.5).abs() < EPSILON);
    assert!((weights[1] - 0.5).abs() < EPSILON);
}

#[test]
fn nonpositive_weights_discarded() {
    let vertex = SkinnedVertex::new(
        Vec3::ZERO,
        Vec3::Y,
        Vec2::ZERO,
        &[
            BoneBinding::new(0, -1.0),
            BoneBinding::new(1, 2.0),
            BoneBinding::new(2, 0.0),
        ],
    );
    assert_eq!(vertex.bindings().len(), 1);
    assert_eq!(vertex.bindings()[0].bone, 1);
    assert!((vertex.bindings()[0].weight - 1.0).abs() < EPSILON);
}

#[test]
fn all_nonpositive_weights_mean_rigid() {
    let vertex = SkinnedVertex::new(
        Vec3::X,
        Vec3::Y,
        Vec2::ZERO,
        &[BoneBinding::new(0, 0.0), BoneBinding::new(1, -0.5)],
    );
    assert!(vertex.is_rigid());
}

// ============================================================================
// Deformation
// ============================================================================

#[test]
fn single_full_binding_matches_bone_transform() {
    let mut skeleton = chain();
    skeleton.setup(&MapPose::new(&[(
        "mid",
        BoneTransform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
    )]));

    let bind_position = Vec3::new(0.2, 2.0, 0.0);
    let bind_normal = Vec3::Z;
    let vertex = SkinnedVertex::new(
        bind_position,
        bind_normal,
        Vec2::ZERO,
        &[BoneBinding::new(2, 1.0)],
    );

    let (position, normal) = vertex.deform(&skeleton);
    let tip = skeleton.bone(2);
    assert!(vec3_approx(position, tip.transform_point(bind_position)));
    assert!(vec3_approx(normal, tip.transform_normal(bind_normal)));
}

#[test]
fn rigid_vertex_ignores_pose() {
    let mut skeleton = chain();
    skeleton.setup(&MapPose::new(&[(
        "root",
        BoneTransform::from_rotation(Quat::from_rotation_z(2.0)),
    )]));

    let vertex = SkinnedVertex::rigid(Vec3::new(3.0, 1.0, -2.0), Vec3::X, Vec2::ZERO);
    let (position, normal) = vertex.deform(&skeleton);
    assert!(vec3_approx(position, Vec3::new(3.0, 1.0, -2.0)));
    assert!(vec3_approx(normal, Vec3::X));
}

#[test]
fn unknown_bone_index_degrades_to_identity() {
    let mut skeleton = chain();
    skeleton.setup(&BindPose);

    let vertex = SkinnedVertex::new(
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::Y,
        Vec2::ZERO,
        &[BoneBinding::new(99, 1.0)],
    );
    let (position, _) = vertex.deform(&skeleton);
    assert!(vec3_approx(position, Vec3::new(1.0, 1.0, 1.0)));
}

#[test]
fn blend_accumulates_from_bind_data() {
    // Two free bones: "anchor" holds still, "shift" translates by +2X in its
    // pose. A vertex split 50/50 lands exactly halfway.
    let mut builder = Skeleton::builder();
    let anchor = builder.add_bone(BoneRecord::new("anchor"));
    let shift = builder.add_bone(BoneRecord::new("shift"));
    let mut skeleton = builder.build().unwrap();
    skeleton.setup(&MapPose::new(&[(
        "shift",
        BoneTransform::from_translation(Vec3::new(2.0, 0.0, 0.0)),
    )]));

    let vertex = SkinnedVertex::new(
        Vec3::ZERO,
        Vec3::Y,
        Vec2::ZERO,
        &[BoneBinding::new(anchor, 1.0), BoneBinding::new(shift, 1.0)],
    );
    let (position, _) = vertex.deform(&skeleton);
    assert!(vec3_approx(position, Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn blend_is_order_independent() {
    let mut skeleton = chain();
    skeleton.setup(&MapPose::new(&[
        ("root", BoneTransform::from_rotation(Quat::from_rotation_z(0.5))),
        ("mid", BoneTransform::from_rotation(Quat::from_rotation_x(0.8))),
    ]));

    let bind = Vec3::new(0.5, 1.5, 0.0);
    let forward = SkinnedVertex::new(
        bind,
        Vec3::Z,
        Vec2::ZERO,
        &[BoneBinding::new(1, 0.7), BoneBinding::new(2, 0.3)],
    );
    let reversed = SkinnedVertex::new(
        bind,
        Vec3::Z,
        Vec2::ZERO,
        &[BoneBinding::new(2, 0.3), BoneBinding::new(1, 0.7)],
    );

    let (a, an) = forward.deform(&skeleton);
    let (b, bn) = reversed.deform(&skeleton);
    assert!(vec3_approx(a, b));
    assert!(vec3_approx(an, bn));
}

#[test]
fn normal_follows_bone_rotation() {
    let mut skeleton = chain();
    skeleton.setup(&MapPose::new(&[(
        "root",
        BoneTransform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
    )]));

    let vertex = SkinnedVertex::new(
        Vec3::ZERO,
        Vec3::Z,
        Vec2::ZERO,
        &[BoneBinding::new(0, 1.0)],
    );
    let (_, normal) = vertex.deform(&skeleton);
    assert!(vec3_approx(normal, Vec3::new(0.0, -1.0, 0.0)));
}

// ============================================================================
// Mesh placement
// ============================================================================

#[test]
fn placement_applied_after_blending() {
    let mut skeleton = chain();
    skeleton.setup(&MapPose::new(&[(
        "mid",
        BoneTransform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
    )]));

    // tip origin sits at (0,1,1) after the swing; the placement then shoves
    // the whole mesh +5X.
    let mesh = SkinnedMesh::new(vec![SkinnedVertex::new(
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::Z,
        Vec2::new(0.25, 0.75),
        &[BoneBinding::new(2, 1.0)],
    )])
    .with_placement(Affine3A::from_translation(Vec3::new(5.0, 0.0, 0.0)));

    let mut out: Vec<DeformedVertex> = Vec::new();
    mesh.deform_into(&skeleton, &mut out);
    assert_eq!(out.len(), 1);
    assert!(vec3_approx(out[0].position, Vec3::new(5.0, 1.0, 1.0)));
    assert!((out[0].uv - Vec2::new(0.25, 0.75)).length() < EPSILON);
}

#[test]
fn placement_rotates_normals_too() {
    let mut skeleton = chain();
    skeleton.setup(&BindPose);

    let mesh = SkinnedMesh::new(vec![SkinnedVertex::rigid(Vec3::ZERO, Vec3::Z, Vec2::ZERO)])
        .with_placement(Affine3A::from_quat(Quat::from_rotation_x(FRAC_PI_2)));

    let mut out = Vec::new();
    mesh.deform_into(&skeleton, &mut out);
    assert!(vec3_approx(out[0].normal, Vec3::new(0.0, -1.0, 0.0)));
}

#[test]
fn deform_into_reuses_buffer() {
    let mut skeleton = chain();
    skeleton.setup(&BindPose);

    let mesh = SkinnedMesh::new(vec![
        SkinnedVertex::rigid(Vec3::ZERO, Vec3::Y, Vec2::ZERO),
        SkinnedVertex::rigid(Vec3::X, Vec3::Y, Vec2::ZERO),
    ]);

    let mut out = Vec::new();
    mesh.deform_into(&skeleton, &mut out);
    mesh.deform_into(&skeleton, &mut out);
    assert_eq!(out.len(), 2);
}
