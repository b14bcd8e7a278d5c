use glam::{Quat, Vec2, Vec3};
use marionette::{
    BindPose, BoneBinding, BoneRecord, BoneTransform, CopyRotation, MixMode, Pose, SkinnedMesh,
    SkinnedVertex, Skeleton,
};

/// Procedural pose: swings the "upper" bone about X, everything else rests.
struct SwingPose {
    angle: f32,
}

impl Pose for SwingPose {
    fn transform_for(&self, bone: &str) -> Option<BoneTransform> {
        (bone == "upper").then(|| BoneTransform::from_rotation(Quat::from_rotation_x(self.angle)))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // A three-bone chain: root -> upper -> tip, one unit apart along Y.
    // The tip copies half of the upper bone's rotation on top of its own.
    let mut builder = Skeleton::builder();
    let root = builder.add_bone(BoneRecord::new("root"));
    let upper = builder.add_bone(BoneRecord::new("upper").with_parent(root).with_offset(Vec3::Y));
    let tip = builder.add_bone(BoneRecord::new("tip").with_parent(upper).with_offset(Vec3::Y));
    builder.add_copy_rotation(
        CopyRotation::new(tip, upper)
            .with_influence(0.5)
            .with_mix_mode(MixMode::After),
    );
    let mut skeleton = builder.build()?;

    // A thin strip along the chain, each ring bound to the nearest bone.
    let mut vertices = Vec::new();
    for (bone, height) in [(root, 0.0_f32), (upper, 1.0), (tip, 2.0)] {
        for side in [-0.1_f32, 0.1] {
            vertices.push(SkinnedVertex::new(
                Vec3::new(side, height, 0.0),
                Vec3::Z,
                Vec2::new(side + 0.5, height / 2.0),
                &[BoneBinding::new(bone, 1.0)],
            ));
        }
    }
    let mesh = SkinnedMesh::new(vertices);

    let mut deformed = Vec::new();

    skeleton.setup(&BindPose);
    mesh.deform_into(&skeleton, &mut deformed);
    println!("bind pose:");
    for vertex in &deformed {
        println!("  {:?}", vertex.position);
    }

    for step in 1..=4 {
        let angle = step as f32 * 0.2;
        skeleton.setup(&SwingPose { angle });
        mesh.deform_into(&skeleton, &mut deformed);
        println!("swing {angle:.1} rad:");
        for vertex in &deformed {
            println!("  {:?}", vertex.position);
        }
    }

    println!("tip head at {:?}", skeleton.bone_by_name("tip").unwrap().head_position());
    Ok(())
}
