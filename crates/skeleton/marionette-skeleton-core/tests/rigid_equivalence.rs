//! The rigid cache's core contract: for poses expressible purely via pose
//! channels, the pose-only path and the full channel-graph path must agree.

use std::sync::Arc;

use marionette_channel_core::SetMask;
use marionette_skeleton_core::RigidBoneSystem;
use marionette_test_fixtures::BoneSystemBuilder;
use nalgebra::{UnitQuaternion, Vector3};

#[test]
fn rigid_and_full_paths_agree_on_posed_points() {
    let mut builder = BoneSystemBuilder::new();
    let bone0 = builder.add_bone(
        "bone0",
        None,
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(2.0, 0.0, 0.0),
        Vector3::zeros(),
    );
    let bone1 = builder.add_bone(
        "bone1",
        Some(bone0),
        Vector3::new(2.0, 0.0, 0.0),
        Vector3::new(3.0, 0.0, 0.0),
        Vector3::zeros(),
    );
    let bone2 = builder.add_bone(
        "bone2",
        Some(bone1),
        Vector3::new(3.0, 0.0, 0.0),
        Vector3::new(4.0, 0.0, 0.0),
        Vector3::zeros(),
    );

    let channel_system = builder.build_channel_system();
    let bone_system = Arc::new(builder.build_bone_system());
    let mut rigid_bone_system = RigidBoneSystem::new(bone_system.clone());

    // shape the figure: scales and translations through the channel path
    let mut base_inputs = channel_system.make_default_channel_inputs();
    let bones = bone_system.bones();
    bones[bone1]
        .scale()
        .set_value(&mut base_inputs, Vector3::new(2.0, 3.0, 4.0), SetMask::ANY);
    bones[bone1]
        .translation()
        .set_value(&mut base_inputs, Vector3::new(4.0, 5.0, 6.0), SetMask::ANY);
    bones[bone2]
        .translation()
        .set_value(&mut base_inputs, Vector3::new(5.0, 6.0, 7.0), SetMask::ANY);

    let base_outputs = channel_system.evaluate(None, &base_inputs);
    rigid_bone_system.synchronize(&base_outputs);
    let rigid_base_inputs = rigid_bone_system.read_inputs(&base_outputs);

    // pose every joint through the rigid path
    let mut rigid_inputs = rigid_base_inputs.clone();
    let rotations = [
        UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        UnitQuaternion::from_euler_angles(0.2, 0.3, 0.4),
        UnitQuaternion::from_euler_angles(0.3, 0.4, 0.5),
    ];
    for (bone, rotation) in rigid_bone_system.bones().iter().zip(rotations) {
        bone.set_rotation(&mut rigid_inputs, rotation, false);
    }

    // carry the same pose back into the channel path
    let mut inputs = base_inputs.clone();
    rigid_bone_system.write_inputs(&mut inputs, &base_outputs, &rigid_inputs);
    let outputs = channel_system.evaluate(None, &inputs);

    let base_transforms = bone_system.get_bone_transforms(&base_outputs);
    let transforms = bone_system.get_bone_transforms(&outputs);

    let rigid_base_transforms = rigid_bone_system.get_bone_transforms(&rigid_base_inputs);
    let rigid_transforms = rigid_bone_system.get_bone_transforms(&rigid_inputs);

    let test_points = [
        Vector3::zeros(),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, 1.0),
    ];

    for transform_idx in 0..transforms.len() {
        for test_point in test_points {
            let unposed_point = base_transforms[transform_idx].inverse_transform(test_point);
            let posed_point = transforms[transform_idx].transform(unposed_point);

            let unposed_rigid_point =
                rigid_base_transforms[transform_idx].inverse_transform(test_point);
            let posed_rigid_point = rigid_transforms[transform_idx].transform(unposed_rigid_point);

            let distance = (posed_point - posed_rigid_point).norm();
            assert!(
                distance < 1e-3,
                "bone {transform_idx}, point {test_point}: full path {posed_point} vs rigid path {posed_rigid_point}"
            );
        }
    }
}

#[test]
fn apply_and_calculate_deltas_are_inverse() {
    let mut builder = BoneSystemBuilder::new();
    let bone0 = builder.add_bone(
        "bone0",
        None,
        Vector3::zeros(),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::zeros(),
    );
    builder.add_bone(
        "bone1",
        Some(bone0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(2.0, 0.0, 0.0),
        Vector3::zeros(),
    );

    let channel_system = builder.build_channel_system();
    let bone_system = Arc::new(builder.build_bone_system());
    let mut rigid_bone_system = RigidBoneSystem::new(bone_system);

    let outputs = channel_system.evaluate(None, &channel_system.make_default_channel_inputs());
    rigid_bone_system.synchronize(&outputs);

    let base = rigid_bone_system.read_inputs(&outputs);

    let mut delta = rigid_bone_system.make_zero_inputs();
    delta.poses[0].rotation = Vector3::new(10.0, -5.0, 3.0);
    delta.poses[0].translation = Vector3::new(0.5, 0.0, -0.25);
    delta.poses[1].rotation = Vector3::new(-20.0, 15.0, 0.0);

    let sum = rigid_bone_system.apply_deltas(&base, &delta);
    let recovered = rigid_bone_system.calculate_deltas(&base, &sum);

    for bone_idx in 0..2 {
        let expected = delta.poses[bone_idx];
        let actual = recovered.poses[bone_idx];
        assert!(
            (expected.rotation - actual.rotation).norm() < 1e-3,
            "rotation delta round trip failed for bone {bone_idx}"
        );
        assert!(
            (expected.translation - actual.translation).norm() < 1e-3,
            "translation delta round trip failed for bone {bone_idx}"
        );
    }
}
