//! Shared builders and assert helpers for skeleton and IK tests.

use marionette_channel_core::{Channel, ChannelFormulas, ChannelSystem};
use marionette_math::RotationOrder;
use marionette_skeleton_core::{Bone, BoneSystem, ChannelTriplet};
use nalgebra::Vector3;

/// Assembles a matching channel system + bone system from terse bone
/// definitions, one channel per transform component, named the way the
/// import pipeline names them.
#[derive(Default)]
pub struct BoneSystemBuilder {
    channels: Vec<Channel>,
    bones: Vec<Bone>,
}

impl BoneSystemBuilder {
    pub fn new() -> BoneSystemBuilder {
        BoneSystemBuilder::default()
    }

    fn add_channel(&mut self, name: String, initial_value: f64) -> Channel {
        let channel = Channel::new(
            name.clone(),
            self.channels.len(),
            None,
            initial_value,
            0.0,
            0.0,
            false,
            true,
            false,
            Some(name),
        );
        self.channels.push(channel.clone());
        channel
    }

    fn add_channel_triplet(&mut self, prefix: &str, initial_value: Vector3<f32>) -> ChannelTriplet {
        let x = self.add_channel(format!("{prefix}/x"), f64::from(initial_value.x));
        let y = self.add_channel(format!("{prefix}/y"), f64::from(initial_value.y));
        let z = self.add_channel(format!("{prefix}/z"), f64::from(initial_value.z));
        ChannelTriplet::new(x, y, z)
    }

    /// Add a bone and return its index. Parents must be added first.
    pub fn add_bone(
        &mut self,
        name: &str,
        parent: Option<usize>,
        center_point: Vector3<f32>,
        end_point: Vector3<f32>,
        orientation: Vector3<f32>,
    ) -> usize {
        let index = self.bones.len();
        let bone = Bone::new(
            name,
            index,
            parent,
            RotationOrder::XYZ,
            false,
            self.add_channel_triplet(&format!("{name}?center_point"), center_point),
            self.add_channel_triplet(&format!("{name}?end_point"), end_point),
            self.add_channel_triplet(&format!("{name}?orientation"), orientation),
            self.add_channel_triplet(&format!("{name}?rotation"), Vector3::zeros()),
            self.add_channel_triplet(&format!("{name}?translation"), Vector3::zeros()),
            self.add_channel_triplet(&format!("{name}?scale"), Vector3::new(1.0, 1.0, 1.0)),
            self.add_channel(format!("{name}?scale/general"), 1.0),
        );
        self.bones.push(bone);
        index
    }

    pub fn build_channel_system(&self) -> ChannelSystem {
        let formulas = vec![ChannelFormulas::default(); self.channels.len()];
        ChannelSystem::new(None, self.channels.clone(), formulas)
            .expect("builder channels are well-formed")
    }

    pub fn build_bone_system(&self) -> BoneSystem {
        BoneSystem::new(self.bones.clone()).expect("builder bones are well-formed")
    }
}

/// Assert two vectors agree componentwise within `epsilon`.
pub fn assert_vector3_near(expected: Vector3<f32>, actual: Vector3<f32>, epsilon: f32) {
    let distance = (expected - actual).norm();
    assert!(
        distance <= epsilon,
        "expected {expected} within {epsilon} of {actual}, distance was {distance}"
    );
}
