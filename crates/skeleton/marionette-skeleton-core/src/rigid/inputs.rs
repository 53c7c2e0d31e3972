use nalgebra::Vector3;

/// The pose parameters of one rigid bone: rotation angles in degrees plus a
/// translation, mirroring the bone's rotation and translation triplets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBonePose {
    pub rotation: Vector3<f32>,
    pub translation: Vector3<f32>,
}

/// Pose-only inputs for the whole rigid skeleton, one slot per bone.
///
/// Created and discarded per solve; the rigid system itself stays untouched
/// between synchronizations.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBoneSystemInputs {
    pub poses: Vec<RigidBonePose>,
}

impl RigidBoneSystemInputs {
    pub fn new(bone_count: usize) -> RigidBoneSystemInputs {
        RigidBoneSystemInputs {
            poses: vec![RigidBonePose::default(); bone_count],
        }
    }

    pub fn bone_count(&self) -> usize {
        self.poses.len()
    }

    pub fn clear_to_zero(&mut self) {
        for pose in &mut self.poses {
            *pose = RigidBonePose::default();
        }
    }

    /// Zero every pose except the root's, keeping gross placement.
    pub fn clear_non_root(&mut self) {
        for pose in &mut self.poses[1..] {
            *pose = RigidBonePose::default();
        }
    }
}
