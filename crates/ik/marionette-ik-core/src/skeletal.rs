use marionette_math::rotate_between;
use marionette_skeleton_core::{RigidBoneSystem, RigidBoneSystemInputs, StagedSkinningTransform};
use nalgebra::Vector3;

use crate::goal::IkGoal;

/// Damped rotate-toward-target sweep over the rigid skeleton.
///
/// One iteration walks from the goal's source bone up to (but not including)
/// the root. Each bone gets the world-space rotation that would swing the
/// current effector onto the target, conjugated into its local frame,
/// blended in by `weight` and clamped by the bone's rotation constraint.
/// Solvers may propose out-of-range rotations; limits clip them after the
/// fact.
pub struct SkeletalIkSolver {
    weight: f32,
}

impl Default for SkeletalIkSolver {
    fn default() -> SkeletalIkSolver {
        SkeletalIkSolver { weight: 0.5 }
    }
}

impl SkeletalIkSolver {
    pub fn new(weight: f32) -> SkeletalIkSolver {
        SkeletalIkSolver { weight }
    }

    fn apply_correction(
        &self,
        bone_system: &RigidBoneSystem,
        bone_transforms: &[StagedSkinningTransform],
        bone_index: usize,
        inputs: &mut RigidBoneSystemInputs,
        source_position: &mut Vector3<f32>,
        target_position: Vector3<f32>,
    ) {
        let bone = &bone_system.bones()[bone_index];
        let bone_transform = bone_transforms[bone_index];
        let center_position = bone_transform.transform(bone.center_point());

        let rotation_correction = rotate_between(
            *source_position - center_position,
            target_position - center_position,
        );

        let world_rotation = bone_transform.rotation_stage.rotation();
        let local_rotation_correction =
            world_rotation.inverse() * rotation_correction * world_rotation;

        let base_local_rotation = bone.get_rotation(inputs);
        let lerped_rotation =
            base_local_rotation.nlerp(&(base_local_rotation * local_rotation_correction), self.weight);

        bone.set_rotation(inputs, lerped_rotation, true);

        let parent_transform = match bone.parent() {
            Some(parent) => bone_transforms[parent],
            None => StagedSkinningTransform::identity(),
        };
        let new_bone_transform = bone.get_chained_transform(inputs, &parent_transform);
        *source_position =
            new_bone_transform.transform(bone_transform.inverse_transform(*source_position));
    }

    /// One solve iteration; call repeatedly (typically once per frame) for
    /// smooth convergence. Unreachable targets are not an error, the chain
    /// just settles at its closest feasible pose.
    pub fn solve(
        &self,
        bone_system: &RigidBoneSystem,
        goal: &IkGoal,
        inputs: &mut RigidBoneSystemInputs,
    ) {
        let bone_transforms = bone_system.get_bone_transforms(inputs);
        let mut source_position =
            bone_transforms[goal.source_bone].transform(goal.unposed_source_position);

        let mut bone_index = goal.source_bone;
        while bone_index != 0 {
            self.apply_correction(
                bone_system,
                &bone_transforms,
                bone_index,
                inputs,
                &mut source_position,
                goal.target_position,
            );
            match bone_system.bones()[bone_index].parent() {
                Some(parent) => bone_index = parent,
                None => break,
            }
        }

        log::trace!(
            "skeletal ik iteration: effector at {source_position}, target {}",
            goal.target_position
        );
    }
}
