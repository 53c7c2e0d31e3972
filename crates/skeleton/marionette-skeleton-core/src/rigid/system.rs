use std::sync::Arc;

use hashbrown::HashMap;
use marionette_channel_core::{ChannelInputs, ChannelOutputs, SetMask};

use crate::bone_system::BoneSystem;
use crate::rigid::bone::RigidBone;
use crate::rigid::inputs::{RigidBonePose, RigidBoneSystemInputs};
use crate::staged_transform::StagedSkinningTransform;

/// The rigid mirror of a [`BoneSystem`].
///
/// Holds one [`RigidBone`] per source bone in the same arena order. All
/// shape-driven state is refreshed by [`synchronize`](Self::synchronize);
/// between synchronizations the system is read-only and may be shared across
/// any number of pose evaluations.
pub struct RigidBoneSystem {
    source: Arc<BoneSystem>,
    bones: Vec<RigidBone>,
    bones_by_name: HashMap<String, usize>,
}

impl RigidBoneSystem {
    pub fn new(source: Arc<BoneSystem>) -> RigidBoneSystem {
        let bones: Vec<RigidBone> = source.bones().iter().map(RigidBone::new).collect();
        let bones_by_name = source
            .bones()
            .iter()
            .map(|bone| (bone.name().to_string(), bone.index()))
            .collect();

        RigidBoneSystem {
            source,
            bones,
            bones_by_name,
        }
    }

    pub fn source(&self) -> &Arc<BoneSystem> {
        &self.source
    }

    pub fn bones(&self) -> &[RigidBone] {
        &self.bones
    }

    pub fn root_bone(&self) -> &RigidBone {
        &self.bones[0]
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&RigidBone> {
        self.bones_by_name.get(name).map(|&index| &self.bones[index])
    }

    /// Snapshot all shape-driven state from a full channel evaluation.
    ///
    /// Must be called again whenever any shape channel changes; the cache
    /// has no way to notice staleness on its own.
    pub fn synchronize(&mut self, outputs: &ChannelOutputs) {
        let outputs = outputs.root();

        for index in 0..self.bones.len() {
            let source_bone = &self.source.bones()[index];
            let source_parent = source_bone.parent().map(|p| &self.source.bones()[p]);
            let parent_chained_scaling = match source_bone.parent() {
                Some(p) => *self.bones[p].chained_scaling_transform(),
                None => marionette_math::ScalingTransform::identity(),
            };
            self.bones[index].synchronize(
                source_bone,
                source_parent,
                &parent_chained_scaling,
                outputs,
            );
        }

        log::debug!("synchronized rigid skeleton: {} bones", self.bones.len());
    }

    /// World-space transforms for every bone, pose-only path.
    pub fn get_bone_transforms(&self, inputs: &RigidBoneSystemInputs) -> Vec<StagedSkinningTransform> {
        let mut bone_transforms: Vec<StagedSkinningTransform> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let parent_transform = match bone.parent() {
                Some(index) => bone_transforms[index],
                None => StagedSkinningTransform::identity(),
            };
            bone_transforms.push(bone.get_chained_transform(inputs, &parent_transform));
        }
        bone_transforms
    }

    /// Chained transform of a single bone, walking its ancestry.
    pub fn get_chained_transform(
        &self,
        bone_index: usize,
        inputs: &RigidBoneSystemInputs,
    ) -> StagedSkinningTransform {
        let bone = &self.bones[bone_index];
        let parent_transform = match bone.parent() {
            Some(index) => self.get_chained_transform(index, inputs),
            None => StagedSkinningTransform::identity(),
        };
        bone.get_chained_transform(inputs, &parent_transform)
    }

    pub fn make_zero_inputs(&self) -> RigidBoneSystemInputs {
        RigidBoneSystemInputs::new(self.bones.len())
    }

    /// Read the current pose out of an evaluated channel snapshot.
    pub fn read_inputs(&self, channel_outputs: &ChannelOutputs) -> RigidBoneSystemInputs {
        let channel_outputs = channel_outputs.root();

        let mut inputs = RigidBoneSystemInputs::new(self.bones.len());
        for (index, source_bone) in self.source.bones().iter().enumerate() {
            inputs.poses[index] = RigidBonePose {
                rotation: source_bone.rotation().get_value(channel_outputs),
                translation: source_bone.translation().get_value(channel_outputs),
            };
        }
        inputs
    }

    /// Write a rigid pose back into channel inputs via set-effective-value,
    /// so formula contributions are compensated for.
    pub fn write_inputs(
        &self,
        channel_inputs: &mut ChannelInputs,
        channel_outputs: &ChannelOutputs,
        inputs: &RigidBoneSystemInputs,
    ) {
        let channel_outputs = channel_outputs.root();

        for (index, source_bone) in self.source.bones().iter().enumerate() {
            source_bone.rotation().set_effective_value(
                channel_inputs,
                channel_outputs,
                inputs.poses[index].rotation,
                SetMask::APPLY_CLAMP_AND_VISIBLE_ONLY,
            );
            source_bone.translation().set_effective_value(
                channel_inputs,
                channel_outputs,
                inputs.poses[index].translation,
                SetMask::APPLY_CLAMP_AND_VISIBLE_ONLY,
            );
        }
    }

    /// Add a delta pose onto a base pose, clamping every bone's rotation.
    /// The root translation delta is taken in the root's rotated frame.
    pub fn apply_deltas(
        &self,
        base_inputs: &RigidBoneSystemInputs,
        delta_inputs: &RigidBoneSystemInputs,
    ) -> RigidBoneSystemInputs {
        let mut sum_inputs = RigidBoneSystemInputs::new(self.bones.len());

        let base_root_rotation = self.root_bone().get_rotation(base_inputs);
        sum_inputs.poses[0].translation = base_inputs.poses[0].translation
            + base_root_rotation * delta_inputs.poses[0].translation;

        for (index, bone) in self.bones.iter().enumerate() {
            sum_inputs.poses[index].rotation = bone.constraint().clamp_rotation(
                base_inputs.poses[index].rotation + delta_inputs.poses[index].rotation,
            );
            if index != 0 {
                sum_inputs.poses[index].translation =
                    base_inputs.poses[index].translation + delta_inputs.poses[index].translation;
            }
        }

        sum_inputs
    }

    /// Inverse of [`apply_deltas`](Self::apply_deltas) modulo clamping.
    pub fn calculate_deltas(
        &self,
        base_inputs: &RigidBoneSystemInputs,
        sum_inputs: &RigidBoneSystemInputs,
    ) -> RigidBoneSystemInputs {
        let mut delta_inputs = RigidBoneSystemInputs::new(self.bones.len());

        let base_root_rotation = self.root_bone().get_rotation(base_inputs);
        delta_inputs.poses[0].translation = base_root_rotation.inverse()
            * (sum_inputs.poses[0].translation - base_inputs.poses[0].translation);

        for index in 0..self.bones.len() {
            delta_inputs.poses[index].rotation =
                sum_inputs.poses[index].rotation - base_inputs.poses[index].rotation;
            if index != 0 {
                delta_inputs.poses[index].translation =
                    sum_inputs.poses[index].translation - base_inputs.poses[index].translation;
            }
        }

        delta_inputs
    }
}
