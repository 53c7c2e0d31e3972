use hashbrown::HashMap;
use marionette_channel_core::ChannelOutputs;

use crate::bone::Bone;
use crate::error::SkeletonError;
use crate::staged_transform::StagedSkinningTransform;

/// The baked skeleton: an arena of bones where every parent precedes its
/// children. The ordering makes cycles structurally impossible and lets the
/// transform pass run as a single forward sweep.
pub struct BoneSystem {
    bones: Vec<Bone>,
    bones_by_name: HashMap<String, usize>,
}

impl BoneSystem {
    pub fn new(bones: Vec<Bone>) -> Result<BoneSystem, SkeletonError> {
        let mut bones_by_name = HashMap::with_capacity(bones.len());

        for (expected, bone) in bones.iter().enumerate() {
            if bone.index() != expected {
                return Err(SkeletonError::IndexMismatch {
                    bone: bone.name().to_string(),
                    actual: bone.index(),
                    expected,
                });
            }

            match bone.parent() {
                None => {
                    if bone.index() != 0 {
                        return Err(SkeletonError::RootNotFirst(bone.name().to_string()));
                    }
                }
                Some(parent) => {
                    if parent >= bone.index() {
                        return Err(SkeletonError::ParentOutOfOrder {
                            bone: bone.name().to_string(),
                        });
                    }
                }
            }

            if bones_by_name
                .insert(bone.name().to_string(), bone.index())
                .is_some()
            {
                return Err(SkeletonError::DuplicateBone(bone.name().to_string()));
            }
        }

        Ok(BoneSystem {
            bones,
            bones_by_name,
        })
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn root_bone(&self) -> &Bone {
        &self.bones[0]
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bones_by_name.get(name).map(|&index| &self.bones[index])
    }

    /// World-space transforms for every bone.
    ///
    /// Bones are bound to the root figure's channels, so a child figure's
    /// outputs are first walked up to the root snapshot.
    pub fn get_bone_transforms(&self, outputs: &ChannelOutputs) -> Vec<StagedSkinningTransform> {
        let outputs = outputs.root();

        let mut bone_transforms: Vec<StagedSkinningTransform> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let parent = bone.parent().map(|index| &self.bones[index]);
            let parent_transform = match bone.parent() {
                Some(index) => bone_transforms[index],
                None => StagedSkinningTransform::identity(),
            };
            bone_transforms.push(bone.get_chained_transform(parent, outputs, &parent_transform));
        }
        bone_transforms
    }

    /// Chained transform of a single bone, walking its ancestry.
    pub fn get_chained_transform(
        &self,
        bone_index: usize,
        outputs: &ChannelOutputs,
    ) -> StagedSkinningTransform {
        let outputs = outputs.root();
        self.chained_transform_inner(bone_index, outputs)
    }

    fn chained_transform_inner(
        &self,
        bone_index: usize,
        outputs: &ChannelOutputs,
    ) -> StagedSkinningTransform {
        let bone = &self.bones[bone_index];
        let parent = bone.parent().map(|index| &self.bones[index]);
        let parent_transform = match bone.parent() {
            Some(index) => self.chained_transform_inner(index, outputs),
            None => StagedSkinningTransform::identity(),
        };
        bone.get_chained_transform(parent, outputs, &parent_transform)
    }
}
