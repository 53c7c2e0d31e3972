//! Flat, serializable bone records.
//!
//! A bone recipe carries only names; the channel triplets backing the bone
//! are resolved at bake time from the channel system using the
//! `<bone>?center_point/x` naming convention of the import pipeline.

use hashbrown::HashMap;
use marionette_channel_core::ChannelSystem;
use marionette_math::RotationOrder;
use serde::{Deserialize, Serialize};

use crate::bone::Bone;
use crate::bone_system::BoneSystem;
use crate::channel_triplet::ChannelTriplet;
use crate::error::SkeletonError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoneRecipe {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub rotation_order: String,
    #[serde(default)]
    pub inherits_scale: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoneSystemRecipe {
    pub bones: Vec<BoneRecipe>,
}

impl BoneRecipe {
    fn bake(
        &self,
        index: usize,
        channel_system: &ChannelSystem,
        bones_by_name: &HashMap<String, usize>,
    ) -> Result<Bone, SkeletonError> {
        let name = &self.name;

        let triplet = |suffix: &str| {
            ChannelTriplet::lookup(channel_system, name, &format!("{name}?{suffix}"))
        };

        let center_point = triplet("center_point")?;
        let end_point = triplet("end_point")?;
        let orientation = triplet("orientation")?;
        let rotation = triplet("rotation")?;
        let translation = triplet("translation")?;
        let scale = triplet("scale")?;

        let general_scale_name = format!("{name}?scale/general");
        let general_scale = channel_system
            .channel_by_name(&general_scale_name)
            .cloned()
            .ok_or_else(|| SkeletonError::UnknownChannel {
                bone: name.clone(),
                channel: general_scale_name,
            })?;

        let parent = match &self.parent {
            Some(parent_name) => Some(*bones_by_name.get(parent_name).ok_or_else(|| {
                SkeletonError::UnknownParent {
                    bone: name.clone(),
                    parent: parent_name.clone(),
                }
            })?),
            None => None,
        };

        let rotation_order = RotationOrder::parse(&self.rotation_order).ok_or_else(|| {
            SkeletonError::InvalidRotationOrder {
                bone: name.clone(),
                value: self.rotation_order.clone(),
            }
        })?;

        Ok(Bone::new(
            name.clone(),
            index,
            parent,
            rotation_order,
            self.inherits_scale,
            center_point,
            end_point,
            orientation,
            rotation,
            translation,
            scale,
            general_scale,
        ))
    }
}

impl BoneSystemRecipe {
    pub fn bake(&self, channel_system: &ChannelSystem) -> Result<BoneSystem, SkeletonError> {
        let mut bones = Vec::with_capacity(self.bones.len());
        let mut bones_by_name: HashMap<String, usize> = HashMap::with_capacity(self.bones.len());

        for (index, recipe) in self.bones.iter().enumerate() {
            let bone = recipe.bake(index, channel_system, &bones_by_name)?;
            if bones_by_name.insert(recipe.name.clone(), index).is_some() {
                return Err(SkeletonError::DuplicateBone(recipe.name.clone()));
            }
            bones.push(bone);
        }

        log::debug!("baked bone system: {} bones", bones.len());

        BoneSystem::new(bones)
    }
}
