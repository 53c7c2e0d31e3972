//! JSON form of a complete figure recipe.
//!
//! The persisted layout is the import pipeline's boundary contract: channels,
//! formulas and bones as flat records keyed by string name. Indices are
//! assigned fresh on every bake and never serialized.

use std::sync::Arc;

use marionette_channel_core::{ChannelSystem, ChannelSystemRecipe};
use serde::{Deserialize, Serialize};

use crate::bone_system::BoneSystem;
use crate::error::StoredFigureError;
use crate::recipe::BoneSystemRecipe;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FigureRecipe {
    #[serde(default)]
    pub name: Option<String>,
    pub channel_system: ChannelSystemRecipe,
    pub bone_system: BoneSystemRecipe,
}

impl FigureRecipe {
    /// Bake into a runtime channel system + skeleton pair. `parent` links a
    /// derived figure (clothing, hair) to the figure it extends.
    pub fn bake(
        &self,
        parent: Option<Arc<ChannelSystem>>,
    ) -> Result<(Arc<ChannelSystem>, BoneSystem), StoredFigureError> {
        let channel_system = Arc::new(self.channel_system.bake(parent)?);
        let bone_system = self.bone_system.bake(&channel_system)?;
        Ok((channel_system, bone_system))
    }
}

pub fn parse_figure_recipe_json(json: &str) -> Result<FigureRecipe, StoredFigureError> {
    Ok(serde_json::from_str(json)?)
}
