//! Flat, serializable recipe records for channels and formulas.
//!
//! Recipes are keyed purely by string name; channel indices are assigned
//! fresh at bake time and are never part of the persisted layout.

use std::sync::Arc;

use hashbrown::HashMap;
use marionette_math::{Knot, Spline};
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::BakeError;
use crate::evaluator::ChannelFormulas;
use crate::formula::{Formula, FormulaStage, Operation};
use crate::system::ChannelSystem;

fn default_visible() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelRecipe {
    pub name: String,
    #[serde(default)]
    pub initial_value: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub clamped: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationRecipe {
    PushChannel { channel: String },
    PushValue { value: f64 },
    Add,
    Sub,
    Mul,
    Div,
    SplineTcb { knots: Vec<Knot> },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormulaRecipe {
    pub output: String,
    pub stage: FormulaStage,
    pub operations: Vec<OperationRecipe>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChannelSystemRecipe {
    pub channels: Vec<ChannelRecipe>,
    #[serde(default)]
    pub formulas: Vec<FormulaRecipe>,
}

impl OperationRecipe {
    fn bake(&self, channels_by_name: &HashMap<String, usize>) -> Result<Operation, BakeError> {
        Ok(match self {
            OperationRecipe::PushChannel { channel } => {
                let index = *channels_by_name
                    .get(channel)
                    .ok_or_else(|| BakeError::UnknownChannel(channel.clone()))?;
                Operation::PushChannel(index)
            }
            OperationRecipe::PushValue { value } => Operation::PushValue(*value),
            OperationRecipe::Add => Operation::Add,
            OperationRecipe::Sub => Operation::Sub,
            OperationRecipe::Mul => Operation::Mul,
            OperationRecipe::Div => Operation::Div,
            OperationRecipe::SplineTcb { knots } => {
                Operation::EvalSpline(Spline::new(knots.clone()))
            }
        })
    }
}

impl ChannelSystemRecipe {
    /// Resolve names to dense indices and bake into a runtime system.
    ///
    /// A channel with the same name as one of the parent figure's channels
    /// becomes a child of that channel and adds the parent's evaluated value
    /// to its own base value.
    pub fn bake(&self, parent: Option<Arc<ChannelSystem>>) -> Result<ChannelSystem, BakeError> {
        let mut channels = Vec::with_capacity(self.channels.len());
        let mut channels_by_name: HashMap<String, usize> =
            HashMap::with_capacity(self.channels.len());

        for (index, recipe) in self.channels.iter().enumerate() {
            if channels_by_name.insert(recipe.name.clone(), index).is_some() {
                return Err(BakeError::DuplicateChannel(recipe.name.clone()));
            }

            let parent_channel = parent
                .as_ref()
                .and_then(|p| p.channel_by_name(&recipe.name))
                .map(|channel| channel.index());

            channels.push(Channel::new(
                recipe.name.clone(),
                index,
                parent_channel,
                recipe.initial_value,
                recipe.min,
                recipe.max,
                recipe.clamped,
                recipe.visible,
                recipe.locked,
                recipe.path.clone(),
            ));
        }

        let mut formulas: Vec<ChannelFormulas> = vec![ChannelFormulas::default(); channels.len()];
        for recipe in &self.formulas {
            let output = *channels_by_name
                .get(&recipe.output)
                .ok_or_else(|| BakeError::UnknownChannel(recipe.output.clone()))?;

            let operations = recipe
                .operations
                .iter()
                .map(|operation| operation.bake(&channels_by_name))
                .collect::<Result<Vec<_>, _>>()?;

            let formula = Formula::new(operations).map_err(|source| BakeError::MalformedFormula {
                channel: recipe.output.clone(),
                source,
            })?;

            match recipe.stage {
                FormulaStage::Sum => formulas[output].sum.push(formula),
                FormulaStage::Multiply => formulas[output].multiply.push(formula),
            }
        }

        log::debug!(
            "baking channel system: {} channels, {} formulas",
            channels.len(),
            self.formulas.len()
        );

        ChannelSystem::new(parent, channels, formulas)
    }
}
