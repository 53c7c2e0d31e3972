use std::sync::Arc;

use hashbrown::HashMap;

use crate::channel::Channel;
use crate::error::BakeError;
use crate::evaluator::{ChannelEvaluator, ChannelFormulas};
use crate::inputs::ChannelInputs;
use crate::outputs::ChannelOutputs;

/// A baked, immutable set of channels plus their compiled evaluator.
///
/// A child figure's system holds a shared reference to its parent's system;
/// there is no global registry, ownership is explicit.
pub struct ChannelSystem {
    parent: Option<Arc<ChannelSystem>>,
    channels: Vec<Channel>,
    channels_by_name: HashMap<String, usize>,
    evaluator: ChannelEvaluator,
    default_outputs: Arc<ChannelOutputs>,
}

impl ChannelSystem {
    pub fn new(
        parent: Option<Arc<ChannelSystem>>,
        channels: Vec<Channel>,
        formulas: Vec<ChannelFormulas>,
    ) -> Result<ChannelSystem, BakeError> {
        let mut channels_by_name = HashMap::with_capacity(channels.len());
        for channel in &channels {
            if channels_by_name
                .insert(channel.name().to_string(), channel.index())
                .is_some()
            {
                return Err(BakeError::DuplicateChannel(channel.name().to_string()));
            }
        }

        let evaluator = ChannelEvaluator::compile(&channels, formulas)?;

        let default_inputs = ChannelInputs::new(
            channels.iter().map(|channel| channel.initial_value()).collect(),
        );
        let parent_default_outputs = parent.as_ref().map(|p| p.default_outputs.clone());
        let default_outputs = Arc::new(evaluator.evaluate(parent_default_outputs, &default_inputs));

        Ok(ChannelSystem {
            parent,
            channels,
            channels_by_name,
            evaluator,
            default_outputs,
        })
    }

    pub fn parent(&self) -> Option<&Arc<ChannelSystem>> {
        self.parent.as_ref()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel_by_name(&self, name: &str) -> Option<&Channel> {
        self.channels_by_name
            .get(name)
            .map(|&index| &self.channels[index])
    }

    pub fn default_outputs(&self) -> &Arc<ChannelOutputs> {
        &self.default_outputs
    }

    pub fn make_zero_channel_inputs(&self) -> ChannelInputs {
        ChannelInputs::new(vec![0.0; self.channels.len()])
    }

    pub fn make_default_channel_inputs(&self) -> ChannelInputs {
        ChannelInputs::new(
            self.channels
                .iter()
                .map(|channel| channel.initial_value())
                .collect(),
        )
    }

    pub fn evaluate(
        &self,
        parent_outputs: Option<Arc<ChannelOutputs>>,
        inputs: &ChannelInputs,
    ) -> ChannelOutputs {
        self.evaluator.evaluate(parent_outputs, inputs)
    }
}
