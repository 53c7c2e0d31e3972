use marionette_channel_core::{Channel, ChannelInputs, ChannelOutputs, ChannelSystem, SetMask};
use nalgebra::Vector3;

use crate::error::SkeletonError;

/// An x/y/z bundle of channels backing one vector-valued bone property.
#[derive(Clone, Debug)]
pub struct ChannelTriplet {
    x: Channel,
    y: Channel,
    z: Channel,
}

impl ChannelTriplet {
    pub fn new(x: Channel, y: Channel, z: Channel) -> ChannelTriplet {
        ChannelTriplet { x, y, z }
    }

    /// Resolve `<prefix>/x`, `<prefix>/y`, `<prefix>/z` in a channel system.
    pub fn lookup(
        system: &ChannelSystem,
        bone_name: &str,
        prefix: &str,
    ) -> Result<ChannelTriplet, SkeletonError> {
        let get = |suffix: &str| {
            let name = format!("{prefix}/{suffix}");
            system
                .channel_by_name(&name)
                .cloned()
                .ok_or_else(|| SkeletonError::UnknownChannel {
                    bone: bone_name.to_string(),
                    channel: name,
                })
        };
        Ok(ChannelTriplet {
            x: get("x")?,
            y: get("y")?,
            z: get("z")?,
        })
    }

    pub fn x(&self) -> &Channel {
        &self.x
    }

    pub fn y(&self) -> &Channel {
        &self.y
    }

    pub fn z(&self) -> &Channel {
        &self.z
    }

    fn channels(&self) -> [&Channel; 3] {
        [&self.x, &self.y, &self.z]
    }

    pub fn get_value(&self, outputs: &ChannelOutputs) -> Vector3<f32> {
        Vector3::new(
            self.x.get_value(outputs) as f32,
            self.y.get_value(outputs) as f32,
            self.z.get_value(outputs) as f32,
        )
    }

    pub fn get_input_value(&self, inputs: &ChannelInputs) -> Vector3<f32> {
        Vector3::new(
            self.x.get_input_value(inputs) as f32,
            self.y.get_input_value(inputs) as f32,
            self.z.get_input_value(inputs) as f32,
        )
    }

    pub fn set_value(&self, inputs: &mut ChannelInputs, value: Vector3<f32>, mask: SetMask) {
        for (channel, component) in self.channels().into_iter().zip(value.iter()) {
            channel.set_value(inputs, f64::from(*component), mask);
        }
    }

    pub fn add_value(&self, inputs: &mut ChannelInputs, delta: Vector3<f32>, mask: SetMask) {
        for (channel, component) in self.channels().into_iter().zip(delta.iter()) {
            channel.add_value(inputs, f64::from(*component), mask);
        }
    }

    pub fn set_effective_value(
        &self,
        inputs: &mut ChannelInputs,
        outputs_for_delta: &ChannelOutputs,
        value: Vector3<f32>,
        mask: SetMask,
    ) {
        for (channel, component) in self.channels().into_iter().zip(value.iter()) {
            channel.set_effective_value(inputs, outputs_for_delta, f64::from(*component), mask);
        }
    }

    /// Per-axis limits: invisible channels are pinned to their initial value,
    /// unclamped channels are unbounded.
    pub fn extract_min_max(&self) -> (Vector3<f32>, Vector3<f32>) {
        let mut min = Vector3::zeros();
        let mut max = Vector3::zeros();
        for (idx, channel) in self.channels().into_iter().enumerate() {
            if !channel.is_visible() {
                min[idx] = channel.initial_value() as f32;
                max[idx] = channel.initial_value() as f32;
            } else if !channel.is_clamped() {
                min[idx] = f32::NEG_INFINITY;
                max[idx] = f32::INFINITY;
            } else {
                min[idx] = channel.min() as f32;
                max[idx] = channel.max() as f32;
            }
        }
        (min, max)
    }
}
