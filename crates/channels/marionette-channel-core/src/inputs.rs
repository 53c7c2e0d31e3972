/// Raw, writable channel values for one pose or solve.
///
/// One slot per channel, indexed by `Channel::index`. Animation, IK and user
/// edits all write here; evaluation reads it and never mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelInputs {
    pub raw_values: Vec<f64>,
}

impl ChannelInputs {
    pub fn new(raw_values: Vec<f64>) -> ChannelInputs {
        ChannelInputs { raw_values }
    }

    pub fn len(&self) -> usize {
        self.raw_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_values.is_empty()
    }

    /// Accumulate `weight * other` into self, slot by slot.
    pub fn blend_in(&mut self, other: &ChannelInputs, weight: f64) {
        assert_eq!(
            self.raw_values.len(),
            other.raw_values.len(),
            "channel input length mismatch"
        );
        for (value, other_value) in self.raw_values.iter_mut().zip(&other.raw_values) {
            *value += weight * other_value;
        }
    }

    pub fn clear_to_zero(&mut self) {
        for value in &mut self.raw_values {
            *value = 0.0;
        }
    }
}
