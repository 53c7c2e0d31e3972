use std::sync::Arc;

/// Evaluated channel values, immutable once produced.
///
/// Child figures (clothing, hair) keep a shared link to the figure they are
/// attached to, forming a chain that bottoms out at the root figure.
#[derive(Clone, Debug)]
pub struct ChannelOutputs {
    parent: Option<Arc<ChannelOutputs>>,
    values: Vec<f64>,
}

impl ChannelOutputs {
    pub fn new(parent: Option<Arc<ChannelOutputs>>, values: Vec<f64>) -> ChannelOutputs {
        ChannelOutputs { parent, values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn parent(&self) -> Option<&Arc<ChannelOutputs>> {
        self.parent.as_ref()
    }

    /// Walk the parent chain to the root figure's outputs.
    pub fn root(&self) -> &ChannelOutputs {
        let mut outputs = self;
        while let Some(parent) = &outputs.parent {
            outputs = parent;
        }
        outputs
    }
}
