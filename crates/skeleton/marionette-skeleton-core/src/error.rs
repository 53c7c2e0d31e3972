use thiserror::Error;

/// Construction-time errors raised while baking a skeleton.
#[derive(Debug, Error)]
pub enum SkeletonError {
    #[error("bone '{bone}' references unknown channel '{channel}'")]
    UnknownChannel { bone: String, channel: String },

    #[error("bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    #[error("duplicate bone name '{0}'")]
    DuplicateBone(String),

    #[error("bone '{0}' has no parent but is not the first bone")]
    RootNotFirst(String),

    #[error("bone '{bone}' must come after its parent")]
    ParentOutOfOrder { bone: String },

    #[error("bone '{bone}' has index {actual}, expected {expected}")]
    IndexMismatch {
        bone: String,
        actual: usize,
        expected: usize,
    },

    #[error("bone '{bone}' has invalid rotation order '{value}'")]
    InvalidRotationOrder { bone: String, value: String },
}

/// Errors from loading and baking a stored figure document.
#[derive(Debug, Error)]
pub enum StoredFigureError {
    #[error("figure document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("channel system failed to bake: {0}")]
    Channels(#[from] marionette_channel_core::BakeError),

    #[error("skeleton failed to bake: {0}")]
    Skeleton(#[from] SkeletonError),
}
