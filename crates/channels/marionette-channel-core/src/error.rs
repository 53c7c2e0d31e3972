use thiserror::Error;

/// Validation failure for a single formula's operation sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("operation pops from an empty stack")]
    StackUnderflow,
    #[error("program leaves {remaining} values on the stack instead of 1")]
    UnbalancedStack { remaining: usize },
    #[error("spline operation has no knots")]
    EmptySpline,
}

/// Unrecoverable construction-time errors raised while baking a channel
/// system from its recipe.
#[derive(Debug, Error)]
pub enum BakeError {
    #[error("duplicate channel name '{0}'")]
    DuplicateChannel(String),

    #[error("formula references unknown channel '{0}'")]
    UnknownChannel(String),

    #[error("channel '{channel}' has a malformed formula: {source}")]
    MalformedFormula {
        channel: String,
        #[source]
        source: FormulaError,
    },

    #[error("cyclic channel dependency involving '{0}'")]
    CyclicDependency(String),

    #[error("channel count mismatch: {channels} channels but {formulas} formula slots")]
    FormulaSlotMismatch { channels: usize, formulas: usize },
}
