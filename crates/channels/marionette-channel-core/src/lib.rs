//! Channel dependency graph and evaluator.
//!
//! A figure's pose and shape parameters are flat arrays of scalars indexed by
//! [`Channel`] identity. Channels may carry formulas (small postfix stack
//! programs) that derive their evaluated value from other channels; the
//! [`ChannelEvaluator`] compiles the whole set into a topologically ordered
//! plan at bake time and replays it per evaluation. Evaluation is pure:
//! a [`ChannelInputs`] vector in, a [`ChannelOutputs`] snapshot out.

pub mod channel;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod inputs;
pub mod outputs;
pub mod recipe;
pub mod system;

pub use channel::{Channel, SetMask};
pub use error::{BakeError, FormulaError};
pub use evaluator::{ChannelEvaluator, ChannelFormulas};
pub use formula::{Formula, FormulaStage, Operation};
pub use inputs::ChannelInputs;
pub use outputs::ChannelOutputs;
pub use recipe::{ChannelRecipe, ChannelSystemRecipe, FormulaRecipe, OperationRecipe};
pub use system::ChannelSystem;
