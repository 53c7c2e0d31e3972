//! Pose-only fast path for the skeleton.
//!
//! `Synchronize` snapshots everything shape-driven (scaling chains, center
//! points, orientation bases) out of a full channel evaluation; after that,
//! posing only recomputes the rigid rotation stages. The contract is exact
//! equivalence with the full channel-graph path for any pose expressible
//! without touching shape channels. The cache cannot detect staleness;
//! re-synchronizing after shape edits is the caller's obligation.

mod bone;
mod inputs;
mod system;

pub use bone::RigidBone;
pub use inputs::{RigidBonePose, RigidBoneSystemInputs};
pub use system::RigidBoneSystem;
