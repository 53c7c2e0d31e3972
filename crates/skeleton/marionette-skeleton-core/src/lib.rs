//! Bone hierarchy and forward kinematics.
//!
//! Bones read their transform-defining values (center, orientation, rotation,
//! translation, scale) from an evaluated channel snapshot and chain through
//! their parent to produce world-space [`StagedSkinningTransform`]s. The
//! [`rigid`] module provides the pose-only fast path: shape-driven pieces of
//! every bone transform are snapshotted once per shape change, after which
//! per-frame posing recomputes only the rigid rotation stages.

pub mod bone;
pub mod bone_system;
pub mod channel_triplet;
pub mod error;
pub mod orientation_space;
pub mod recipe;
pub mod rigid;
pub mod rotation_constraint;
pub mod staged_transform;
pub mod stored_figure;

pub use bone::Bone;
pub use bone_system::BoneSystem;
pub use channel_triplet::ChannelTriplet;
pub use error::{SkeletonError, StoredFigureError};
pub use recipe::{BoneRecipe, BoneSystemRecipe};
pub use rigid::{RigidBone, RigidBonePose, RigidBoneSystem, RigidBoneSystemInputs};
pub use rotation_constraint::RotationConstraint;
pub use staged_transform::StagedSkinningTransform;
pub use stored_figure::{parse_figure_recipe_json, FigureRecipe};
