//! The planar bone chain the solver strategies operate on.
//!
//! A chain is extracted from the skeleton as a sequence of rigid segments;
//! each bone rotates about its own center, chained through its parent.
//! Inputs hold one rotation per bone plus a root translation, mirroring the
//! skeleton's pose channels at 2D scale.

use marionette_math::angles::normalize_radians;
use nalgebra::{Isometry2, Point2, Translation2, UnitComplex, Vector2};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("bone {bone} has index {actual}, expected {expected}")]
    IndexMismatch {
        bone: usize,
        actual: usize,
        expected: usize,
    },
    #[error("bone {bone} must come after its parent")]
    ParentOutOfOrder { bone: usize },
    #[error("bone {bone} has no parent but is not the first bone")]
    RootNotFirst { bone: usize },
}

/// One rigid planar segment, unposed: it runs from `center` to `end`.
#[derive(Clone, Copy, Debug)]
pub struct FlatBone {
    pub index: usize,
    pub parent: Option<usize>,
    pub center: Vector2<f32>,
    pub end: Vector2<f32>,
}

/// An arena of planar bones with parents at lower indices.
#[derive(Clone, Debug)]
pub struct FlatChain {
    bones: Vec<FlatBone>,
}

/// Per-pose chain parameters: a rotation per bone and a root translation.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainInputs {
    pub translation: Vector2<f32>,
    rotations: Vec<f32>,
}

impl ChainInputs {
    pub fn new(bone_count: usize) -> ChainInputs {
        ChainInputs {
            translation: Vector2::zeros(),
            rotations: vec![0.0; bone_count],
        }
    }

    pub fn bone_count(&self) -> usize {
        self.rotations.len()
    }

    /// Rotations are kept normalized to (-π, π].
    pub fn set_rotation(&mut self, bone_idx: usize, value: f32) {
        self.rotations[bone_idx] = normalize_radians(value);
    }

    pub fn get_rotation(&self, bone_idx: usize) -> f32 {
        self.rotations[bone_idx]
    }

    pub fn increment_rotation(&mut self, bone_idx: usize, delta: f32) {
        self.set_rotation(bone_idx, self.get_rotation(bone_idx) + delta);
    }
}

fn rotation_about(angle: f32, center: Vector2<f32>) -> Isometry2<f32> {
    let rotation = UnitComplex::new(angle);
    let translation = center - rotation * center;
    Isometry2::from_parts(Translation2::from(translation), rotation)
}

impl FlatChain {
    pub fn new(bones: Vec<FlatBone>) -> Result<FlatChain, ChainError> {
        for (expected, bone) in bones.iter().enumerate() {
            if bone.index != expected {
                return Err(ChainError::IndexMismatch {
                    bone: bone.index,
                    actual: bone.index,
                    expected,
                });
            }
            match bone.parent {
                None => {
                    if expected != 0 {
                        return Err(ChainError::RootNotFirst { bone: expected });
                    }
                }
                Some(parent) => {
                    if parent >= expected {
                        return Err(ChainError::ParentOutOfOrder { bone: expected });
                    }
                }
            }
        }
        Ok(FlatChain { bones })
    }

    /// Build a serial chain from per-bone end offsets: each bone starts where
    /// its parent ends.
    pub fn make_serial(offsets: &[Vector2<f32>]) -> FlatChain {
        let mut bones = Vec::with_capacity(offsets.len());
        let mut center = Vector2::zeros();
        for (index, offset) in offsets.iter().enumerate() {
            let end = center + offset;
            bones.push(FlatBone {
                index,
                parent: if index == 0 { None } else { Some(index - 1) },
                center,
                end,
            });
            center = end;
        }
        FlatChain { bones }
    }

    pub fn bones(&self) -> &[FlatBone] {
        &self.bones
    }

    pub fn make_zero_inputs(&self) -> ChainInputs {
        ChainInputs::new(self.bones.len())
    }

    /// Bone indices walking from `source_bone` up to the root, inclusive.
    pub fn chain_to_root(&self, source_bone: usize) -> Vec<usize> {
        let mut indices = Vec::new();
        let mut current = Some(source_bone);
        while let Some(index) = current {
            indices.push(index);
            current = self.bones[index].parent;
        }
        indices
    }

    fn parent_transform(&self, inputs: &ChainInputs, bone_idx: usize) -> Isometry2<f32> {
        match self.bones[bone_idx].parent {
            Some(parent) => self.chained_transform(inputs, parent),
            None => Isometry2::new(inputs.translation, 0.0),
        }
    }

    pub fn local_transform(&self, inputs: &ChainInputs, bone_idx: usize) -> Isometry2<f32> {
        rotation_about(inputs.get_rotation(bone_idx), self.bones[bone_idx].center)
    }

    pub fn chained_transform(&self, inputs: &ChainInputs, bone_idx: usize) -> Isometry2<f32> {
        self.parent_transform(inputs, bone_idx) * self.local_transform(inputs, bone_idx)
    }

    pub fn transform_point(
        &self,
        inputs: &ChainInputs,
        bone_idx: usize,
        point: Vector2<f32>,
    ) -> Vector2<f32> {
        (self.chained_transform(inputs, bone_idx) * Point2::from(point)).coords
    }

    /// Re-apply an already transformed point as if `bone_idx`'s rotation had
    /// been adjusted by `rotation_delta`.
    pub fn retransform_point(
        &self,
        inputs: &ChainInputs,
        bone_idx: usize,
        rotation_delta: f32,
        point: Vector2<f32>,
    ) -> Vector2<f32> {
        let parent_transform = self.parent_transform(inputs, bone_idx);
        let transformed_center = (parent_transform * Point2::from(self.bones[bone_idx].center)).coords;
        (rotation_about(rotation_delta, transformed_center) * Point2::from(point)).coords
    }

    /// Gradient of a transformed point with respect to `bone_idx`'s rotation
    /// parameter: the perpendicular of the point about the bone's posed
    /// center.
    pub fn gradient_of_transformed_point(
        &self,
        inputs: &ChainInputs,
        bone_idx: usize,
        point: Vector2<f32>,
    ) -> Vector2<f32> {
        let parent_transform = self.parent_transform(inputs, bone_idx);
        let transformed_center = (parent_transform * Point2::from(self.bones[bone_idx].center)).coords;
        let centered_point = point - transformed_center;
        Vector2::new(-centered_point.y, centered_point.x)
    }
}
