//! Object-centered non-uniform scaling stage.
//!
//! The scale matrix is a rotated diagonal in general, so it cannot be folded
//! into the rigid stage; staged transforms chain the two stages separately.

use nalgebra::{Matrix3, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalingTransform {
    pub scale: Matrix3<f32>,
    pub translation: Vector3<f32>,
}

impl ScalingTransform {
    pub fn identity() -> ScalingTransform {
        ScalingTransform {
            scale: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn from_scale(scale: Matrix3<f32>) -> ScalingTransform {
        ScalingTransform {
            scale,
            translation: Vector3::zeros(),
        }
    }

    pub fn from_translation(translation: Vector3<f32>) -> ScalingTransform {
        ScalingTransform {
            scale: Matrix3::identity(),
            translation,
        }
    }

    pub fn transform(&self, v: Vector3<f32>) -> Vector3<f32> {
        self.scale * v + self.translation
    }

    pub fn inverse_transform(&self, v: Vector3<f32>) -> Vector3<f32> {
        let inverse = self.scale.try_inverse().unwrap_or_else(Matrix3::zeros);
        inverse * (v - self.translation)
    }

    /// The transform that applies `self` first, then `then`.
    pub fn chain(&self, then: &ScalingTransform) -> ScalingTransform {
        ScalingTransform {
            scale: then.scale * self.scale,
            translation: then.scale * self.translation + then.translation,
        }
    }
}
