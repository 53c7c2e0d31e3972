use marionette_math::{DualQuaternion, ScalingTransform};
use nalgebra::Vector3;

/// A bone transform decomposed into two independently chained stages.
///
/// Non-uniform scale does not commute through rigid motion the way rigid
/// motions compose with each other, so the scaling stage and the rotation
/// stage are chained separately and only combined when a point is
/// transformed: scale first, then the rigid stage.
#[derive(Clone, Copy, Debug)]
pub struct StagedSkinningTransform {
    pub scaling_stage: ScalingTransform,
    pub rotation_stage: DualQuaternion,
}

impl StagedSkinningTransform {
    pub fn identity() -> StagedSkinningTransform {
        StagedSkinningTransform {
            scaling_stage: ScalingTransform::identity(),
            rotation_stage: DualQuaternion::identity(),
        }
    }

    pub fn new(
        scaling_stage: ScalingTransform,
        rotation_stage: DualQuaternion,
    ) -> StagedSkinningTransform {
        StagedSkinningTransform {
            scaling_stage,
            rotation_stage,
        }
    }

    pub fn transform(&self, v: Vector3<f32>) -> Vector3<f32> {
        self.rotation_stage.transform(self.scaling_stage.transform(v))
    }

    pub fn inverse_transform(&self, v: Vector3<f32>) -> Vector3<f32> {
        self.scaling_stage
            .inverse_transform(self.rotation_stage.inverse_transform(v))
    }
}
