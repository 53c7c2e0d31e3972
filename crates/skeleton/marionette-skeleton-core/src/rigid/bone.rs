use marionette_channel_core::ChannelOutputs;
use marionette_math::angles::{degrees_to_radians_vector, radians_to_degrees_vector};
use marionette_math::{DualQuaternion, RotationOrder, ScalingTransform};
use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use crate::bone::Bone;
use crate::orientation_space::OrientationSpace;
use crate::rigid::inputs::RigidBoneSystemInputs;
use crate::rotation_constraint::RotationConstraint;
use crate::staged_transform::StagedSkinningTransform;

/// The pose-only view of one bone.
///
/// Everything shape-driven is captured by [`synchronize`](Self::synchronize):
/// the center point, the orientation basis, and the fully chained scaling
/// stage. Per-pose work then only rebuilds the rotation stage.
#[derive(Clone, Debug)]
pub struct RigidBone {
    index: usize,
    parent: Option<usize>,
    rotation_order: RotationOrder,
    constraint: RotationConstraint,
    translation_min: Vector3<f32>,
    translation_max: Vector3<f32>,

    center_point: Vector3<f32>,
    orientation_space: OrientationSpace,
    chained_scaling_transform: ScalingTransform,
}

impl RigidBone {
    pub(crate) fn new(source: &Bone) -> RigidBone {
        let (translation_min, translation_max) = source.translation().extract_min_max();
        RigidBone {
            index: source.index(),
            parent: source.parent(),
            rotation_order: source.rotation_order(),
            constraint: RotationConstraint::initialize_from(
                source.rotation_order(),
                source.rotation(),
            ),
            translation_min,
            translation_max,
            center_point: Vector3::zeros(),
            orientation_space: OrientationSpace::identity(),
            chained_scaling_transform: ScalingTransform::identity(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn rotation_order(&self) -> RotationOrder {
        self.rotation_order
    }

    pub fn constraint(&self) -> &RotationConstraint {
        &self.constraint
    }

    pub fn center_point(&self) -> Vector3<f32> {
        self.center_point
    }

    pub fn chained_scaling_transform(&self) -> &ScalingTransform {
        &self.chained_scaling_transform
    }

    /// Snapshot the shape-driven pieces from a full channel evaluation.
    pub(crate) fn synchronize(
        &mut self,
        source: &Bone,
        source_parent: Option<&Bone>,
        parent_chained_scaling: &ScalingTransform,
        outputs: &ChannelOutputs,
    ) {
        self.center_point = source.center_point().get_value(outputs);
        self.orientation_space = source.orientation_space(outputs);
        self.chained_scaling_transform = source
            .object_centered_scaling_transform(source_parent, outputs)
            .chain(parent_chained_scaling);
    }

    /// The clamped object-space pose rotation.
    pub fn get_rotation(&self, inputs: &RigidBoneSystemInputs) -> UnitQuaternion<f32> {
        let rotation_angles = self.constraint.clamp_rotation(inputs.poses[self.index].rotation);
        let oriented_space_rotation = self
            .rotation_order
            .from_twist_swing_angles(degrees_to_radians_vector(rotation_angles));
        self.orientation_space
            .transform_from_oriented_space(oriented_space_rotation)
    }

    pub fn convert_rotation_to_angles(&self, object_space_rotation: UnitQuaternion<f32>) -> Vector3<f32> {
        let oriented_space_rotation = self
            .orientation_space
            .transform_to_oriented_space(object_space_rotation);
        let rotation_angles_radians = self
            .rotation_order
            .to_twist_swing_angles(&oriented_space_rotation);
        radians_to_degrees_vector(rotation_angles_radians)
    }

    pub fn set_rotation(
        &self,
        inputs: &mut RigidBoneSystemInputs,
        object_space_rotation: UnitQuaternion<f32>,
        apply_clamp: bool,
    ) {
        let mut rotation_angles = self.convert_rotation_to_angles(object_space_rotation);
        if apply_clamp {
            rotation_angles = self.constraint.clamp_rotation(rotation_angles);
        }
        inputs.poses[self.index].rotation = rotation_angles;
    }

    pub fn get_translation(&self, inputs: &RigidBoneSystemInputs) -> Vector3<f32> {
        let translation = inputs.poses[self.index].translation;
        Vector3::new(
            translation.x.max(self.translation_min.x).min(self.translation_max.x),
            translation.y.max(self.translation_min.y).min(self.translation_max.y),
            translation.z.max(self.translation_min.z).min(self.translation_max.z),
        )
    }

    pub fn set_translation(&self, inputs: &mut RigidBoneSystemInputs, translation: Vector3<f32>) {
        inputs.poses[self.index].translation = translation;
    }

    fn joint_centered_rotation_transform(
        &self,
        inputs: &RigidBoneSystemInputs,
        parent_scale: &Matrix3<f32>,
    ) -> DualQuaternion {
        let world_space_rotation = self.get_rotation(inputs);
        let scaled_translation = parent_scale * self.get_translation(inputs);
        DualQuaternion::from_rotation_translation(world_space_rotation, scaled_translation)
    }

    fn object_centered_rotation_transform(
        &self,
        inputs: &RigidBoneSystemInputs,
        parent_scale: &ScalingTransform,
    ) -> DualQuaternion {
        let local_space_transform = self.joint_centered_rotation_transform(inputs, &parent_scale.scale);
        let center_point = parent_scale.transform(self.center_point);
        DualQuaternion::from_translation(-center_point)
            .chain(&local_space_transform)
            .chain(&DualQuaternion::from_translation(center_point))
    }

    /// Chain this bone's rotation stage onto the parent's; the scaling stage
    /// comes straight from the synchronized cache.
    pub fn get_chained_transform(
        &self,
        inputs: &RigidBoneSystemInputs,
        parent_transform: &StagedSkinningTransform,
    ) -> StagedSkinningTransform {
        let rotation_transform =
            self.object_centered_rotation_transform(inputs, &parent_transform.scaling_stage);
        let chained_rotation_transform = rotation_transform.chain(&parent_transform.rotation_stage);

        StagedSkinningTransform::new(self.chained_scaling_transform, chained_rotation_transform)
    }
}
