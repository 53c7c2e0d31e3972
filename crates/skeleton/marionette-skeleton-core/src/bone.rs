use marionette_channel_core::{Channel, ChannelInputs, ChannelOutputs, SetMask};
use marionette_math::angles::{degrees_to_radians_vector, radians_to_degrees_vector};
use marionette_math::{DualQuaternion, RotationOrder, ScalingTransform};
use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use crate::channel_triplet::ChannelTriplet;
use crate::orientation_space::OrientationSpace;
use crate::staged_transform::StagedSkinningTransform;

/// One node of the skeleton tree.
///
/// A bone owns no values of its own; every transform-defining quantity is
/// read from an evaluated channel snapshot through the triplets bound at
/// bake time. The parent relation is an index into the owning system's
/// arena and always points at a lower index.
#[derive(Clone, Debug)]
pub struct Bone {
    name: String,
    index: usize,
    parent: Option<usize>,
    rotation_order: RotationOrder,
    inherits_scale: bool,
    center_point: ChannelTriplet,
    end_point: ChannelTriplet,
    orientation: ChannelTriplet,
    rotation: ChannelTriplet,
    translation: ChannelTriplet,
    scale: ChannelTriplet,
    general_scale: Channel,
}

impl Bone {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        index: usize,
        parent: Option<usize>,
        rotation_order: RotationOrder,
        inherits_scale: bool,
        center_point: ChannelTriplet,
        end_point: ChannelTriplet,
        orientation: ChannelTriplet,
        rotation: ChannelTriplet,
        translation: ChannelTriplet,
        scale: ChannelTriplet,
        general_scale: Channel,
    ) -> Bone {
        Bone {
            name: name.into(),
            index,
            parent,
            rotation_order,
            inherits_scale,
            center_point,
            end_point,
            orientation,
            rotation,
            translation,
            scale,
            general_scale,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn inherits_scale(&self) -> bool {
        self.inherits_scale
    }

    pub fn center_point(&self) -> &ChannelTriplet {
        &self.center_point
    }

    pub fn end_point(&self) -> &ChannelTriplet {
        &self.end_point
    }

    pub fn orientation(&self) -> &ChannelTriplet {
        &self.orientation
    }

    pub fn rotation(&self) -> &ChannelTriplet {
        &self.rotation
    }

    pub fn translation(&self) -> &ChannelTriplet {
        &self.translation
    }

    pub fn scale(&self) -> &ChannelTriplet {
        &self.scale
    }

    pub fn general_scale(&self) -> &Channel {
        &self.general_scale
    }

    /// Per-axis scale times general scale, remapped into oriented space.
    fn combined_scale(&self, outputs: &ChannelOutputs) -> Matrix3<f32> {
        let scale = self.scale.get_value(outputs) * self.general_scale.get_value(outputs) as f32;
        let object_space_scaling = Matrix3::from_diagonal(&scale);
        self.orientation_space(outputs)
            .transform_to_oriented_space_matrix(object_space_scaling)
    }

    /// The bone's fixed axis remapping. Orientation channels are Euler
    /// degrees in the standard order regardless of the bone's own rotation
    /// order.
    pub fn orientation_space(&self, outputs: &ChannelOutputs) -> OrientationSpace {
        let orientation_angles = self.orientation.get_value(outputs);
        let orientation = RotationOrder::STANDARD
            .from_euler_angles(degrees_to_radians_vector(orientation_angles));
        OrientationSpace::new(orientation)
    }

    /// The pose rotation in object space. Rotation channels are degrees,
    /// composed twist-then-swing in the bone's own rotation order.
    pub fn get_rotation(&self, outputs: &ChannelOutputs) -> UnitQuaternion<f32> {
        let orientation_space = self.orientation_space(outputs);
        let rotation_angles = self.rotation.get_value(outputs);
        let oriented_space_rotation = self
            .rotation_order
            .from_twist_swing_angles(degrees_to_radians_vector(rotation_angles));
        orientation_space.transform_from_oriented_space(oriented_space_rotation)
    }

    pub fn convert_rotation_to_angles(
        &self,
        orientation_outputs: &ChannelOutputs,
        object_space_rotation: UnitQuaternion<f32>,
    ) -> Vector3<f32> {
        let orientation_space = self.orientation_space(orientation_outputs);
        let oriented_space_rotation =
            orientation_space.transform_to_oriented_space(object_space_rotation);
        let rotation_angles_radians = self
            .rotation_order
            .to_twist_swing_angles(&oriented_space_rotation);
        radians_to_degrees_vector(rotation_angles_radians)
    }

    pub fn set_rotation(
        &self,
        orientation_outputs: &ChannelOutputs,
        inputs: &mut ChannelInputs,
        object_space_rotation: UnitQuaternion<f32>,
        mask: SetMask,
    ) {
        let angles = self.convert_rotation_to_angles(orientation_outputs, object_space_rotation);
        self.rotation.set_value(inputs, angles, mask);
    }

    /// Write a rotation so the *evaluated* rotation output matches, by
    /// deltaing against the supplied snapshot.
    pub fn set_effective_rotation(
        &self,
        inputs: &mut ChannelInputs,
        outputs: &ChannelOutputs,
        object_space_rotation: UnitQuaternion<f32>,
        mask: SetMask,
    ) {
        let angles = self.convert_rotation_to_angles(outputs, object_space_rotation);
        self.rotation.set_effective_value(inputs, outputs, angles, mask);
    }

    pub fn set_translation(&self, inputs: &mut ChannelInputs, translation: Vector3<f32>, mask: SetMask) {
        self.translation.set_value(inputs, translation, mask);
    }

    fn joint_centered_scaling_transform(
        &self,
        parent: Option<&Bone>,
        outputs: &ChannelOutputs,
    ) -> ScalingTransform {
        let mut scale = self.combined_scale(outputs);

        if !self.inherits_scale {
            if let Some(parent) = parent {
                let parent_inverse = parent
                    .combined_scale(outputs)
                    .try_inverse()
                    .unwrap_or_else(Matrix3::zeros);
                scale *= parent_inverse;
            }
        }

        ScalingTransform::from_scale(scale)
    }

    fn joint_centered_rotation_transform(
        &self,
        outputs: &ChannelOutputs,
        parent_scale: &Matrix3<f32>,
    ) -> DualQuaternion {
        let world_space_rotation = self.get_rotation(outputs);
        let translation = parent_scale * self.translation.get_value(outputs);
        DualQuaternion::from_rotation_translation(world_space_rotation, translation)
    }

    /// The scaling stage about the bone's center point.
    pub fn object_centered_scaling_transform(
        &self,
        parent: Option<&Bone>,
        outputs: &ChannelOutputs,
    ) -> ScalingTransform {
        let local_space_transform = self.joint_centered_scaling_transform(parent, outputs);
        let center_point = self.center_point.get_value(outputs);
        ScalingTransform::from_translation(-center_point)
            .chain(&local_space_transform)
            .chain(&ScalingTransform::from_translation(center_point))
    }

    fn object_centered_rotation_transform(
        &self,
        outputs: &ChannelOutputs,
        parent_scale: &ScalingTransform,
    ) -> DualQuaternion {
        let local_space_transform = self.joint_centered_rotation_transform(outputs, &parent_scale.scale);
        let center_point = parent_scale.transform(self.center_point.get_value(outputs));
        DualQuaternion::from_translation(-center_point)
            .chain(&local_space_transform)
            .chain(&DualQuaternion::from_translation(center_point))
    }

    /// Chain this bone's local transform onto an already chained parent
    /// transform. Stages chain independently; the rotation stage reads the
    /// parent's chained scale to place its center and translation.
    pub fn get_chained_transform(
        &self,
        parent: Option<&Bone>,
        outputs: &ChannelOutputs,
        parent_transform: &StagedSkinningTransform,
    ) -> StagedSkinningTransform {
        let scaling_transform = self.object_centered_scaling_transform(parent, outputs);
        let chained_scaling_transform = scaling_transform.chain(&parent_transform.scaling_stage);

        let rotation_transform =
            self.object_centered_rotation_transform(outputs, &parent_transform.scaling_stage);
        let chained_rotation_transform = rotation_transform.chain(&parent_transform.rotation_stage);

        StagedSkinningTransform::new(chained_scaling_transform, chained_rotation_transform)
    }
}
