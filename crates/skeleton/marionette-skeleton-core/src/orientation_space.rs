use marionette_math::{decompose_twist_then_swing, CartesianAxis};
use nalgebra::{Matrix3, UnitQuaternion};

/// A bone's fixed axis remapping, independent of pose.
///
/// Rotation channels are expressed in the bone's oriented space; this
/// conjugates them in and out of object space.
#[derive(Clone, Copy, Debug)]
pub struct OrientationSpace {
    orientation: UnitQuaternion<f32>,
}

impl OrientationSpace {
    pub fn new(orientation: UnitQuaternion<f32>) -> OrientationSpace {
        OrientationSpace { orientation }
    }

    pub fn identity() -> OrientationSpace {
        OrientationSpace {
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn orientation(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    pub fn transform_from_oriented_space(
        &self,
        oriented_space_rotation: UnitQuaternion<f32>,
    ) -> UnitQuaternion<f32> {
        self.orientation * oriented_space_rotation * self.orientation.inverse()
    }

    pub fn transform_to_oriented_space(
        &self,
        object_space_rotation: UnitQuaternion<f32>,
    ) -> UnitQuaternion<f32> {
        self.orientation.inverse() * object_space_rotation * self.orientation
    }

    /// Remap an object-space scaling matrix into oriented space.
    pub fn transform_to_oriented_space_matrix(&self, object_space_scaling: Matrix3<f32>) -> Matrix3<f32> {
        let rotation = self.orientation.to_rotation_matrix();
        rotation.inverse().matrix() * object_space_scaling * rotation.matrix()
    }

    /// Twist/swing decomposition of an object-space rotation, performed in
    /// oriented space and mapped back.
    pub fn decompose_into_twist_then_swing(
        &self,
        axis: CartesianAxis,
        object_space_rotation: UnitQuaternion<f32>,
    ) -> (UnitQuaternion<f32>, UnitQuaternion<f32>) {
        let oriented_rotation = self.transform_to_oriented_space(object_space_rotation);
        let (oriented_twist, oriented_swing) =
            decompose_twist_then_swing(&oriented_rotation, &axis.unit_vector());
        (
            self.transform_from_oriented_space(oriented_twist),
            self.transform_from_oriented_space(oriented_swing),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn oriented_space_round_trips() {
        let space = OrientationSpace::new(UnitQuaternion::from_euler_angles(0.3, -0.2, 0.5));
        let q = UnitQuaternion::from_euler_angles(-0.1, 0.6, 0.2);

        let oriented = space.transform_to_oriented_space(q);
        let back = space.transform_from_oriented_space(oriented);

        let v = Vector3::new(1.0, -2.0, 0.5);
        assert_relative_eq!(back * v, q * v, epsilon = 1e-5);
    }

    #[test]
    fn twist_swing_decomposition_recomposes() {
        let space = OrientationSpace::new(UnitQuaternion::from_euler_angles(0.4, 0.1, -0.3));
        let q = UnitQuaternion::from_euler_angles(0.7, -0.2, 0.4);

        let (twist, swing) = space.decompose_into_twist_then_swing(CartesianAxis::X, q);
        let recomposed = swing * twist;

        let v = Vector3::new(0.2, 1.0, -1.5);
        assert_relative_eq!(recomposed * v, q * v, epsilon = 1e-5);
    }
}
