use marionette_math::angles::{degrees_to_radians_vector, radians_to_degrees_vector};
use marionette_math::{clamp_to_ellipse, ieee_remainder, RotationOrder};
use nalgebra::{UnitQuaternion, Vector3};

use crate::channel_triplet::ChannelTriplet;

/// Per-bone rotation limits in twist/swing form.
///
/// The twist axis is clamped on its own after normalizing into ±360; the two
/// swing axes are clamped jointly to the ellipse through their limits, which
/// keeps combined swings from reaching poses neither axis allows alone.
#[derive(Clone, Copy, Debug)]
pub struct RotationConstraint {
    rotation_order: RotationOrder,
    min_rotation: Vector3<f32>,
    max_rotation: Vector3<f32>,
}

impl RotationConstraint {
    pub fn new(
        rotation_order: RotationOrder,
        min_rotation: Vector3<f32>,
        max_rotation: Vector3<f32>,
    ) -> RotationConstraint {
        RotationConstraint {
            rotation_order,
            min_rotation,
            max_rotation,
        }
    }

    pub fn initialize_from(
        rotation_order: RotationOrder,
        rotation_channel: &ChannelTriplet,
    ) -> RotationConstraint {
        let (min_rotation, max_rotation) = rotation_channel.extract_min_max();
        RotationConstraint::new(rotation_order, min_rotation, max_rotation)
    }

    pub fn rotation_order(&self) -> RotationOrder {
        self.rotation_order
    }

    fn is_locked(&self, axis: usize) -> bool {
        self.min_rotation[axis] == self.max_rotation[axis]
    }

    pub fn twist_locked(&self) -> bool {
        self.is_locked(self.rotation_order.primary_axis)
    }

    pub fn swing_locked(&self) -> bool {
        self.is_locked(self.rotation_order.secondary_axis)
            && self.is_locked(self.rotation_order.tertiary_axis)
    }

    /// Clamp per-axis angles in degrees.
    pub fn clamp_rotation(&self, value: Vector3<f32>) -> Vector3<f32> {
        let primary = self.rotation_order.primary_axis;
        let secondary = self.rotation_order.secondary_axis;
        let tertiary = self.rotation_order.tertiary_axis;

        let clamped_primary = ieee_remainder(value[primary], 360.0)
            .max(self.min_rotation[primary])
            .min(self.max_rotation[primary]);

        let mut clamped_secondary = ieee_remainder(value[secondary], 360.0);
        let mut clamped_tertiary = ieee_remainder(value[tertiary], 360.0);
        clamp_to_ellipse(
            &mut clamped_secondary,
            &mut clamped_tertiary,
            self.min_rotation[secondary],
            self.max_rotation[secondary],
            self.min_rotation[tertiary],
            self.max_rotation[tertiary],
        );

        let mut result = Vector3::zeros();
        result[primary] = clamped_primary;
        result[secondary] = clamped_secondary;
        result[tertiary] = clamped_tertiary;
        result
    }

    /// Clamp a rotation quaternion by round-tripping through twist/swing
    /// angles.
    pub fn clamp_rotation_quaternion(&self, q: UnitQuaternion<f32>) -> UnitQuaternion<f32> {
        let angles_radians = self.rotation_order.to_twist_swing_angles(&q);
        let angles_degrees = radians_to_degrees_vector(angles_radians);
        let clamped_degrees = self.clamp_rotation(angles_degrees);
        let clamped_radians = degrees_to_radians_vector(clamped_degrees);
        self.rotation_order.from_twist_swing_angles(clamped_radians)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn constraint(min: Vector3<f32>, max: Vector3<f32>) -> RotationConstraint {
        RotationConstraint::new(RotationOrder::XYZ, min, max)
    }

    #[test]
    fn in_range_values_pass_through() {
        let c = constraint(Vector3::new(-60.0, -30.0, -30.0), Vector3::new(60.0, 30.0, 30.0));
        let clamped = c.clamp_rotation(Vector3::new(10.0, -5.0, 8.0));
        assert_relative_eq!(clamped, Vector3::new(10.0, -5.0, 8.0), epsilon = 1e-4);
    }

    #[test]
    fn twist_is_normalized_then_clamped() {
        let c = constraint(Vector3::new(-60.0, -30.0, -30.0), Vector3::new(60.0, 30.0, 30.0));
        // 300° normalizes to -60°, inside the limit
        let clamped = c.clamp_rotation(Vector3::new(300.0, 0.0, 0.0));
        assert_relative_eq!(clamped.x, -60.0, epsilon = 1e-3);

        let clamped = c.clamp_rotation(Vector3::new(90.0, 0.0, 0.0));
        assert_relative_eq!(clamped.x, 60.0, epsilon = 1e-3);
    }

    #[test]
    fn swing_pair_is_clamped_to_the_ellipse() {
        let c = constraint(Vector3::new(0.0, -30.0, -40.0), Vector3::new(0.0, 30.0, 40.0));
        let clamped = c.clamp_rotation(Vector3::new(0.0, 30.0, 40.0));
        // the corner of the box lies outside the ellipse
        let scaled = (clamped.y / 30.0).powi(2) + (clamped.z / 40.0).powi(2);
        assert!(scaled <= 1.0 + 1e-3);
    }

    #[test]
    fn clamping_is_idempotent() {
        let c = constraint(Vector3::new(-60.0, -30.0, -30.0), Vector3::new(60.0, 30.0, 30.0));
        let once = c.clamp_rotation(Vector3::new(120.0, 50.0, -70.0));
        let twice = c.clamp_rotation(once);
        assert_relative_eq!(once, twice, epsilon = 1e-3);
    }

    #[test]
    fn locked_axes_are_reported() {
        let c = constraint(Vector3::new(0.0, -30.0, -30.0), Vector3::new(0.0, 30.0, 30.0));
        assert!(c.twist_locked());
        assert!(!c.swing_locked());

        let c = constraint(Vector3::new(-10.0, 0.0, 0.0), Vector3::new(10.0, 0.0, 0.0));
        assert!(!c.twist_locked());
        assert!(c.swing_locked());
    }
}
