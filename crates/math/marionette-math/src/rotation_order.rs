//! Euler rotation orders and their quaternion conversions.
//!
//! Conversion formulas follow the standard quaternion/Euler correspondence
//! with an explicit sign for circular vs anticircular axis orders, which is
//! what lets one routine serve all six orders. The angle extraction handles
//! the ±90° singularity on the secondary axis and prefers the branch with
//! the smaller l1-norm of angles.

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationOrder {
    pub primary_axis: usize,
    pub secondary_axis: usize,
    pub tertiary_axis: usize,
    circular: bool,
}

impl RotationOrder {
    pub const XYZ: RotationOrder = RotationOrder::new(0, 1, 2);
    pub const XZY: RotationOrder = RotationOrder::new(0, 2, 1);
    pub const YXZ: RotationOrder = RotationOrder::new(1, 0, 2);
    pub const YZX: RotationOrder = RotationOrder::new(1, 2, 0);
    pub const ZXY: RotationOrder = RotationOrder::new(2, 0, 1);
    pub const ZYX: RotationOrder = RotationOrder::new(2, 1, 0);

    /// The order used for bone orientation channels.
    pub const STANDARD: RotationOrder = RotationOrder::XYZ;

    const fn new(primary_axis: usize, secondary_axis: usize, tertiary_axis: usize) -> Self {
        let circular = (primary_axis == 0 && secondary_axis == 1)
            || (primary_axis == 1 && secondary_axis == 2)
            || (primary_axis == 2 && secondary_axis == 0);
        RotationOrder {
            primary_axis,
            secondary_axis,
            tertiary_axis,
            circular,
        }
    }

    /// Parse an order like "XYZ". Returns `None` for anything that is not a
    /// permutation of the three axes.
    pub fn parse(s: &str) -> Option<RotationOrder> {
        let mut axes = s.chars().map(|ch| match ch {
            'X' => Some(0usize),
            'Y' => Some(1),
            'Z' => Some(2),
            _ => None,
        });
        let primary = axes.next()??;
        let secondary = axes.next()??;
        let tertiary = axes.next()??;
        if axes.next().is_some() || primary == secondary || secondary == tertiary || primary == tertiary {
            return None;
        }
        Some(RotationOrder::new(primary, secondary, tertiary))
    }

    fn unit_axis(axis: usize) -> Unit<Vector3<f32>> {
        match axis {
            0 => Vector3::x_axis(),
            1 => Vector3::y_axis(),
            _ => Vector3::z_axis(),
        }
    }

    /// Compose per-axis angles (radians) as a twist about the primary axis
    /// followed by a single swing of the remaining two axes.
    ///
    /// This is the composition used for pose rotation channels; it matches
    /// how rotation limits are expressed (twist bound + swing ellipse).
    pub fn from_twist_swing_angles(&self, angles: Vector3<f32>) -> UnitQuaternion<f32> {
        let twist =
            UnitQuaternion::from_axis_angle(&Self::unit_axis(self.primary_axis), angles[self.primary_axis]);

        let mut swing_vector = angles;
        swing_vector[self.primary_axis] = 0.0;
        let swing = UnitQuaternion::from_scaled_axis(swing_vector);

        swing * twist
    }

    /// Inverse of [`from_twist_swing_angles`](Self::from_twist_swing_angles).
    pub fn to_twist_swing_angles(&self, q: &UnitQuaternion<f32>) -> Vector3<f32> {
        let (twist, swing) =
            crate::quat::decompose_twist_then_swing(q, &Self::unit_axis(self.primary_axis));

        let twist_scaled = twist.scaled_axis();
        let swing_scaled = swing.scaled_axis();

        let mut angles = Vector3::zeros();
        angles[self.primary_axis] = twist_scaled[self.primary_axis];
        angles[self.secondary_axis] = swing_scaled[self.secondary_axis];
        angles[self.tertiary_axis] = swing_scaled[self.tertiary_axis];
        angles
    }

    /// Compose per-axis angles (radians) as a sequence of three single-axis
    /// rotations in this order.
    pub fn from_euler_angles(&self, angles: Vector3<f32>) -> UnitQuaternion<f32> {
        let half1 = f64::from(angles[self.primary_axis]) / 2.0;
        let half2 = f64::from(angles[self.secondary_axis]) / 2.0;
        let half3 = f64::from(angles[self.tertiary_axis]) / 2.0;
        let e = if self.circular { -1.0 } else { 1.0 };

        let (sin1, cos1) = half1.sin_cos();
        let (sin2, cos2) = half2.sin_cos();
        let (sin3, cos3) = half3.sin_cos();

        let p0 = cos3 * cos2 * cos1 - e * sin3 * sin2 * sin1;
        let p1 = cos3 * cos2 * sin1 + e * sin3 * sin2 * cos1;
        let p2 = cos3 * sin2 * cos1 - e * sin3 * cos2 * sin1;
        let p3 = sin3 * cos2 * cos1 + e * cos3 * sin2 * sin1;

        let mut q = Quaternion::identity();
        q.coords[self.primary_axis] = p1 as f32;
        q.coords[self.secondary_axis] = p2 as f32;
        q.coords[self.tertiary_axis] = p3 as f32;
        q.coords[3] = p0 as f32;

        UnitQuaternion::from_quaternion(q)
    }

    /// Extract per-axis angles (radians) from a rotation composed in this
    /// order.
    pub fn to_euler_angles(&self, q: &UnitQuaternion<f32>) -> Vector3<f32> {
        let e = if self.circular { -1.0f64 } else { 1.0 };
        let p0 = f64::from(q.coords[3]);
        let p1 = f64::from(q.coords[self.primary_axis]);
        let p2 = f64::from(q.coords[self.secondary_axis]);
        let p3 = f64::from(q.coords[self.tertiary_axis]);

        let half_sin_angle2 = p0 * p2 + e * p1 * p3;

        let singularity_threshold = 0.4999;
        let mut angle1: f64;
        let mut angle2: f64;
        let mut angle3: f64;
        if half_sin_angle2 > singularity_threshold {
            angle2 = std::f64::consts::FRAC_PI_2;
            angle1 = 0.0;
            angle3 = 2.0 * e * (p1 / p0).atan();
        } else if half_sin_angle2 < -singularity_threshold {
            angle2 = -std::f64::consts::FRAC_PI_2;
            angle1 = 0.0;
            angle3 = -2.0 * e * (p1 / p0).atan();
        } else {
            angle2 = (2.0 * half_sin_angle2).asin();
            angle3 = (2.0 * (p0 * p3 - e * p1 * p2)).atan2(1.0 - 2.0 * (p2 * p2 + p3 * p3));
            angle1 = (2.0 * (p0 * p1 - e * p2 * p3)).atan2(1.0 - 2.0 * (p1 * p1 + p2 * p2));

            // prefer the branch with the smaller l1-norm of angles
            let half_pi = std::f64::consts::FRAC_PI_2;
            if angle1 > half_pi && angle3 > half_pi {
                angle1 -= std::f64::consts::PI;
                angle3 -= std::f64::consts::PI;
                angle2 = if angle2 > 0.0 {
                    std::f64::consts::PI - angle2
                } else {
                    -std::f64::consts::PI - angle2
                };
            } else if angle1 < -half_pi && angle3 < -half_pi {
                angle1 += std::f64::consts::PI;
                angle3 += std::f64::consts::PI;
                angle2 = if angle2 > 0.0 {
                    std::f64::consts::PI - angle2
                } else {
                    -std::f64::consts::PI - angle2
                };
            }
        }

        let mut angles = Vector3::zeros();
        angles[self.primary_axis] = angle1 as f32;
        angles[self.secondary_axis] = angle2 as f32;
        angles[self.tertiary_axis] = angle3 as f32;
        angles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ORDERS: [RotationOrder; 6] = [
        RotationOrder::XYZ,
        RotationOrder::XZY,
        RotationOrder::YXZ,
        RotationOrder::YZX,
        RotationOrder::ZXY,
        RotationOrder::ZYX,
    ];

    #[test]
    fn parse_accepts_permutations_only() {
        assert_eq!(RotationOrder::parse("XYZ"), Some(RotationOrder::XYZ));
        assert_eq!(RotationOrder::parse("ZYX"), Some(RotationOrder::ZYX));
        assert_eq!(RotationOrder::parse("XXY"), None);
        assert_eq!(RotationOrder::parse("XY"), None);
        assert_eq!(RotationOrder::parse("XYZW"), None);
        assert_eq!(RotationOrder::parse("abc"), None);
    }

    #[test]
    fn euler_composition_matches_axis_sequence() {
        for order in ORDERS {
            let angles = {
                let mut a = Vector3::zeros();
                a[order.primary_axis] = 0.3;
                a[order.secondary_axis] = -0.4;
                a[order.tertiary_axis] = 0.5;
                a
            };

            let q = order.from_euler_angles(angles);

            let step1 = UnitQuaternion::from_axis_angle(
                &RotationOrder::unit_axis(order.primary_axis),
                angles[order.primary_axis],
            );
            let step2 = UnitQuaternion::from_axis_angle(
                &RotationOrder::unit_axis(order.secondary_axis),
                angles[order.secondary_axis],
            );
            let step3 = UnitQuaternion::from_axis_angle(
                &RotationOrder::unit_axis(order.tertiary_axis),
                angles[order.tertiary_axis],
            );
            let expected = step3 * step2 * step1;

            let v = Vector3::new(1.0, 2.0, 3.0);
            assert_relative_eq!(q * v, expected * v, epsilon = 1e-5);
        }
    }

    #[test]
    fn euler_angles_round_trip() {
        for order in ORDERS {
            let angles = Vector3::new(0.25, -0.55, 0.85);
            let q = order.from_euler_angles(angles);
            let recovered = order.to_euler_angles(&q);
            let q2 = order.from_euler_angles(recovered);

            let v = Vector3::new(0.3, -1.0, 2.0);
            assert_relative_eq!(q * v, q2 * v, epsilon = 1e-4);
        }
    }

    #[test]
    fn euler_angles_near_singularity() {
        let order = RotationOrder::XYZ;
        let angles = Vector3::new(0.2, std::f32::consts::FRAC_PI_2, 0.1);
        let q = order.from_euler_angles(angles);
        let recovered = order.to_euler_angles(&q);
        let q2 = order.from_euler_angles(recovered);

        let v = Vector3::new(1.0, 0.0, -1.0);
        assert_relative_eq!(q * v, q2 * v, epsilon = 1e-3);
    }

    #[test]
    fn twist_swing_round_trip() {
        for order in ORDERS {
            let angles = Vector3::new(0.4, -0.3, 0.6);
            let q = order.from_twist_swing_angles(angles);
            let recovered = order.to_twist_swing_angles(&q);
            assert_relative_eq!(recovered, angles, epsilon = 1e-5);
        }
    }
}
