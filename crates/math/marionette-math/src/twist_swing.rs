//! Compact twist/swing rotation parameterization.
//!
//! A rotation is split about a chosen twist axis into a twist (stored as the
//! sine of the half angle) and a swing (stored as the quaternion components
//! on the two remaining axes). The representation is minimal, free of order
//! ambiguity, and cheap to decompose and recompose, which is why pose-space
//! rotation limits are expressed in it.

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartesianAxis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl CartesianAxis {
    pub fn from_index(index: usize) -> CartesianAxis {
        match index {
            0 => CartesianAxis::X,
            1 => CartesianAxis::Y,
            _ => CartesianAxis::Z,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn unit_vector(self) -> Unit<Vector3<f32>> {
        match self {
            CartesianAxis::X => Vector3::x_axis(),
            CartesianAxis::Y => Vector3::y_axis(),
            CartesianAxis::Z => Vector3::z_axis(),
        }
    }
}

/// Rotation about the twist axis, stored as sin(angle / 2).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Twist {
    x: f32,
}

impl Twist {
    pub const ZERO: Twist = Twist { x: 0.0 };

    pub fn new(x: f32) -> Twist {
        Twist { x }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn w_squared(&self) -> f32 {
        1.0 - self.x * self.x
    }

    #[inline]
    pub fn w(&self) -> f32 {
        let w_squared = self.w_squared();
        if w_squared > 0.0 {
            w_squared.sqrt()
        } else {
            0.0
        }
    }

    pub fn angle(&self) -> f32 {
        2.0 * self.x.asin()
    }

    pub fn from_angle(angle: f32) -> Twist {
        let angle = crate::angles::normalize_radians(angle);
        Twist { x: (angle / 2.0).sin() }
    }

    pub fn as_quaternion(&self, twist_axis: CartesianAxis) -> UnitQuaternion<f32> {
        let mut q = Quaternion::identity();
        q.coords[twist_axis.index()] = self.x;
        q.coords[3] = self.w();
        UnitQuaternion::new_unchecked(q)
    }

    fn combine(w1: f32, x1: f32, w2: f32, x2: f32) -> Twist {
        let w = w1 * w2 - x1 * x2;
        let x = w2 * x1 + w1 * x2;
        Twist {
            x: if w < 0.0 { -x } else { x },
        }
    }
}

impl std::ops::Add for Twist {
    type Output = Twist;

    fn add(self, other: Twist) -> Twist {
        Twist::combine(self.w(), self.x, other.w(), other.x)
    }
}

impl std::ops::Sub for Twist {
    type Output = Twist;

    fn sub(self, other: Twist) -> Twist {
        Twist::combine(self.w(), self.x, -other.w(), other.x)
    }
}

/// The swing remainder, stored as the quaternion components on the two
/// non-twist axes (the w component is implied non-negative).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swing {
    y: f32,
    z: f32,
}

impl Swing {
    pub const ZERO: Swing = Swing { y: 0.0, z: 0.0 };

    pub fn new(y: f32, z: f32) -> Swing {
        Swing { y, z }
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.z
    }

    #[inline]
    pub fn w_squared(&self) -> f32 {
        1.0 - self.y * self.y - self.z * self.z
    }

    #[inline]
    pub fn w(&self) -> f32 {
        let w_squared = self.w_squared();
        if w_squared > 0.0 {
            w_squared.sqrt()
        } else {
            0.0
        }
    }

    pub fn as_quaternion(&self, twist_axis: CartesianAxis) -> UnitQuaternion<f32> {
        let axis = twist_axis.index();
        let mut q = Quaternion::identity();
        q.coords[(axis + 1) % 3] = self.y;
        q.coords[(axis + 2) % 3] = self.z;
        q.coords[axis] = 0.0;
        q.coords[3] = self.w();
        UnitQuaternion::new_unchecked(q)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwistSwing {
    twist: Twist,
    swing: Swing,
}

impl TwistSwing {
    pub const ZERO: TwistSwing = TwistSwing {
        twist: Twist::ZERO,
        swing: Swing::ZERO,
    };

    pub fn new(twist: Twist, swing: Swing) -> TwistSwing {
        TwistSwing { twist, swing }
    }

    pub fn from_coordinates(x: f32, y: f32, z: f32) -> TwistSwing {
        TwistSwing {
            twist: Twist::new(x),
            swing: Swing::new(y, z),
        }
    }

    #[inline]
    pub fn twist(&self) -> Twist {
        self.twist
    }

    #[inline]
    pub fn swing(&self) -> Swing {
        self.swing
    }

    /// Recompose as twist-about-axis followed by swing.
    pub fn as_quaternion(&self, twist_axis: CartesianAxis) -> UnitQuaternion<f32> {
        let twist_x = self.twist.x();
        let twist_w = self.twist.w();
        let swing_y = self.swing.y();
        let swing_z = self.swing.z();
        let swing_w = self.swing.w();

        let axis = twist_axis.index();
        let mut q = Quaternion::identity();
        q.coords[axis] = swing_w * twist_x;
        q.coords[(axis + 1) % 3] = twist_w * swing_y + twist_x * swing_z;
        q.coords[(axis + 2) % 3] = twist_w * swing_z - twist_x * swing_y;
        q.coords[3] = swing_w * twist_w;
        UnitQuaternion::new_unchecked(q)
    }

    /// Split a unit rotation into twist about `twist_axis` followed by swing.
    pub fn decompose(twist_axis: CartesianAxis, q: &UnitQuaternion<f32>) -> TwistSwing {
        let axis = twist_axis.index();
        let w = q.coords[3];
        let x = q.coords[axis];
        let y = q.coords[(axis + 1) % 3];
        let z = q.coords[(axis + 2) % 3];

        let swing_w = (w * w + x * x).sqrt();

        let (twist_w, twist_z) = if swing_w != 0.0 {
            (w / swing_w, x / swing_w)
        } else {
            // a pure 180° swing has no unique decomposition; assume no twist
            (1.0, 0.0)
        };

        let swing_y = twist_w * y - twist_z * z;
        let swing_z = twist_w * z + twist_z * y;

        let twist = Twist::new(twist_w.signum() * twist_z);
        let swing = Swing::new(swing_y, swing_z);
        TwistSwing::new(twist, swing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_same_rotation(a: &UnitQuaternion<f32>, b: &UnitQuaternion<f32>, epsilon: f32) {
        let dot = a.coords.dot(&b.coords).abs();
        assert!((1.0 - dot).abs() < epsilon, "rotations differ: {a} vs {b}");
    }

    #[test]
    fn twist_from_angle_round_trips() {
        let twist = Twist::from_angle(0.8);
        assert_relative_eq!(twist.angle(), 0.8, epsilon = 1e-6);
    }

    #[test]
    fn twist_addition_composes_angles() {
        let sum = Twist::from_angle(0.3) + Twist::from_angle(0.5);
        assert_relative_eq!(sum.angle(), 0.8, epsilon = 1e-5);

        let difference = Twist::from_angle(0.3) - Twist::from_angle(0.5);
        assert_relative_eq!(difference.angle(), -0.2, epsilon = 1e-5);
    }

    #[test]
    fn decompose_round_trips_on_all_axes() {
        let q = UnitQuaternion::from_euler_angles(0.7, -0.4, 0.9);
        for axis in [CartesianAxis::X, CartesianAxis::Y, CartesianAxis::Z] {
            let ts = TwistSwing::decompose(axis, &q);
            let recomposed = ts.as_quaternion(axis);
            assert_same_rotation(&recomposed, &q, 1e-5);
        }
    }

    #[test]
    fn decompose_matches_quaternion_factorization() {
        let q = UnitQuaternion::from_euler_angles(0.5, 0.2, -0.3);
        let axis = CartesianAxis::X;
        let ts = TwistSwing::decompose(axis, &q);

        let twist_q = ts.twist().as_quaternion(axis);
        let swing_q = ts.swing().as_quaternion(axis);
        let recomposed = swing_q * twist_q;
        assert_same_rotation(&recomposed, &q, 1e-5);
    }

    #[test]
    fn zero_twist_swing_is_identity() {
        let q = TwistSwing::ZERO.as_quaternion(CartesianAxis::Y);
        assert_same_rotation(&q, &UnitQuaternion::identity(), 1e-6);
    }
}
