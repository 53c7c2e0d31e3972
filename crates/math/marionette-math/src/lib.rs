//! Math foundations for the marionette figure-posing core.
//!
//! Everything here is plain value math with no figure semantics attached:
//! Euler-order-aware quaternion conversion, the two transform stages used by
//! staged skinning (non-uniform scaling and rigid dual-quaternion motion),
//! twist/swing rotation decomposition, the TCB spline used by channel
//! formulas, and small angle utilities shared by the planar IK demo chain.

pub mod angles;
pub mod dual_quaternion;
pub mod ellipse_clamp;
pub mod quat;
pub mod rotation_order;
pub mod scaling_transform;
pub mod spline;
pub mod twist_swing;

pub use angles::{angle_between, degrees_to_radians, ieee_remainder, radians_to_degrees};
pub use dual_quaternion::DualQuaternion;
pub use ellipse_clamp::clamp_to_ellipse;
pub use quat::{decompose_twist_then_swing, rotate_between};
pub use rotation_order::RotationOrder;
pub use scaling_transform::ScalingTransform;
pub use spline::{Knot, Spline};
pub use twist_swing::{CartesianAxis, Swing, Twist, TwistSwing};
