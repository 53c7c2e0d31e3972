//! Quaternion helpers shared by the skeleton and IK layers.

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

/// Shortest-arc rotation taking `from` onto `to`.
///
/// Neither input needs to be normalized. For exactly opposed vectors the
/// half-angle construction degenerates; any perpendicular axis gives a valid
/// 180° rotation, so one is picked deterministically.
pub fn rotate_between(from: Vector3<f32>, to: Vector3<f32>) -> UnitQuaternion<f32> {
    let xyz = from.cross(&to);
    let w = (from.norm_squared() * to.norm_squared()).sqrt() + from.dot(&to);

    let q = Quaternion::from_parts(w, xyz);
    if q.norm() > 1e-6 {
        UnitQuaternion::from_quaternion(q)
    } else {
        let axis = perpendicular(from);
        UnitQuaternion::from_axis_angle(&axis, std::f32::consts::PI)
    }
}

fn perpendicular(v: Vector3<f32>) -> Unit<Vector3<f32>> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    Unit::new_normalize(v.cross(&candidate))
}

/// Split `q` into a twist about `axis` followed by a swing.
///
/// `axis` must be a unit vector. Recomposing as twist-then-swing
/// (`swing * twist` in multiplication order) reproduces `q`.
pub fn decompose_twist_then_swing(
    q: &UnitQuaternion<f32>,
    axis: &Unit<Vector3<f32>>,
) -> (UnitQuaternion<f32>, UnitQuaternion<f32>) {
    let projected = Quaternion::from_parts(q.w, axis.into_inner().component_mul(&q.imag()));

    let twist = if projected.norm() > 1e-9 {
        UnitQuaternion::from_quaternion(projected)
    } else {
        // q is a pure 180° swing; the twist component is arbitrary, take none.
        UnitQuaternion::identity()
    };

    let swing = q * twist.inverse();
    (twist, swing)
}
