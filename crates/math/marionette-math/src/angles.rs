//! Degree/radian conversion and angle normalization helpers.

use nalgebra::{Vector2, Vector3};

#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * (180.0 / std::f32::consts::PI)
}

#[inline]
pub fn degrees_to_radians_vector(degrees: Vector3<f32>) -> Vector3<f32> {
    degrees * (std::f32::consts::PI / 180.0)
}

#[inline]
pub fn radians_to_degrees_vector(radians: Vector3<f32>) -> Vector3<f32> {
    radians * (180.0 / std::f32::consts::PI)
}

/// IEEE-754 remainder: `x - modulus * round_to_even(x / modulus)`.
///
/// Unlike `%`, the result is centered on zero, so normalizing an angle with
/// a modulus of 2π lands in (-π, π].
#[inline]
pub fn ieee_remainder(x: f32, modulus: f32) -> f32 {
    x - modulus * (x / modulus).round_ties_even()
}

/// Normalize an angle in radians to (-π, π].
#[inline]
pub fn normalize_radians(angle: f32) -> f32 {
    ieee_remainder(angle, std::f32::consts::TAU)
}

/// Signed angle that rotates `from` onto `to`, in (-π, π].
#[inline]
pub fn angle_between(from: Vector2<f32>, to: Vector2<f32>) -> f32 {
    from.perp(&to).atan2(from.dot(&to))
}
