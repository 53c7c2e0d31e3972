//! Rigid rotation+translation represented as a dual quaternion.
//!
//! This is the rotation stage of a staged skinning transform. Keeping the
//! rigid part in dual-quaternion form (instead of a 4×4 matrix) is what makes
//! blending between bone transforms well-defined during skinning.

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualQuaternion {
    real: Quaternion<f32>,
    dual: Quaternion<f32>,
}

fn scale(q: &Quaternion<f32>, s: f32) -> Quaternion<f32> {
    Quaternion::from_parts(q.w * s, q.imag() * s)
}

impl DualQuaternion {
    pub fn identity() -> DualQuaternion {
        DualQuaternion {
            real: Quaternion::identity(),
            dual: Quaternion::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn from_rotation_translation(
        rotation: UnitQuaternion<f32>,
        translation: Vector3<f32>,
    ) -> DualQuaternion {
        let real = rotation.into_inner();
        let dual = scale(&(Quaternion::from_parts(0.0, translation) * real), 0.5);
        DualQuaternion { real, dual }
    }

    pub fn from_translation(translation: Vector3<f32>) -> DualQuaternion {
        DualQuaternion {
            real: Quaternion::identity(),
            dual: scale(&Quaternion::from_parts(0.0, translation), 0.5),
        }
    }

    pub fn from_rotation(rotation: UnitQuaternion<f32>) -> DualQuaternion {
        DualQuaternion::from_rotation_translation(rotation, Vector3::zeros())
    }

    /// The real part is kept unit-length by construction.
    pub fn rotation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::new_unchecked(self.real)
    }

    pub fn translation(&self) -> Vector3<f32> {
        let t = scale(&(self.dual * self.real.conjugate()), 2.0);
        t.imag()
    }

    pub fn transform(&self, v: Vector3<f32>) -> Vector3<f32> {
        self.rotation() * v + self.translation()
    }

    pub fn inverse_transform(&self, v: Vector3<f32>) -> Vector3<f32> {
        self.rotation().inverse() * (v - self.translation())
    }

    fn multiply(dq1: &DualQuaternion, dq2: &DualQuaternion) -> DualQuaternion {
        DualQuaternion {
            real: dq1.real * dq2.real,
            dual: dq1.real * dq2.dual + dq1.dual * dq2.real,
        }
    }

    /// The transform that applies `self` first, then `then`.
    pub fn chain(&self, then: &DualQuaternion) -> DualQuaternion {
        DualQuaternion::multiply(then, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotation_translation_round_trip() {
        let rotation = UnitQuaternion::from_euler_angles(0.2, 0.5, -0.7);
        let translation = Vector3::new(1.0, -2.0, 3.0);
        let dq = DualQuaternion::from_rotation_translation(rotation, translation);

        assert_relative_eq!(
            dq.rotation().into_inner().coords,
            rotation.into_inner().coords,
            epsilon = 1e-6
        );
        assert_relative_eq!(dq.translation(), translation, epsilon = 1e-5);
    }

    #[test]
    fn chain_applies_in_order() {
        let a = DualQuaternion::from_rotation_translation(
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let b = DualQuaternion::from_rotation_translation(
            UnitQuaternion::from_euler_angles(-0.4, 0.0, 0.6),
            Vector3::new(0.0, 2.0, 0.0),
        );

        let v = Vector3::new(0.5, 1.5, -2.5);
        let chained = a.chain(&b);
        assert_relative_eq!(chained.transform(v), b.transform(a.transform(v)), epsilon = 1e-4);
    }

    #[test]
    fn inverse_transform_undoes_transform() {
        let dq = DualQuaternion::from_rotation_translation(
            UnitQuaternion::from_euler_angles(0.9, -0.3, 0.2),
            Vector3::new(-1.0, 4.0, 2.0),
        );
        let v = Vector3::new(3.0, -1.0, 0.5);
        assert_relative_eq!(dq.inverse_transform(dq.transform(v)), v, epsilon = 1e-5);
    }
}
