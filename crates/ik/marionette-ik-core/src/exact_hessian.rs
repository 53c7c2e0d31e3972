use nalgebra::{DMatrix, DVector, Vector2};

use crate::chain::{ChainInputs, FlatChain};
use crate::numeric::pseudo_inverse;
use crate::settings::SolverSettings;
use crate::solver::IkSolver;

/// Newton step with the full analytic Hessian.
///
/// The chain is unrolled root-to-effector into bone vectors with weights
/// 1/(n-i); the quadratic model of squared target distance gets its exact
/// gradient and Hessian, including the cross terms between every pair of
/// bones. Near-singular configurations make a plain inverse explode, so the
/// step goes through the pseudo-inverse. Raw steps are cumulative world
/// rotations; each bone's channel stores a local rotation, so bone `i`
/// receives the *difference* between consecutive steps, scaled by its
/// weight.
pub struct ExactHessianSolver {
    epsilon: f32,
}

impl ExactHessianSolver {
    pub fn new(settings: &SolverSettings) -> ExactHessianSolver {
        ExactHessianSolver {
            epsilon: settings.pseudo_inverse_epsilon,
        }
    }
}

impl IkSolver for ExactHessianSolver {
    fn do_iteration(
        &self,
        chain: &FlatChain,
        inputs: &mut ChainInputs,
        source_bone: usize,
        unposed_source: Vector2<f32>,
        target: Vector2<f32>,
    ) {
        // ordered root first, effector-most bone last
        let mut bones = chain.chain_to_root(source_bone);
        bones.reverse();
        let bone_count = bones.len();

        let posed_source = chain.transform_point(inputs, source_bone, unposed_source);
        let posed_centers: Vec<Vector2<f32>> = bones
            .iter()
            .map(|&bone_idx| {
                chain.transform_point(inputs, bone_idx, chain.bones()[bone_idx].center)
            })
            .collect();

        let bone_vectors: Vec<Vector2<f32>> = (0..bone_count)
            .map(|i| {
                let segment_end = if i + 1 < bone_count {
                    posed_centers[i + 1]
                } else {
                    posed_source
                };
                segment_end - posed_centers[i]
            })
            .collect();

        let weights: Vec<f32> = (0..bone_count).map(|i| 1.0 / (bone_count - i) as f32).collect();

        let mut gradient = DVector::zeros(bone_count);
        let mut hessian = DMatrix::zeros(bone_count, bone_count);

        for i in 0..bone_count {
            let bi = bone_vectors[i];
            let temp = target - posed_source + bi;

            gradient[i] = weights[i] * (bi.y * temp.x - bi.x * temp.y);
            hessian[(i, i)] = weights[i] * weights[i] * bi.dot(&temp);

            for j in 0..bone_count {
                if i != j {
                    hessian[(i, j)] = weights[i] * weights[j] * bone_vectors[i].dot(&bone_vectors[j]);
                }
            }
        }

        let step = -(pseudo_inverse(&hessian, self.epsilon) * gradient);

        for i in 0..bone_count {
            let local_rotation_delta = step[i] - if i > 0 { step[i - 1] } else { 0.0 };
            inputs.increment_rotation(bones[i], weights[i] * local_rotation_delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterations_reduce_target_distance() {
        let chain = FlatChain::make_serial(&[
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 0.0),
        ]);
        let mut inputs = chain.make_zero_inputs();
        inputs.set_rotation(0, 0.2);
        inputs.set_rotation(1, -0.1);
        inputs.set_rotation(2, 0.15);
        let solver = ExactHessianSolver::new(&SolverSettings::default());

        let unposed_source = chain.bones()[2].end;
        let target = Vector2::new(1.5, 1.5);

        let start_distance = (chain.transform_point(&inputs, 2, unposed_source) - target).norm();
        for _ in 0..100 {
            solver.do_iteration(&chain, &mut inputs, 2, unposed_source, target);
        }
        let end_distance = (chain.transform_point(&inputs, 2, unposed_source) - target).norm();

        // the quadratic model is approximate; this strategy closes much of
        // the gap but does not converge all the way like Gauss-Newton does
        assert!(end_distance.is_finite());
        assert!(end_distance < start_distance * 0.8);
    }

    #[test]
    fn straight_singular_configuration_stays_finite() {
        // a fully extended chain aiming along its own axis is singular
        let chain = FlatChain::make_serial(&[Vector2::new(1.0, 0.0), Vector2::new(1.0, 0.0)]);
        let mut inputs = chain.make_zero_inputs();
        let solver = ExactHessianSolver::new(&SolverSettings::default());

        let unposed_source = chain.bones()[1].end;
        let target = Vector2::new(3.0, 0.0);

        solver.do_iteration(&chain, &mut inputs, 1, unposed_source, target);
        assert!(inputs.get_rotation(0).is_finite());
        assert!(inputs.get_rotation(1).is_finite());
    }
}
