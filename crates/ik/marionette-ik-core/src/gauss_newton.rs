use nalgebra::{DMatrix, DVector, Vector2};

use crate::chain::{ChainInputs, FlatChain};
use crate::numeric::pseudo_inverse;
use crate::settings::SolverSettings;
use crate::solver::IkSolver;

/// Exact Gauss-Newton step for the single-effector problem.
///
/// Column `i` of the Jacobian is the analytic gradient of the effector with
/// respect to bone `i`'s rotation; the step is pseudo-inverse(J) times the
/// effector residual, so rank-deficient chains degrade instead of failing.
pub struct GaussNewtonSolver {
    epsilon: f32,
}

impl GaussNewtonSolver {
    pub fn new(settings: &SolverSettings) -> GaussNewtonSolver {
        GaussNewtonSolver {
            epsilon: settings.pseudo_inverse_epsilon,
        }
    }
}

impl IkSolver for GaussNewtonSolver {
    fn do_iteration(
        &self,
        chain: &FlatChain,
        inputs: &mut ChainInputs,
        source_bone: usize,
        unposed_source: Vector2<f32>,
        target: Vector2<f32>,
    ) {
        let source = chain.transform_point(inputs, source_bone, unposed_source);
        let bones = chain.chain_to_root(source_bone);

        let residuals = DVector::from_column_slice(&[target.x - source.x, target.y - source.y]);

        let mut jacobian = DMatrix::zeros(2, bones.len());
        for (column, &bone_idx) in bones.iter().enumerate() {
            let bone_gradient = chain.gradient_of_transformed_point(inputs, bone_idx, source);
            jacobian[(0, column)] = bone_gradient.x;
            jacobian[(1, column)] = bone_gradient.y;
        }

        let step = pseudo_inverse(&jacobian, self.epsilon) * residuals.clone();

        for (column, &bone_idx) in bones.iter().enumerate() {
            inputs.increment_rotation(bone_idx, step[column]);
        }

        log::trace!(
            "gauss-newton step over {} bones, residual {}",
            bones.len(),
            residuals.norm()
        );
    }
}
