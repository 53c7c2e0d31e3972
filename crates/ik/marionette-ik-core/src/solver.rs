use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::chain::{ChainInputs, FlatChain};
use crate::settings::SolverSettings;

/// One iteration of an IK strategy.
///
/// Given a point fixed in `source_bone`'s local space and a world-space
/// target, adjust the rotations of the bones from `source_bone` up to the
/// root so the posed point moves toward the target. Solvers are advisory:
/// unreachable targets converge to the closest feasible pose and are never
/// an error, and rotation limits are clamped by the caller afterwards.
pub trait IkSolver {
    fn do_iteration(
        &self,
        chain: &FlatChain,
        inputs: &mut ChainInputs,
        source_bone: usize,
        unposed_source: Vector2<f32>,
        target: Vector2<f32>,
    );
}

/// Uniform selection over the five strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    SimpleDecay,
    Fabrik,
    GaussNewton,
    OverdeterminedGaussNewton,
    ExactHessian,
}

impl SolverKind {
    pub fn make_solver(self, settings: &SolverSettings) -> Box<dyn IkSolver> {
        match self {
            SolverKind::SimpleDecay => Box::new(crate::simple::SimpleDecaySolver::new(settings)),
            SolverKind::Fabrik => Box::new(crate::fabrik::FabrikSolver),
            SolverKind::GaussNewton => Box::new(crate::gauss_newton::GaussNewtonSolver::new(settings)),
            SolverKind::OverdeterminedGaussNewton => {
                Box::new(crate::overdetermined::OverdeterminedGaussNewtonSolver::new(settings))
            }
            SolverKind::ExactHessian => {
                Box::new(crate::exact_hessian::ExactHessianSolver::new(settings))
            }
        }
    }
}
