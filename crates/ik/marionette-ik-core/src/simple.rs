use nalgebra::Vector2;

use crate::chain::{ChainInputs, FlatChain};
use crate::settings::SolverSettings;
use crate::solver::IkSolver;
use marionette_math::angle_between;

/// Walk from the effector to the root, rotating each bone by the angle that
/// would swing the effector onto the target, scaled by a geometrically
/// decaying weight. Cheap and stable, never exact.
pub struct SimpleDecaySolver {
    decay: f32,
}

impl SimpleDecaySolver {
    pub fn new(settings: &SolverSettings) -> SimpleDecaySolver {
        SimpleDecaySolver {
            decay: settings.decay,
        }
    }
}

impl SimpleDecaySolver {
    fn adjust_bone(
        &self,
        chain: &FlatChain,
        inputs: &mut ChainInputs,
        bone_idx: usize,
        source: Vector2<f32>,
        target: Vector2<f32>,
        weight: f32,
    ) {
        let center = chain.transform_point(inputs, bone_idx, chain.bones()[bone_idx].center);
        let rotation_delta = angle_between(source - center, target - center);
        inputs.increment_rotation(bone_idx, rotation_delta * weight);
    }
}

impl IkSolver for SimpleDecaySolver {
    fn do_iteration(
        &self,
        chain: &FlatChain,
        inputs: &mut ChainInputs,
        source_bone: usize,
        unposed_source: Vector2<f32>,
        target: Vector2<f32>,
    ) {
        let source = chain.transform_point(inputs, source_bone, unposed_source);

        let mut weight = 1.0 - self.decay;
        for bone_idx in chain.chain_to_root(source_bone) {
            self.adjust_bone(chain, inputs, bone_idx, source, target, weight);
            weight *= self.decay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::IkSolver;

    #[test]
    fn iterations_close_in_on_the_target() {
        let chain = FlatChain::make_serial(&[
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 0.0),
        ]);
        let mut inputs = chain.make_zero_inputs();
        let solver = SimpleDecaySolver::new(&SolverSettings::default());

        let unposed_source = chain.bones()[2].end;
        let target = Vector2::new(1.5, 1.5);

        let start_distance = (chain.transform_point(&inputs, 2, unposed_source) - target).norm();
        for _ in 0..100 {
            solver.do_iteration(&chain, &mut inputs, 2, unposed_source, target);
        }
        let end_distance = (chain.transform_point(&inputs, 2, unposed_source) - target).norm();

        assert!(end_distance < start_distance * 0.1);
    }
}
