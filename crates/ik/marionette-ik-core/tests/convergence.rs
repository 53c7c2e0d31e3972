//! End-to-end convergence scenarios across the solver strategies.

use marionette_ik_core::{FlatChain, IkSolver, SolverKind, SolverSettings};
use nalgebra::Vector2;
use std::f32::consts::FRAC_PI_3;

fn nine_bone_chain() -> FlatChain {
    FlatChain::make_serial(&vec![Vector2::new(1.0, 0.0); 9])
}

fn effector_distance(chain: &FlatChain, inputs: &marionette_ik_core::ChainInputs, target: Vector2<f32>) -> f32 {
    let unposed_source = chain.bones()[8].end;
    (chain.transform_point(inputs, 8, unposed_source) - target).norm()
}

/// Rotation limits live outside the solvers: clip after every iteration.
fn clamp_rotations(inputs: &mut marionette_ik_core::ChainInputs, limit: f32) {
    for bone_idx in 0..inputs.bone_count() {
        let clamped = inputs.get_rotation(bone_idx).clamp(-limit, limit);
        inputs.set_rotation(bone_idx, clamped);
    }
}

#[test]
fn gauss_newton_converges_on_the_nine_bone_chain() {
    let chain = nine_bone_chain();
    let mut inputs = chain.make_zero_inputs();
    let solver = SolverKind::GaussNewton.make_solver(&SolverSettings::default());

    let unposed_source = chain.bones()[8].end;
    // effector starts at (9, 0); the target is 5 units away and well inside
    // the chain's reach
    let target = Vector2::new(5.0, 3.0);

    let start_distance = effector_distance(&chain, &inputs, target);
    assert!((start_distance - 5.0).abs() < 1e-4);

    for _ in 0..50 {
        solver.do_iteration(&chain, &mut inputs, 8, unposed_source, target);
        clamp_rotations(&mut inputs, FRAC_PI_3);
    }

    let end_distance = effector_distance(&chain, &inputs, target);
    assert!(end_distance < start_distance);
    assert!(
        end_distance < 0.01,
        "expected convergence under 0.01, got {end_distance}"
    );
}

#[test]
fn every_strategy_improves_on_a_four_bone_chain() {
    let target = Vector2::new(3.0, 1.5);

    for kind in [
        SolverKind::SimpleDecay,
        SolverKind::Fabrik,
        SolverKind::GaussNewton,
        SolverKind::OverdeterminedGaussNewton,
        SolverKind::ExactHessian,
    ] {
        let chain = FlatChain::make_serial(&vec![Vector2::new(1.0, 0.0); 4]);
        let mut inputs = chain.make_zero_inputs();
        let solver = kind.make_solver(&SolverSettings::default());
        let unposed_source = chain.bones()[3].end;

        let start_distance =
            (chain.transform_point(&inputs, 3, unposed_source) - target).norm();
        for _ in 0..50 {
            solver.do_iteration(&chain, &mut inputs, 3, unposed_source, target);
            clamp_rotations(&mut inputs, FRAC_PI_3);
        }
        let end_distance = (chain.transform_point(&inputs, 3, unposed_source) - target).norm();

        assert!(
            end_distance.is_finite(),
            "{kind:?} produced a non-finite pose"
        );
        assert!(
            end_distance < start_distance * 0.5,
            "{kind:?} did not improve enough: {start_distance} -> {end_distance}"
        );
    }
}

#[test]
fn unreachable_target_settles_without_error() {
    let chain = nine_bone_chain();
    let mut inputs = chain.make_zero_inputs();
    let solver = SolverKind::GaussNewton.make_solver(&SolverSettings::default());

    let unposed_source = chain.bones()[8].end;
    let target = Vector2::new(30.0, 0.0);

    for _ in 0..50 {
        solver.do_iteration(&chain, &mut inputs, 8, unposed_source, target);
    }

    // the fully extended chain already points at the target; the gradients
    // are all perpendicular to the residual, so the solver settles at the
    // chain's reach instead of erroring out
    let effector = chain.transform_point(&inputs, 8, unposed_source);
    assert!(effector.x.is_finite() && effector.y.is_finite());
    let distance = (effector - target).norm();
    assert!((distance - 21.0).abs() < 0.5);
}
