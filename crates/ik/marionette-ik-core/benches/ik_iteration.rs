use criterion::{black_box, criterion_group, criterion_main, Criterion};

use marionette_ik_core::{FlatChain, SolverKind, SolverSettings};
use nalgebra::Vector2;

fn bench_solvers(c: &mut Criterion) {
    let chain = FlatChain::make_serial(&vec![Vector2::new(1.0, 0.0); 9]);
    let unposed_source = chain.bones()[8].end;
    let target = Vector2::new(5.0, 3.0);
    let settings = SolverSettings::default();

    let mut group = c.benchmark_group("ik_iteration_9_bones");
    for kind in [
        SolverKind::SimpleDecay,
        SolverKind::Fabrik,
        SolverKind::GaussNewton,
        SolverKind::OverdeterminedGaussNewton,
        SolverKind::ExactHessian,
    ] {
        let solver = kind.make_solver(&settings);
        group.bench_function(format!("{kind:?}"), |b| {
            b.iter(|| {
                let mut inputs = chain.make_zero_inputs();
                solver.do_iteration(
                    &chain,
                    &mut inputs,
                    8,
                    black_box(unposed_source),
                    black_box(target),
                );
                black_box(inputs);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
