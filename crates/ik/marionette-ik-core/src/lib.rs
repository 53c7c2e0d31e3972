//! Inverse kinematics for the marionette figure-posing core.
//!
//! Five interchangeable single-iteration strategies over a planar bone
//! chain (a decaying angle chase, FABRIK, two Gauss-Newton variants, and an
//! exact-Hessian Newton step) plus a damped 3D solver that runs directly
//! against the rigid skeleton. Solvers never fail on unreachable or
//! degenerate targets: rank-deficient systems go through a pseudo-inverse
//! and simply yield smaller steps, and rotation-limit clamping is the
//! caller's job after each iteration.

pub mod chain;
pub mod exact_hessian;
pub mod fabrik;
pub mod gauss_newton;
pub mod goal;
pub mod numeric;
pub mod overdetermined;
pub mod settings;
pub mod simple;
pub mod skeletal;
pub mod solver;

pub use chain::{ChainError, ChainInputs, FlatBone, FlatChain};
pub use exact_hessian::ExactHessianSolver;
pub use fabrik::{FabrikChain, FabrikSolver};
pub use gauss_newton::GaussNewtonSolver;
pub use goal::IkGoal;
pub use overdetermined::OverdeterminedGaussNewtonSolver;
pub use settings::SolverSettings;
pub use simple::SimpleDecaySolver;
pub use skeletal::SkeletalIkSolver;
pub use solver::{IkSolver, SolverKind};
