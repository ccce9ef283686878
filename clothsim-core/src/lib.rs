pub mod animation;
pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod particles;
pub mod runtime;
pub mod simulation;
pub mod solver;
pub mod topology;

pub use animation::AnchorWave;
pub use config::{AnchorWaveConfig, ClothConfig, SphereConfig};
pub use error::ClothError;
pub use particles::ParticleState;
pub use runtime::{
    build_simulation_context, measure, run_config, step_simulation, Measurement, RunSummary,
    SimulationContext,
};
pub use simulation::Cloth;
pub use solver::{ConstraintSolver, SphereCollider, DEFAULT_ITERATIONS};
pub use topology::{DistanceConstraint, PinConstraint, Topology};
