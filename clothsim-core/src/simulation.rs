use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::forces::ForceAccumulator;
use crate::integrator::verlet;
use crate::particles::ParticleState;
use crate::solver::{ConstraintSolver, SphereCollider};
use crate::topology::{DistanceConstraint, PinConstraint, Topology};
use glam::Vec3;

/// A square cloth pinned along its first row.
///
/// Owns all particle and constraint storage. Only the anchor setter mutates
/// anything outside of [`Cloth::update`], and `&mut self` keeps that from
/// overlapping a frame.
#[derive(Debug, Clone)]
pub struct Cloth {
    dim: usize,
    state: ParticleState,
    topology: Topology,
    forces: ForceAccumulator,
    solver: ConstraintSolver,
    damping: f32,
    frame: u64,
}

impl Cloth {
    /// Lay out a `dim × dim` cloth at `height` with the reference solver
    /// settings (8 iterations, sphere of radius 0.2 + 0.01 at the origin).
    pub fn new(dim: usize, spacing: f32, height: f32, gravity: Vec3) -> Result<Self, ClothError> {
        if dim < 2 {
            return Err(ClothError::InvalidTopology { dim });
        }
        let state = ParticleState::grid(dim, spacing, height);
        let topology = Topology::grid(&state, dim, spacing)?;
        log::info!(
            "built {dim}x{dim} cloth: {} links, {} pins, rest length {spacing}",
            topology.links().len(),
            topology.pins().len(),
        );
        Ok(Self {
            dim,
            state,
            topology,
            forces: ForceAccumulator::new(gravity),
            solver: ConstraintSolver::default(),
            damping: 0.0,
            frame: 0,
        })
    }

    pub fn from_config(config: &ClothConfig) -> Result<Self, ClothError> {
        config.validate()?;
        Ok(Self::new(config.dim, config.spacing(), config.height, config.gravity())?
            .with_iterations(config.iterations)
            .with_sphere(SphereCollider::from(&config.sphere))
            .with_damping(config.damping))
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.solver.iterations = iterations;
        self
    }

    pub fn with_sphere(mut self, sphere: SphereCollider) -> Self {
        self.solver.sphere = sphere;
        self
    }

    /// Expects `damping` in `[0, 1)`.
    pub fn with_damping(mut self, damping: f32) -> Self {
        debug_assert!(
            (0.0..1.0).contains(&damping),
            "damping must be in [0, 1), got {damping}"
        );
        self.damping = damping;
        self
    }

    /// Advance one frame: forces, integration, constraints.
    ///
    /// `dt` is taken as given; there is no internal clock. A non-positive or
    /// non-finite `dt` leaves the cloth untouched.
    pub fn update(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("ignoring update with dt = {dt}");
            return;
        }
        self.accumulate_forces();
        self.integrate(dt);
        self.solve_constraints();
        self.frame += 1;
        log::trace!("frame {}: max strain {:.6}", self.frame, self.max_strain());
    }

    pub fn accumulate_forces(&mut self) {
        self.forces.accumulate(&mut self.state);
    }

    pub fn integrate(&mut self, dt: f32) {
        verlet(&mut self.state, dt, self.damping);
    }

    pub fn solve_constraints(&mut self) {
        self.solver.solve_matched(&mut self.state, &self.topology);
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Accepted updates so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn gravity(&self) -> Vec3 {
        self.forces.gravity
    }

    pub fn solver(&self) -> &ConstraintSolver {
        &self.solver
    }

    pub fn position(&self, index: usize) -> Result<Vec3, ClothError> {
        self.state.position(index).ok_or(ClothError::IndexOutOfRange {
            index,
            len: self.state.len(),
        })
    }

    pub fn positions(&self) -> &[Vec3] {
        self.state.positions()
    }

    pub fn previous_positions(&self) -> &[Vec3] {
        self.state.previous_positions()
    }

    pub fn anchor(&self, row: usize) -> Result<Vec3, ClothError> {
        self.topology.anchor(row)
    }

    /// Move a pin anchor. Takes effect at the next solve.
    ///
    /// Pins win over the sphere: an anchor placed inside it keeps its
    /// particle there, so only the free particles are kept outside.
    pub fn set_anchor(&mut self, row: usize, anchor: Vec3) -> Result<(), ClothError> {
        if self.solver.sphere.project(anchor).is_some() {
            log::warn!("anchor {row} at {anchor} lies inside the collision sphere");
        }
        self.topology.set_anchor(row, anchor)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn links(&self) -> &[DistanceConstraint] {
        self.topology.links()
    }

    pub fn pins(&self) -> &[PinConstraint] {
        self.topology.pins()
    }

    pub fn line_indices(&self) -> Vec<u32> {
        self.topology.line_indices()
    }

    /// Largest relative deviation from the rest length over all links.
    pub fn max_strain(&self) -> f32 {
        let rest = self.topology.rest_length();
        let pos = self.state.positions();
        self.topology
            .links()
            .iter()
            .map(|link| (pos[link.a].distance(pos[link.b]) - rest).abs() / rest)
            .fold(0.0, f32::max)
    }
}
