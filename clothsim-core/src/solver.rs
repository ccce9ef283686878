//! Iterative constraint satisfaction.
//!
//! One solve is a pin pass followed by a fixed number of relaxation
//! iterations. Each iteration walks the links in insertion order
//! (Gauss-Seidel style, every correction is visible to the next one) and then
//! projects particles out of the sphere. There is no convergence test.

use crate::error::ClothError;
use crate::particles::ParticleState;
use crate::topology::Topology;
use glam::Vec3;

pub const DEFAULT_ITERATIONS: usize = 8;

/// Links shorter than this are left alone for the iteration.
const MIN_LINK_LENGTH: f32 = 1e-6;

/// Static sphere the cloth collides with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub center: Vec3,
    pub radius: f32,
    /// Extra clearance added to the radius.
    pub bias: f32,
}

impl Default for SphereCollider {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.2,
            bias: 0.01,
        }
    }
}

impl SphereCollider {
    pub fn effective_radius(&self) -> f32 {
        self.radius + self.bias
    }

    /// Surface point for a penetrating position, `None` when `p` is outside.
    ///
    /// A position exactly at the center is pushed out along +Y.
    pub fn project(&self, p: Vec3) -> Option<Vec3> {
        let r = self.effective_radius();
        let offset = p - self.center;
        let dist = offset.length();
        if dist >= r {
            return None;
        }
        let normal = if dist > 0.0 { offset / dist } else { Vec3::Y };
        Some(self.center + normal * r)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintSolver {
    pub iterations: usize,
    pub sphere: SphereCollider,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            sphere: SphereCollider::default(),
        }
    }
}

impl ConstraintSolver {
    pub fn new(iterations: usize, sphere: SphereCollider) -> Self {
        Self { iterations, sphere }
    }

    /// Run one pin pass and `iterations` relaxation passes over `state`.
    ///
    /// `topology` must have been built for a state of the same length.
    pub fn solve(&self, state: &mut ParticleState, topology: &Topology) -> Result<(), ClothError> {
        if state.len() != topology.particle_count() {
            return Err(ClothError::TopologyMismatch {
                expected: topology.particle_count(),
                actual: state.len(),
            });
        }
        self.solve_matched(state, topology);
        Ok(())
    }

    /// `solve` for a state and topology known to agree in length.
    pub(crate) fn solve_matched(&self, state: &mut ParticleState, topology: &Topology) {
        let pos = state.positions_mut();
        apply_pins(pos, topology);
        for _ in 0..self.iterations {
            relax_links(pos, topology);
            self.collide(pos, topology);
        }
    }

    fn collide(&self, pos: &mut [Vec3], topology: &Topology) {
        for (i, p) in pos.iter_mut().enumerate() {
            if topology.is_pinned(i) {
                continue;
            }
            if let Some(surface) = self.sphere.project(*p) {
                *p = surface;
            }
        }
    }
}

fn apply_pins(pos: &mut [Vec3], topology: &Topology) {
    for pin in topology.pins() {
        pos[pin.index] = pin.anchor;
    }
}

fn relax_links(pos: &mut [Vec3], topology: &Topology) {
    let rest = topology.rest_length();
    for link in topology.links() {
        let wa = if topology.is_pinned(link.a) { 0.0 } else { 1.0 };
        let wb = if topology.is_pinned(link.b) { 0.0 } else { 1.0 };
        if let Some((a, b)) = relax_pair(pos[link.a], pos[link.b], rest, wa, wb) {
            pos[link.a] = a;
            pos[link.b] = b;
        }
    }
}

/// Move two endpoints toward `rest` apart, splitting the correction by
/// inverse mass.
///
/// Two free endpoints each take half of `diff * delta`. A pinned endpoint
/// (weight 0) stays put and the other takes all of it. Returns `None` when
/// nothing can move or the endpoints coincide.
pub fn relax_pair(a: Vec3, b: Vec3, rest: f32, wa: f32, wb: f32) -> Option<(Vec3, Vec3)> {
    let w = wa + wb;
    if w == 0.0 {
        return None;
    }
    let delta = b - a;
    let len = delta.length();
    if len < MIN_LINK_LENGTH {
        return None;
    }
    let correction = delta * ((len - rest) / len);
    Some((a + correction * (wa / w), b - correction * (wb / w)))
}
