use crate::particles::ParticleState;
use glam::Vec3;

/// Writes the per-step acceleration of every particle.
///
/// Accelerations are overwritten, not summed: nothing carries over from the
/// previous step, so any extra force source has to be written here on every
/// call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceAccumulator {
    pub gravity: Vec3,
}

impl ForceAccumulator {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    pub fn accumulate(&self, state: &mut ParticleState) {
        state.accelerations_mut().fill(self.gravity);
    }
}
