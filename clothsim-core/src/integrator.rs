use crate::particles::ParticleState;
use glam::Vec3;

/// Advance every particle by one position-Verlet step.
///
/// `newP = P + (P - Pold) * (1 - damping) + A * dt²`, after which the old
/// position is recorded and the acceleration cleared. With `damping = 0`
/// this is the undamped update `2P - Pold + A * dt²`.
///
/// The caller is responsible for rejecting `dt <= 0`.
pub fn verlet(state: &mut ParticleState, dt: f32, damping: f32) {
    let keep = 1.0 - damping;
    let dt2 = dt * dt;
    let (pos, prev_pos, accel) = state.arrays_mut();

    for ((p, old), a) in pos.iter_mut().zip(prev_pos.iter_mut()).zip(accel.iter_mut()) {
        let current = *p;
        *p = current + (current - *old) * keep + *a * dt2;
        *old = current;
        *a = Vec3::ZERO;
    }
}
