use crate::error::ClothError;
use glam::Vec3;

/// Contiguous particle storage for the cloth.
///
/// Every particle has unit mass. The three arrays always have the same
/// length, fixed when the state is built; indices stay valid for the
/// lifetime of the state.
#[derive(Debug, Clone)]
pub struct ParticleState {
    pos: Vec<Vec3>,
    prev_pos: Vec<Vec3>,
    accel: Vec<Vec3>,
}

impl ParticleState {
    /// Build a state at rest (previous position equal to position).
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let n = positions.len();
        Self {
            prev_pos: positions.clone(),
            pos: positions,
            accel: vec![Vec3::ZERO; n],
        }
    }

    /// Lay `dim × dim` particles on the horizontal plane `y = height`,
    /// `spacing` apart and centred on the origin in x/z.
    ///
    /// Particle `(xx, zz)` gets index `zz * dim + xx`.
    pub fn grid(dim: usize, spacing: f32, height: f32) -> Self {
        let half = spacing * (dim.saturating_sub(1)) as f32 / 2.0;
        let mut positions = Vec::with_capacity(dim * dim);
        for zz in 0..dim {
            for xx in 0..dim {
                positions.push(Vec3::new(
                    xx as f32 * spacing - half,
                    height,
                    zz as f32 * spacing - half,
                ));
            }
        }
        Self::from_positions(positions)
    }

    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.pos.get(index).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.pos
    }

    pub fn previous_positions(&self) -> &[Vec3] {
        &self.prev_pos
    }

    pub fn accelerations(&self) -> &[Vec3] {
        &self.accel
    }

    /// Set the implicit velocity of a particle: the displacement it carries
    /// into the next integration step.
    pub fn set_displacement(&mut self, index: usize, displacement: Vec3) -> Result<(), ClothError> {
        let len = self.pos.len();
        let (Some(p), Some(old)) = (self.pos.get(index), self.prev_pos.get_mut(index)) else {
            return Err(ClothError::IndexOutOfRange { index, len });
        };
        *old = *p - displacement;
        Ok(())
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.pos
    }

    pub(crate) fn accelerations_mut(&mut self) -> &mut [Vec3] {
        &mut self.accel
    }

    /// Split borrow used by the integrator.
    pub(crate) fn arrays_mut(&mut self) -> (&mut [Vec3], &mut [Vec3], &mut [Vec3]) {
        (&mut self.pos, &mut self.prev_pos, &mut self.accel)
    }
}
