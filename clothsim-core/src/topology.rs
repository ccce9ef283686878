//! Fixed connectivity of the cloth: pinned anchors and distance links.
//!
//! Built once from the initial particle layout and never resized. Only the
//! anchor positions may change afterwards, through [`Topology::set_anchor`].

use crate::error::ClothError;
use crate::particles::ParticleState;
use glam::Vec3;

/// A particle held at a fixed anchor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinConstraint {
    pub index: usize,
    pub anchor: Vec3,
}

/// A stick between two particles, held at the shared rest length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceConstraint {
    pub a: usize,
    pub b: usize,
}

#[derive(Debug, Clone)]
pub struct Topology {
    particle_count: usize,
    rest_length: f32,
    pins: Vec<PinConstraint>,
    links: Vec<DistanceConstraint>,
    pinned: Vec<bool>,
}

impl Topology {
    /// Build from explicit pins and links over `particle_count` particles.
    ///
    /// Every pin and link endpoint must index one of those particles.
    pub fn new(
        particle_count: usize,
        rest_length: f32,
        pins: Vec<PinConstraint>,
        links: Vec<DistanceConstraint>,
    ) -> Result<Self, ClothError> {
        let out_of_range = pins
            .iter()
            .map(|pin| pin.index)
            .chain(links.iter().flat_map(|link| [link.a, link.b]))
            .find(|&index| index >= particle_count);
        if let Some(index) = out_of_range {
            return Err(ClothError::IndexOutOfRange {
                index,
                len: particle_count,
            });
        }

        let mut pinned = vec![false; particle_count];
        for pin in &pins {
            pinned[pin.index] = true;
        }
        Ok(Self {
            particle_count,
            rest_length,
            pins,
            links,
            pinned,
        })
    }

    /// Standard cloth topology for a `dim × dim` grid.
    ///
    /// Pins the first row (`zz = 0`) at its current positions, then links
    /// every horizontal neighbour pair row by row followed by every vertical
    /// pair column by column. That insertion order is the relaxation order.
    pub fn grid(state: &ParticleState, dim: usize, rest_length: f32) -> Result<Self, ClothError> {
        if dim < 2 || state.len() != dim * dim {
            return Err(ClothError::InvalidTopology { dim });
        }

        let pins = state.positions()[..dim]
            .iter()
            .enumerate()
            .map(|(index, &anchor)| PinConstraint { index, anchor })
            .collect();

        let mut links = Vec::with_capacity(2 * dim * (dim - 1));
        for zz in 0..dim {
            for xx in 0..dim - 1 {
                let a = xx + dim * zz;
                links.push(DistanceConstraint { a, b: a + 1 });
            }
        }
        for xx in 0..dim {
            for zz in 0..dim - 1 {
                let a = xx + dim * zz;
                links.push(DistanceConstraint { a, b: a + dim });
            }
        }

        Self::new(state.len(), rest_length, pins, links)
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub fn pins(&self) -> &[PinConstraint] {
        &self.pins
    }

    pub fn links(&self) -> &[DistanceConstraint] {
        &self.links
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.pinned.get(index).copied().unwrap_or(false)
    }

    /// Link endpoints flattened as `[a0, b0, a1, b1, ...]`, ready for a
    /// line-list index buffer.
    pub fn line_indices(&self) -> Vec<u32> {
        self.links
            .iter()
            .flat_map(|link| [link.a as u32, link.b as u32])
            .collect()
    }

    pub fn anchor(&self, row: usize) -> Result<Vec3, ClothError> {
        self.pins
            .get(row)
            .map(|pin| pin.anchor)
            .ok_or(ClothError::IndexOutOfRange {
                index: row,
                len: self.pins.len(),
            })
    }

    pub fn set_anchor(&mut self, row: usize, anchor: Vec3) -> Result<(), ClothError> {
        let len = self.pins.len();
        let pin = self
            .pins
            .get_mut(row)
            .ok_or(ClothError::IndexOutOfRange { index: row, len })?;
        pin.anchor = anchor;
        Ok(())
    }
}
