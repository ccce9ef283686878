//! Anchor animation applied between frames.

use crate::config::AnchorWaveConfig;
use crate::error::ClothError;
use crate::simulation::Cloth;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Vertical sine wave travelling along the pinned row.
///
/// Anchor `i` of `n` is placed at `rest_i + (0, amplitude * sin(2π f t + π i / (n - 1)), 0)`.
/// The rest positions are captured once so that repeated application does
/// not accumulate.
#[derive(Debug, Clone)]
pub struct AnchorWave {
    pub amplitude: f32,
    pub frequency: f32,
    rest: Vec<Vec3>,
}

impl AnchorWave {
    pub fn new(cloth: &Cloth, amplitude: f32, frequency: f32) -> Self {
        let rest = cloth.pins().iter().map(|pin| pin.anchor).collect();
        Self {
            amplitude,
            frequency,
            rest,
        }
    }

    pub fn from_config(cloth: &Cloth, config: &AnchorWaveConfig) -> Self {
        Self::new(cloth, config.amplitude, config.frequency)
    }

    /// Vertical offset of anchor `row` at time `t`.
    pub fn offset(&self, row: usize, t: f32) -> f32 {
        let span = (self.rest.len().saturating_sub(1)).max(1) as f32;
        let phase = PI * row as f32 / span;
        self.amplitude * (TAU * self.frequency * t + phase).sin()
    }

    pub fn apply(&self, cloth: &mut Cloth, t: f32) -> Result<(), ClothError> {
        for (row, rest) in self.rest.iter().enumerate() {
            cloth.set_anchor(row, *rest + Vec3::Y * self.offset(row, t))?;
        }
        Ok(())
    }
}
