//! Scene configuration loaded from JSON.
//!
//! Every field has a default, so `{}` is a valid config describing the
//! reference scene: a 32×32 cloth of side 1.0 hanging at height 0.5 over a
//! sphere of radius 0.2 at the origin.

use crate::error::ClothError;
use crate::solver::{SphereCollider, DEFAULT_ITERATIONS};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
    /// Particles per grid side
    pub dim: usize,
    /// Side length of the square cloth
    pub length: f32,
    /// Initial height of the cloth plane
    pub height: f32,
    pub gravity: [f32; 3],
    /// Relaxation iterations per frame
    pub iterations: usize,
    /// Velocity damping in `[0, 1)`, 0 keeps trajectories undamped
    pub damping: f32,
    pub sphere: SphereConfig,
    /// Time step used by the headless runner
    pub dt: f32,
    /// Frames simulated by the headless runner
    pub frames: usize,
    pub anchor_wave: Option<AnchorWaveConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub center: [f32; 3],
    pub radius: f32,
    pub bias: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorWaveConfig {
    pub amplitude: f32,
    /// Oscillations per second
    pub frequency: f32,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            dim: 32,
            length: 1.0,
            height: 0.5,
            gravity: [0.0, -0.5, 0.0],
            iterations: DEFAULT_ITERATIONS,
            damping: 0.0,
            sphere: SphereConfig::default(),
            dt: 1.0 / 60.0,
            frames: 600,
            anchor_wave: None,
        }
    }
}

impl Default for SphereConfig {
    fn default() -> Self {
        let sphere = SphereCollider::default();
        Self {
            center: sphere.center.to_array(),
            radius: sphere.radius,
            bias: sphere.bias,
        }
    }
}

impl From<&SphereConfig> for SphereCollider {
    fn from(config: &SphereConfig) -> Self {
        Self {
            center: Vec3::from_array(config.center),
            radius: config.radius,
            bias: config.bias,
        }
    }
}

impl ClothConfig {
    pub fn load(path: &Path) -> Result<Self, ClothError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ClothError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ClothError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Distance between neighbouring particles, also the rest length.
    pub fn spacing(&self) -> f32 {
        self.length / (self.dim.saturating_sub(1)).max(1) as f32
    }

    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    pub fn validate(&self) -> Result<(), ClothError> {
        if self.dim < 2 {
            return Err(ClothError::InvalidTopology { dim: self.dim });
        }
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(invalid(format!("length must be positive, got {}", self.length)));
        }
        if !self.height.is_finite() || self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(invalid("height and gravity must be finite".to_string()));
        }
        if self.iterations == 0 {
            return Err(invalid("iterations must be at least 1".to_string()));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(invalid(format!("damping must be in [0, 1), got {}", self.damping)));
        }
        if !(self.sphere.radius >= 0.0 && self.sphere.bias >= 0.0) {
            return Err(invalid("sphere radius and bias must be non-negative".to_string()));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(invalid(format!("dt must be positive, got {}", self.dt)));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ClothError {
    ClothError::InvalidConfig(message)
}
