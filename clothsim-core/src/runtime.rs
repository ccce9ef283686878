use crate::animation::AnchorWave;
use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::simulation::Cloth;
use glam::Vec3;

/// A named scalar read off the cloth
#[derive(Debug, Clone)]
pub struct Measurement {
    pub name: String,
    pub value: f32,
}

/// Final result of a headless run
#[derive(Debug)]
pub struct RunSummary {
    pub frames: usize,
    pub measurements: Vec<Measurement>,
}

/// A cloth plus everything needed to drive it frame by frame
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub cloth: Cloth,
    pub wave: Option<AnchorWave>,
    pub dt: f32,
    pub time: f32,
    pub current_frame: usize,
    pub max_frames: usize,
}

/// Build a driving context from a validated config
pub fn build_simulation_context(config: &ClothConfig) -> Result<SimulationContext, ClothError> {
    let cloth = Cloth::from_config(config)?;
    let wave = config
        .anchor_wave
        .as_ref()
        .map(|wave| AnchorWave::from_config(&cloth, wave));
    Ok(SimulationContext {
        cloth,
        wave,
        dt: config.dt,
        time: 0.0,
        current_frame: 0,
        max_frames: config.frames,
    })
}

/// Animate the anchors, then advance one frame.
///
/// Returns true once `max_frames` have been simulated.
pub fn step_simulation(ctx: &mut SimulationContext) -> Result<bool, ClothError> {
    if ctx.current_frame >= ctx.max_frames {
        return Ok(true);
    }
    if let Some(wave) = &ctx.wave {
        wave.apply(&mut ctx.cloth, ctx.time)?;
    }
    ctx.cloth.update(ctx.dt);
    ctx.time += ctx.dt;
    ctx.current_frame += 1;
    Ok(ctx.current_frame >= ctx.max_frames)
}

/// Run a config to completion and measure the final cloth
pub fn run_config(config: &ClothConfig) -> Result<RunSummary, ClothError> {
    let mut ctx = build_simulation_context(config)?;
    while !step_simulation(&mut ctx)? {}
    Ok(RunSummary {
        frames: ctx.current_frame,
        measurements: measure(&ctx.cloth),
    })
}

/// Scalars describing the cloth's current shape
pub fn measure(cloth: &Cloth) -> Vec<Measurement> {
    let positions = cloth.positions();
    let lowest = positions.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let centroid = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;

    vec![
        measurement("lowest_y", lowest),
        measurement("max_strain", cloth.max_strain()),
        measurement("centroid_x", centroid.x),
        measurement("centroid_y", centroid.y),
        measurement("centroid_z", centroid.z),
    ]
}

fn measurement(name: &str, value: f32) -> Measurement {
    Measurement {
        name: name.to_string(),
        value,
    }
}
