mod viewer;

use clap::{Parser, Subcommand};
use clothsim_core::{run_config, Cloth, ClothConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "clothsim")]
#[command(about = "Cloth simulation with pinned edge and sphere collision", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate headless and print the final measurements
    Run {
        /// Path to a JSON scene config (reference scene when omitted)
        config: Option<PathBuf>,
        /// Override the number of frames
        #[arg(long)]
        frames: Option<usize>,
        /// Override the time step
        #[arg(long)]
        dt: Option<f32>,
    },
    /// Print the cloth's link and pin counts
    Topology {
        config: Option<PathBuf>,
    },
    /// Open the interactive viewer; the config file is reloaded on change
    View {
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, frames, dt } => run(config.as_deref(), frames, dt),
        Commands::Topology { config } => topology(config.as_deref()),
        Commands::View { config } => viewer::run_viewer(config),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ClothConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ClothConfig::load(path)?),
        None => Ok(ClothConfig::default()),
    }
}

fn run(
    path: Option<&Path>,
    frames: Option<usize>,
    dt: Option<f32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(path)?;
    if let Some(frames) = frames {
        config.frames = frames;
    }
    if let Some(dt) = dt {
        config.dt = dt;
    }
    config.validate()?;

    let summary = run_config(&config)?;
    println!("frames = {}", summary.frames);
    for m in summary.measurements {
        println!("{} = {}", m.name, m.value);
    }
    Ok(())
}

fn topology(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let cloth = Cloth::from_config(&config)?;
    println!("particles = {}", cloth.len());
    println!("links = {}", cloth.links().len());
    println!("pins = {}", cloth.pins().len());
    println!("rest_length = {}", cloth.topology().rest_length());
    Ok(())
}
