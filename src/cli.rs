//! Command line interface for nbody-chaos

use clap::Parser;
use std::fmt;

use crate::config::SimulationConfig;
use crate::physics::codec::{self, DecodeError, SystemConfig};
use crate::physics::integrators::registry::IntegratorRegistry;
use crate::physics::presets::Preset;
use crate::physics::resources::PhysicsTime;
use crate::resources::SharedRng;
use bevy::log::{info, warn};

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Invalid integrator name provided
    InvalidIntegrator(String),
    /// Configuration text was rejected by the decoder
    InvalidConfiguration(DecodeError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {msg}"),
            CliError::InvalidConfiguration(err) => write!(f, "Invalid configuration text: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InvalidConfiguration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        CliError::InvalidConfiguration(err)
    }
}

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// nbody-chaos - few-body gravity simulation
#[derive(Parser, Debug, Default)]
#[command(version = VERSION, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Initial preset (e.g., "Figure 8", random_chaos, lagrange)
    #[arg(short = 'P', long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Characteristic length of the preset (overrides config file)
    #[arg(long, value_name = "SCALE")]
    pub scale: Option<f64>,

    /// Integrator type (e.g., rk4, verlet)
    #[arg(short = 'i', long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// Simulated seconds per wall-clock second
    #[arg(long, value_name = "MULTIPLIER")]
    pub speed: Option<f64>,

    /// Random seed for random presets and wormhole jitter
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Start from configuration text (query string or shared link)
    #[arg(short, long, value_name = "TEXT")]
    pub load: Option<String>,

    /// Run this many frames, then exit
    #[arg(short, long, value_name = "COUNT")]
    pub frames: Option<u32>,

    /// Open a linked wormhole pair at startup
    #[arg(short, long)]
    pub wormholes: bool,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// Print the initial configuration text and exit
    #[arg(short, long)]
    pub export: bool,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,

    /// List available presets and exit
    #[arg(long)]
    pub list_presets: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Handles the --list-integrators flag by printing available integrators and exiting
pub fn handle_list_integrators() {
    let registry = IntegratorRegistry::default();
    println!("Available integrators:");
    for name in registry.list_available() {
        println!("  - {name}");
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        println!("\nAliases:");
        for (alias, target) in aliases {
            println!("  - {alias} -> {target}");
        }
    }
}

pub fn handle_list_presets() {
    println!("Available presets:");
    for preset in Preset::ALL {
        let kind = if preset.is_deterministic() {
            "deterministic"
        } else {
            "random"
        };
        println!("  - {preset} ({kind})");
    }
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        if !std::path::Path::new(config_path).exists() {
            return Err(CliError::ConfigLoad(format!(
                "{config_path}: no such file"
            )));
        }
        SimulationConfig::load(Some(std::path::Path::new(config_path)))
            .map_err(|err| CliError::ConfigLoad(format!("{config_path}: {err}")))?
    } else {
        SimulationConfig::load_from_user_config()
    };

    if let Some(name) = &args.preset {
        config.scenario.preset = Preset::from_name_or_default(name);
        info!("Using preset: {}", config.scenario.preset);
    }

    if let Some(scale) = args.scale {
        if scale > 0.0 && scale.is_finite() {
            info!("Overriding preset scale to: {scale}");
            config.scenario.scale = scale;
        } else {
            warn!("Ignoring non-positive scale {scale}");
        }
    }

    if let Some(integrator_type) = &args.integrator {
        let registry = IntegratorRegistry::default();
        let kind = registry
            .resolve(integrator_type)
            .map_err(CliError::InvalidIntegrator)?;

        info!("Using integrator: {}", kind.integrator().name());
        config.physics.integrator = kind;
    }

    if let Some(speed) = args.speed {
        info!("Overriding speed to: {speed}");
        config.physics.speed = speed.max(0.0);
    }

    if let Some(seed) = args.seed {
        info!("Using random seed: {seed}");
        config.physics.initial_seed = Some(seed);
    }

    if args.wormholes {
        config.perturbation.wormholes_enabled = true;
    }

    Ok(config.sanitized())
}

/// Decode `--load` text
pub fn decode_load_argument(text: &str) -> Result<SystemConfig, CliError> {
    Ok(codec::decode(text)?)
}

/// The configuration the simulation would start from, as shareable text
pub fn export_text(config: &SimulationConfig, loaded: Option<&SystemConfig>) -> String {
    match loaded {
        Some(system) => codec::encode(system),
        None => {
            let mut rng = SharedRng::from_optional_seed(config.physics.initial_seed);
            let bodies = config
                .scenario
                .preset
                .generate_with_rng(config.scenario.scale, &mut rng);
            codec::encode(&SystemConfig::new(
                bodies,
                config.physics.integrator,
                PhysicsTime::time_step_for_speed(config.physics.speed),
            ))
        }
    }
}
