use crate::physics::gravity::{G, SOFTENING};
use crate::physics::integrators::IntegratorKind;
use crate::physics::math::Scalar;
use crate::physics::perturbation::PerturbationParams;
use crate::physics::presets::Preset;
use crate::physics::resources::DEFAULT_SUBSTEPS;
use bevy::prelude::*;
use config::{Config, ConfigError, Environment, File, FileFormat};
use core::time::Duration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub scenario: ScenarioConfig,
    pub perturbation: PerturbationConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_constant: Scalar,
    pub softening_length: Scalar,
    pub integrator: IntegratorKind,
    pub substeps_per_frame: u32,
    pub speed: Scalar,
    pub initial_seed: Option<u64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: G,
            softening_length: SOFTENING,
            integrator: IntegratorKind::default(),
            substeps_per_frame: DEFAULT_SUBSTEPS,
            speed: 1.0,
            initial_seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub preset: Preset,
    pub scale: Scalar,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            scale: Preset::DEFAULT_SCALE,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PerturbationConfig {
    pub wormholes_enabled: bool,
    pub wormhole_mass: Scalar,
    pub coupling: Scalar,
    pub softening: Scalar,
    pub capture_radius: Scalar,
    pub ejection_speed: Scalar,
    pub exit_jitter: Scalar,
    pub separation: Scalar,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        let params = PerturbationParams::default();
        Self {
            wormholes_enabled: false,
            wormhole_mass: 5.0,
            coupling: params.coupling,
            softening: params.softening,
            capture_radius: params.capture_radius,
            ejection_speed: params.ejection_speed,
            exit_jitter: params.exit_jitter,
            separation: 20.0,
        }
    }
}

impl PerturbationConfig {
    pub fn params(&self) -> PerturbationParams {
        PerturbationParams {
            coupling: self.coupling,
            softening: self.softening,
            capture_radius: self.capture_radius,
            ejection_speed: self.ejection_speed,
            exit_jitter: self.exit_jitter,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_interval_secs: f64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_interval_secs: 1.0,
        }
    }
}

impl TelemetryConfig {
    /// Interval between diagnostic log lines; unusable values give the default
    pub fn log_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.log_interval_secs).unwrap_or_else(|_| {
            warn!(
                "Invalid telemetry log interval {}, using {} seconds",
                self.log_interval_secs,
                Self::default().log_interval_secs
            );
            Duration::from_secs(1)
        })
    }
}

impl SimulationConfig {
    /// Layer compiled defaults, an optional TOML file and `NBODY_*` variables.
    ///
    /// Environment keys use `__` between section and field, for example
    /// `NBODY_PHYSICS__SPEED=2.0`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("NBODY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()
            .map(Self::sanitized)
    }

    /// Replace values the simulation cannot run with by their defaults.
    ///
    /// Scale must be positive and finite. Speed must be finite and is
    /// clamped at zero.
    pub fn sanitized(mut self) -> Self {
        let scale = self.scenario.scale;
        if !(scale > 0.0 && scale.is_finite()) {
            warn!(
                "Ignoring non-positive scale {}, using {}",
                scale,
                Preset::DEFAULT_SCALE
            );
            self.scenario.scale = Preset::DEFAULT_SCALE;
        }

        let speed = self.physics.speed;
        if !speed.is_finite() {
            warn!("Ignoring non-finite speed {}, using 1", speed);
            self.physics.speed = PhysicsConfig::default().speed;
        } else if speed < 0.0 {
            warn!("Clamping negative speed {} to 0", speed);
            self.physics.speed = 0.0;
        }

        self
    }

    /// Load configuration from a file, falling back to defaults on any error
    pub fn load_or_default(path: &str) -> Self {
        Self::load(Some(Path::new(path))).unwrap_or_else(|e| {
            warn!("Failed to load config file {}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Load from the per-user configuration directory, if one exists
    pub fn load_from_user_config() -> Self {
        match Self::user_config_path() {
            Some(path) => {
                debug!("Looking for user configuration at {}", path.display());
                Self::load(Some(&path)).unwrap_or_else(|e| {
                    warn!(
                        "Failed to load user configuration {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                })
            }
            None => {
                info!("No user configuration directory available. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "nbody-chaos")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
