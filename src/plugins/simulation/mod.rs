//! Simulation plugin - Self-contained plugin pattern
//!
//! This plugin owns the live body set and drives it forward: it builds the
//! initial scenario, applies commands, loads and injections between frames,
//! runs the per-frame sub-steps and publishes a snapshot for telemetry.

use crate::events::{BodiesAdvanced, InjectBody, LoadConfiguration};
use crate::physics::codec::SystemConfig;
use crate::physics::gravity::NewtonianGravity;
use crate::physics::integrators::registry::IntegratorRegistry;
use crate::physics::perturbation::Wormhole;
use crate::physics::resources::{CurrentIntegrator, Gravity, Perturbations, PhysicsTime};
use crate::prelude::*;

mod actions;
mod physics;

use actions::{
    handle_inject_body, handle_integrator_and_perturbation_commands, handle_load_configuration,
    handle_quit_event, handle_scenario_commands, handle_toggle_pause_simulation_event,
    mirror_pause_state,
};
pub use physics::{PhysicsSet, scenario_bodies};
use physics::{integrate_motions, publish_snapshot, spawn_simulation_bodies};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Physics,
}

pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
    initial_system: Option<SystemConfig>,
    start_paused: bool,
}

impl SimulationPlugin {
    pub fn new() -> Self {
        Self {
            config: None,
            initial_system: None,
            start_paused: false,
        }
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::new()
        }
    }

    /// Start from a decoded configuration instead of the configured preset
    pub fn with_initial_system(mut self, system: SystemConfig) -> Self {
        self.initial_system = Some(system);
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let mut physics_time = PhysicsTime {
            speed: config.physics.speed,
            paused: self.start_paused,
            substeps: config.physics.substeps_per_frame,
        };
        let mut integrator = config.physics.integrator;

        let (source, camera) = match &self.initial_system {
            Some(system) => {
                integrator = system.integrator;
                physics_time.speed = PhysicsTime::speed_for_time_step(system.time_step);
                (
                    ScenarioSource::Custom(system.bodies.clone()),
                    CameraHints {
                        position: system.camera_position,
                        target: system.camera_target,
                    },
                )
            }
            None => (
                ScenarioSource::Preset {
                    preset: config.scenario.preset,
                    scale: config.scenario.scale,
                },
                CameraHints::default(),
            ),
        };

        let sources = if config.perturbation.wormholes_enabled {
            Wormhole::pair(
                config.perturbation.separation,
                config.perturbation.wormhole_mass,
            )
            .to_vec()
        } else {
            Vec::new()
        };

        app.insert_resource(SharedRng::from_optional_seed(config.physics.initial_seed));
        app.insert_resource(Gravity(NewtonianGravity::new(
            config.physics.gravitational_constant,
            config.physics.softening_length,
        )));
        app.insert_resource(CurrentIntegrator(integrator));
        app.init_resource::<IntegratorRegistry>();
        app.insert_resource(Perturbations {
            sources,
            params: config.perturbation.params(),
        });
        app.insert_resource(physics_time);
        app.insert_resource(source);
        app.insert_resource(camera);
        app.init_resource::<BodySet>();
        app.insert_resource(config);

        app.init_state::<AppState>();

        app.add_event::<SimulationCommand>();
        app.add_event::<LoadConfiguration>();
        app.add_event::<InjectBody>();
        app.add_event::<BodiesAdvanced>();

        app.configure_sets(
            Update,
            (SimulationSet::Input, SimulationSet::Physics).chain(),
        );
        app.configure_sets(
            Update,
            (PhysicsSet::AdvanceBodies, PhysicsSet::PublishSnapshot)
                .chain()
                .in_set(SimulationSet::Physics),
        );

        app.add_systems(Startup, spawn_simulation_bodies);
        app.add_systems(
            Update,
            (
                handle_load_configuration,
                handle_scenario_commands,
                handle_inject_body,
                handle_toggle_pause_simulation_event,
                handle_integrator_and_perturbation_commands,
                handle_quit_event,
                mirror_pause_state,
            )
                .chain()
                .in_set(SimulationSet::Input),
        );
        app.add_systems(
            Update,
            (
                integrate_motions.in_set(PhysicsSet::AdvanceBodies),
                publish_snapshot.in_set(PhysicsSet::PublishSnapshot),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::codec;
    use crate::physics::integrators::IntegratorKind;
    use crate::physics::presets::Preset;
    use crate::test_utils::create_test_app;

    #[test]
    fn test_plugin_builds_configured_preset() {
        let mut config = SimulationConfig::default();
        config.scenario.preset = Preset::Pythagorean;
        config.physics.integrator = IntegratorKind::Verlet;

        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(config));
        app.update();

        let bodies = app.world().resource::<BodySet>();
        assert_eq!(bodies.len(), 3);
        assert_eq!(bodies[2].mass, 5.0);
        assert_eq!(
            app.world().resource::<CurrentIntegrator>().0,
            IntegratorKind::Verlet
        );
        assert!(!app.world().resource::<Perturbations>().is_active());
    }

    #[test]
    fn test_seeded_random_preset_is_reproducible() {
        let mut config = SimulationConfig::default();
        config.scenario.preset = Preset::RandomChaos;
        config.physics.initial_seed = Some(2024);

        let build = || {
            let mut app = create_test_app();
            app.add_plugins(SimulationPlugin::with_config(config.clone()).paused(true));
            app.update();
            app.world().resource::<BodySet>().0.clone()
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn test_initial_system_overrides_preset() {
        let system = codec::decode("n=1&m=5&p=0,0,0&v=0,0,0&im=verlet&dt=0.03").unwrap();

        let mut app = create_test_app();
        app.add_plugins(
            SimulationPlugin::with_config(SimulationConfig::default())
                .with_initial_system(system),
        );
        app.update();

        assert_eq!(app.world().resource::<BodySet>().len(), 1);
        assert_eq!(
            app.world().resource::<CurrentIntegrator>().0,
            IntegratorKind::Verlet
        );
        assert!((app.world().resource::<PhysicsTime>().speed - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_wormholes_enabled_from_config() {
        let mut config = SimulationConfig::default();
        config.perturbation.wormholes_enabled = true;

        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(config));
        app.update();

        let perturbations = app.world().resource::<Perturbations>();
        assert_eq!(perturbations.sources.len(), 2);
        assert_eq!(perturbations.sources[0].mass, 5.0);
    }

    #[test]
    fn test_start_paused_mirrors_state() {
        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(SimulationConfig::default()).paused(true));
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Paused
        );
        assert_eq!(
            app.world().resource::<BodySet>().0,
            Preset::FigureEight.generate(4.0)
        );
    }
}
