//! Action handlers for simulation commands
//!
//! This module contains handlers for SimulationCommand events, configuration
//! loads and body injection. All of them run before the frame's sub-steps.

use super::physics::{rescale_source, scenario_bodies, select_source};
use crate::events::{InjectBody, LoadConfiguration};
use crate::physics::perturbation::Wormhole;
use crate::physics::resources::{CurrentIntegrator, Perturbations, PhysicsTime};
use crate::prelude::*;

pub fn handle_scenario_commands(
    mut commands_reader: EventReader<SimulationCommand>,
    mut source: ResMut<ScenarioSource>,
    mut bodies: ResMut<BodySet>,
    mut camera: ResMut<CameraHints>,
    mut rng: ResMut<SharedRng>,
) {
    for command in commands_reader.read() {
        let next_source = match *command {
            SimulationCommand::Restart => source.clone(),
            SimulationCommand::SelectPreset(preset) => {
                *camera = CameraHints::default();
                select_source(&source, preset)
            }
            SimulationCommand::SetScale(scale) => {
                if !(scale > 0.0 && scale.is_finite()) {
                    warn!("Ignoring invalid scale {}", scale);
                    continue;
                }
                match rescale_source(&source, scale) {
                    Some(rescaled) => rescaled,
                    None => {
                        debug!("Scale has no effect on a custom configuration");
                        continue;
                    }
                }
            }
            _ => continue,
        };

        *source = next_source;
        **bodies = scenario_bodies(&source, &mut rng);

        match source.as_ref() {
            ScenarioSource::Preset { preset, scale } => {
                info!("Reset to {} at scale {}", preset, scale);
            }
            ScenarioSource::Custom(custom) => {
                info!("Reset custom configuration with {} bodies", custom.len());
            }
        }
    }
}

pub fn handle_toggle_pause_simulation_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut physics_time: ResMut<PhysicsTime>,
) {
    for command in commands_reader.read() {
        match *command {
            SimulationCommand::TogglePause => {
                if physics_time.is_paused() {
                    physics_time.unpause();
                } else {
                    physics_time.pause();
                }
            }
            SimulationCommand::SetSpeed(speed) => {
                physics_time.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
            }
            _ => {}
        }
    }
}

pub fn handle_integrator_and_perturbation_commands(
    mut commands_reader: EventReader<SimulationCommand>,
    mut integrator: ResMut<CurrentIntegrator>,
    mut perturbations: ResMut<Perturbations>,
    config: Res<SimulationConfig>,
) {
    for command in commands_reader.read() {
        match *command {
            SimulationCommand::SelectIntegrator(kind) => {
                integrator.0 = kind;
                info!("Switched integrator to {}", kind.integrator().name());
            }
            SimulationCommand::SpawnWormholes => {
                perturbations.sources = Wormhole::pair(
                    config.perturbation.separation,
                    config.perturbation.wormhole_mass,
                )
                .to_vec();
                info!("Opened wormhole pair");
            }
            SimulationCommand::ClearWormholes => {
                perturbations.sources.clear();
                info!("Closed wormholes");
            }
            _ => {}
        }
    }
}

pub fn handle_quit_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut exit: EventWriter<AppExit>,
) {
    if commands_reader
        .read()
        .any(|command| matches!(command, SimulationCommand::Quit))
    {
        exit.write(AppExit::Success);
    }
}

/// Replace the whole state with a decoded configuration
pub fn handle_load_configuration(
    mut loads: EventReader<LoadConfiguration>,
    mut source: ResMut<ScenarioSource>,
    mut bodies: ResMut<BodySet>,
    mut integrator: ResMut<CurrentIntegrator>,
    mut camera: ResMut<CameraHints>,
    mut physics_time: ResMut<PhysicsTime>,
) {
    for LoadConfiguration(system) in loads.read() {
        *source = ScenarioSource::Custom(system.bodies.clone());
        **bodies = system.bodies.clone();
        integrator.0 = system.integrator;
        *camera = CameraHints {
            position: system.camera_position,
            target: system.camera_target,
        };
        physics_time.speed = PhysicsTime::speed_for_time_step(system.time_step);

        info!(
            "Loaded configuration: {} bodies, {} integrator, time step {}",
            system.bodies.len(),
            system.integrator,
            system.time_step
        );
    }
}

/// Append injected bodies, refusing ids already in use
pub fn handle_inject_body(mut injections: EventReader<InjectBody>, mut bodies: ResMut<BodySet>) {
    for InjectBody(body) in injections.read() {
        if bodies.iter().any(|existing| existing.id == body.id) {
            warn!("Rejected injected body: id {} is already in use", body.id);
            continue;
        }

        debug!(
            "Injected body {} (mass {}) at {:?}",
            body.id, body.mass, body.position
        );
        bodies.push(body.clone());
    }
}

/// Keep `AppState` in step with the physics pause flag
pub fn mirror_pause_state(
    physics_time: Res<PhysicsTime>,
    current_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let desired = AppState::for_pause_flag(physics_time.is_paused());
    if *current_state.get() != desired {
        next_state.set(desired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::Body;
    use crate::physics::codec;
    use crate::physics::integrators::IntegratorKind;
    use crate::physics::presets::Preset;
    use crate::plugins::simulation::SimulationPlugin;
    use crate::test_utils::create_test_app;

    fn simulation_app() -> App {
        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(SimulationConfig::default()));
        app.update();
        app
    }

    fn body_ids(app: &App) -> Vec<String> {
        app.world()
            .resource::<BodySet>()
            .iter()
            .map(|body| body.id.clone())
            .collect()
    }

    #[test]
    fn test_pause_toggle_physics_time() {
        let mut app = simulation_app();

        let physics_time = app.world().resource::<PhysicsTime>();
        assert!(!physics_time.is_paused());

        app.world_mut().send_event(SimulationCommand::TogglePause);
        app.update();
        app.update();

        assert!(app.world().resource::<PhysicsTime>().is_paused());
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Paused
        );

        app.world_mut().send_event(SimulationCommand::TogglePause);
        app.update();
        app.update();

        assert!(!app.world().resource::<PhysicsTime>().is_paused());
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Running
        );
    }

    #[test]
    fn test_select_preset_replaces_bodies() {
        let mut app = simulation_app();
        assert_eq!(body_ids(&app), vec!["1", "2", "3"]);

        app.world_mut()
            .send_event(SimulationCommand::SelectPreset(Preset::SunEarthMoon));
        app.update();

        assert_eq!(body_ids(&app), vec!["Sun", "Earth", "Moon"]);
        assert_eq!(
            *app.world().resource::<ScenarioSource>(),
            ScenarioSource::Preset {
                preset: Preset::SunEarthMoon,
                scale: 4.0
            }
        );
    }

    #[test]
    fn test_restart_restores_initial_state() {
        let mut app = simulation_app();
        for _ in 0..10 {
            app.update();
        }
        assert_ne!(
            app.world().resource::<BodySet>().0,
            Preset::FigureEight.generate(4.0)
        );

        app.world_mut().resource_mut::<PhysicsTime>().pause();
        app.world_mut().send_event(SimulationCommand::Restart);
        app.update();

        assert_eq!(
            app.world().resource::<BodySet>().0,
            Preset::FigureEight.generate(4.0)
        );
    }

    #[test]
    fn test_speed_and_integrator_commands() {
        let mut app = simulation_app();

        app.world_mut().send_event(SimulationCommand::SetSpeed(-2.0));
        app.world_mut()
            .send_event(SimulationCommand::SelectIntegrator(IntegratorKind::Verlet));
        app.update();

        assert_eq!(app.world().resource::<PhysicsTime>().speed, 0.0);
        assert_eq!(
            app.world().resource::<CurrentIntegrator>().0,
            IntegratorKind::Verlet
        );
    }

    #[test]
    fn test_wormhole_commands() {
        let mut app = simulation_app();

        app.world_mut().send_event(SimulationCommand::SpawnWormholes);
        app.update();
        assert_eq!(app.world().resource::<Perturbations>().sources.len(), 2);

        app.world_mut().send_event(SimulationCommand::ClearWormholes);
        app.update();
        assert!(!app.world().resource::<Perturbations>().is_active());
    }

    #[test]
    fn test_load_configuration_replaces_state() {
        let mut app = simulation_app();
        let system = codec::decode("n=2&m=5,1&p=0,0,0,3,0,0&v=0,0,0,0,1,0&im=verlet&dt=0.02&cp=0,5,20")
            .unwrap();

        app.world_mut().resource_mut::<PhysicsTime>().pause();
        app.world_mut().send_event(LoadConfiguration(system));
        app.update();

        assert_eq!(body_ids(&app), vec!["imported-0", "imported-1"]);
        assert_eq!(
            app.world().resource::<CurrentIntegrator>().0,
            IntegratorKind::Verlet
        );
        assert!((app.world().resource::<PhysicsTime>().speed - 2.0).abs() < 1e-12);
        assert_eq!(
            app.world().resource::<CameraHints>().position,
            Some(Vector::new(0.0, 5.0, 20.0))
        );

        // A restart now returns to the loaded bodies, not the preset
        app.world_mut().send_event(SimulationCommand::Restart);
        app.update();
        assert_eq!(body_ids(&app), vec!["imported-0", "imported-1"]);
    }

    #[test]
    fn test_inject_body_rejects_duplicate_ids() {
        let mut app = simulation_app();
        app.world_mut().resource_mut::<PhysicsTime>().pause();

        let mut rng = SharedRng::from_seed(11);
        let body = Body::injected(
            2.0,
            Vector::new(5.0, 0.0, 0.0),
            Vector::ZERO,
            Srgba::WHITE,
            &mut rng,
        );

        app.world_mut().send_event(InjectBody(body.clone()));
        app.update();
        assert_eq!(app.world().resource::<BodySet>().len(), 4);

        app.world_mut().send_event(InjectBody(body.clone()));
        app.update();
        assert_eq!(app.world().resource::<BodySet>().len(), 4);
        assert_eq!(body_ids(&app)[3], body.id);
    }

    #[test]
    fn test_quit_command_exits() {
        let mut app = simulation_app();
        app.world_mut().send_event(SimulationCommand::Quit);
        app.update();

        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }
}
