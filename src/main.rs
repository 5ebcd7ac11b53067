use bevy::app::ScheduleRunnerPlugin;
use bevy::diagnostic::{DiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::log::{Level, LogPlugin};
use bevy::state::app::StatesPlugin;
use clap::Parser;
use core::time::Duration;
use nbody_chaos::cli::{self, Args};
use nbody_chaos::plugins::frame_budget::FrameBudgetPlugin;
use nbody_chaos::plugins::simulation::SimulationPlugin;
use nbody_chaos::plugins::simulation_diagnostics::SimulationDiagnosticsPlugin;
use nbody_chaos::prelude::*;

fn main() -> AppExit {
    let args = Args::parse();

    if args.list_integrators {
        cli::handle_list_integrators();
        return AppExit::Success;
    }

    if args.list_presets {
        cli::handle_list_presets();
        return AppExit::Success;
    }

    let mut app = App::new();

    // Logging first so configuration loading is reported
    app.add_plugins(LogPlugin {
        level: if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        },
        ..default()
    });

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return AppExit::error();
        }
    };

    let initial_system = args
        .load
        .as_deref()
        .and_then(|text| match cli::decode_load_argument(text) {
            Ok(system) => Some(system),
            Err(e) => {
                warn!("{e}; starting from {}", config.scenario.preset);
                None
            }
        });

    if args.export {
        println!("{}", cli::export_text(&config, initial_system.as_ref()));
        return AppExit::Success;
    }

    let log_interval = config.telemetry.log_interval();

    let mut simulation = SimulationPlugin::with_config(config).paused(args.paused);
    if let Some(system) = initial_system {
        simulation = simulation.with_initial_system(system);
    }

    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
        StatesPlugin,
        DiagnosticsPlugin,
        simulation,
        SimulationDiagnosticsPlugin::default(),
        LogDiagnosticsPlugin {
            wait_duration: log_interval,
            ..LogDiagnosticsPlugin::filtered(
                SimulationDiagnosticsPlugin::DIAGNOSTIC_PATHS
                    .iter()
                    .cloned()
                    .collect(),
            )
        },
    ));

    if let Some(frames) = args.frames {
        app.add_plugins(FrameBudgetPlugin::new(frames));
    }

    app.run()
}
