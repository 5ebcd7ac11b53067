//! Simulation diagnostics module.
//!
//! This module turns the per-frame body snapshot into Bevy diagnostics:
//!
//! - **Energy**: kinetic and total (kinetic plus softened potential) energy
//! - **Momentum**: magnitude of the total linear momentum
//! - **Barycenter position**: X, Y and Z of the system's center of mass
//! - **Body count**
//!
//! It also keeps a [`SystemMonitor`] with per-body speed, nearest neighbour
//! and stability era for anything that wants to display them.
//!
//! ```rust,ignore
//! app.add_plugins(SimulationDiagnosticsPlugin::default());
//! ```

use crate::events::BodiesAdvanced;
use crate::physics::metrics::{self, BodyStatus, StabilityEra};
use crate::physics::resources::Gravity;
use bevy::diagnostic::DEFAULT_MAX_HISTORY_LENGTH;
use bevy::diagnostic::Diagnostic;
use bevy::diagnostic::DiagnosticPath;
use bevy::diagnostic::Diagnostics;
use bevy::diagnostic::RegisterDiagnostic;
use bevy::prelude::*;
use core::time::Duration;

#[derive(Resource)]
pub struct SimulationDiagnosticsState {
    update_timer: Timer,
}

/// Latest per-body monitor readings
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SystemMonitor {
    pub statuses: Vec<BodyStatus>,
    /// Most chaotic era any body is currently in
    pub era: Option<StabilityEra>,
    pub simulated_time: f64,
}

pub struct SimulationDiagnosticsPlugin {
    max_history_length: usize,
    smoothing_factor: f64,
    update_interval: Duration,
}

impl Default for SimulationDiagnosticsPlugin {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
            smoothing_factor: 0.0,
            update_interval: Duration::from_secs_f64(1_f64 / 60_f64),
        }
    }
}

impl SimulationDiagnosticsPlugin {
    pub const KINETIC_ENERGY_PATH: DiagnosticPath =
        DiagnosticPath::const_new("system/kinetic_energy");
    pub const TOTAL_ENERGY_PATH: DiagnosticPath = DiagnosticPath::const_new("system/total_energy");
    pub const MOMENTUM_PATH: DiagnosticPath = DiagnosticPath::const_new("system/momentum");
    pub const BODY_COUNT_PATH: DiagnosticPath = DiagnosticPath::const_new("system/body_count");

    pub const BARYCENTER_X_PATH: DiagnosticPath = DiagnosticPath::const_new("barycenter/x");
    pub const BARYCENTER_Y_PATH: DiagnosticPath = DiagnosticPath::const_new("barycenter/y");
    pub const BARYCENTER_Z_PATH: DiagnosticPath = DiagnosticPath::const_new("barycenter/z");

    pub const DIAGNOSTIC_PATHS: &'static [DiagnosticPath] = &[
        Self::KINETIC_ENERGY_PATH,
        Self::TOTAL_ENERGY_PATH,
        Self::MOMENTUM_PATH,
        Self::BODY_COUNT_PATH,
        Self::BARYCENTER_X_PATH,
        Self::BARYCENTER_Y_PATH,
        Self::BARYCENTER_Z_PATH,
    ];

    pub fn with_update_interval(mut self, update_interval: Duration) -> Self {
        self.update_interval = update_interval;
        self
    }

    fn register_diagnostics(&self, app: &mut App) {
        for path in Self::DIAGNOSTIC_PATHS {
            app.register_diagnostic(
                Diagnostic::new(path.clone())
                    .with_max_history_length(self.max_history_length)
                    .with_smoothing_factor(self.smoothing_factor),
            );
        }
    }

    fn update_timer_ticks(mut state: ResMut<SimulationDiagnosticsState>, time: Res<Time>) {
        state.update_timer.tick(time.delta());
    }

    fn update_system_diagnostics(
        mut snapshots: EventReader<BodiesAdvanced>,
        gravity: Option<Res<Gravity>>,
        mut monitor: ResMut<SystemMonitor>,
        mut diagnostics: Diagnostics,
        state: Res<SimulationDiagnosticsState>,
    ) {
        let mut latest = None;
        for snapshot in snapshots.read() {
            monitor.simulated_time += snapshot.simulated_delta;
            latest = Some(snapshot);
        }
        let Some(snapshot) = latest else {
            return;
        };

        let statuses = metrics::body_statuses(&snapshot.bodies);
        let era = statuses.iter().map(|status| status.era).min();
        if era != monitor.era {
            if let Some(era) = era {
                debug!("System entered {}", era.label());
            }
        }
        monitor.statuses = statuses;
        monitor.era = era;

        if !state.update_timer.finished() {
            return;
        }

        let gravity = gravity.map(|gravity| gravity.0).unwrap_or_default();
        let bodies = &snapshot.bodies;

        diagnostics.add_measurement(&Self::KINETIC_ENERGY_PATH, || {
            metrics::kinetic_energy(bodies)
        });
        diagnostics.add_measurement(&Self::TOTAL_ENERGY_PATH, || {
            metrics::total_energy(bodies, &gravity)
        });
        diagnostics.add_measurement(&Self::MOMENTUM_PATH, || {
            metrics::total_momentum(bodies).length()
        });
        diagnostics.add_measurement(&Self::BODY_COUNT_PATH, || bodies.len() as f64);

        if let Some(barycenter) = metrics::barycenter(bodies) {
            diagnostics.add_measurement(&Self::BARYCENTER_X_PATH, || barycenter.x);
            diagnostics.add_measurement(&Self::BARYCENTER_Y_PATH, || barycenter.y);
            diagnostics.add_measurement(&Self::BARYCENTER_Z_PATH, || barycenter.z);
        }
    }
}

impl Plugin for SimulationDiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationDiagnosticsState {
            update_timer: Timer::new(self.update_interval, TimerMode::Repeating),
        });
        app.init_resource::<SystemMonitor>();
        app.add_event::<BodiesAdvanced>();

        self.register_diagnostics(app);

        app.add_systems(
            PostUpdate,
            (Self::update_timer_ticks, Self::update_system_diagnostics).chain(),
        );
    }
}
