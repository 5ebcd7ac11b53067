//! Centralized event definitions
//!
//! Every change to the live body set arrives as one of these events and is
//! applied between frames, never while a step is in flight.

use crate::physics::body::Body;
use crate::physics::codec::SystemConfig;
use crate::physics::integrators::IntegratorKind;
use crate::physics::math::Scalar;
use crate::physics::presets::Preset;
use bevy::prelude::*;

// Unified simulation command pattern
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SimulationCommand {
    Restart,
    TogglePause,
    SelectPreset(Preset),
    SetScale(Scalar),
    SetSpeed(Scalar),
    SelectIntegrator(IntegratorKind),
    SpawnWormholes,
    ClearWormholes,
    Quit,
}

/// Replace the whole simulation state with a decoded configuration
#[derive(Event, Debug, Clone, PartialEq)]
pub struct LoadConfiguration(pub SystemConfig);

/// Append a fully formed body to the live set
#[derive(Event, Debug, Clone, PartialEq)]
pub struct InjectBody(pub Body);

/// Snapshot published once per frame after all sub-steps ran.
///
/// Also written while paused, with zero deltas.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BodiesAdvanced {
    pub bodies: Vec<Body>,
    /// Wall-clock seconds that drove this frame, zero while paused
    pub frame_delta: Scalar,
    /// Simulated seconds covered by this frame's sub-steps
    pub simulated_delta: Scalar,
}
