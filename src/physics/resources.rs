//! Physics resources for simulation

use crate::physics::gravity::NewtonianGravity;
use crate::physics::integrators::IntegratorKind;
use crate::physics::math::Scalar;
use crate::physics::perturbation::{PerturbationParams, Wormhole};
use bevy::prelude::*;

/// Number of integration sub-steps taken per rendered frame
pub const DEFAULT_SUBSTEPS: u32 = 4;

/// Speed multiplier per unit of imported time step, so `dt = 0.01` runs at 1x
pub const TIME_STEP_TO_SPEED: Scalar = 100.0;

/// Resource holding the currently active integrator
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentIntegrator(pub IntegratorKind);

/// Force law used by the driver and by energy diagnostics
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Gravity(pub NewtonianGravity);

/// Resource for physics timestep control
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsTime {
    /// Simulated seconds per wall-clock second
    pub speed: Scalar,
    /// Whether physics is paused
    pub paused: bool,
    /// Sub-steps per frame
    pub substeps: u32,
}

impl Default for PhysicsTime {
    fn default() -> Self {
        Self {
            speed: 1.0,
            paused: false,
            substeps: DEFAULT_SUBSTEPS,
        }
    }
}

impl PhysicsTime {
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn substeps(&self) -> u32 {
        self.substeps.max(1)
    }

    /// Effective frame delta; zero while paused
    pub fn frame_delta(&self, wall_delta: Scalar) -> Scalar {
        if self.paused { 0.0 } else { wall_delta }
    }

    /// Speed control value matching a configuration's time step
    pub fn speed_for_time_step(time_step: Scalar) -> Scalar {
        time_step * TIME_STEP_TO_SPEED
    }

    /// Time step carried in configuration text for a speed setting
    pub fn time_step_for_speed(speed: Scalar) -> Scalar {
        speed / TIME_STEP_TO_SPEED
    }

    /// Size of one sub-step for a frame of `wall_delta` seconds
    pub fn substep_dt(&self, wall_delta: Scalar) -> Scalar {
        self.frame_delta(wall_delta) * self.speed / self.substeps() as Scalar
    }
}

/// Active perturbation sources and the constants they act with
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Perturbations {
    pub sources: Vec<Wormhole>,
    pub params: PerturbationParams,
}

impl Perturbations {
    pub fn is_active(&self) -> bool {
        !self.sources.is_empty()
    }
}
