//! Physics module for the n-body simulation

pub mod body;
pub mod codec;
pub mod gravity;
pub mod integrators;
pub mod math;
pub mod metrics;
pub mod perturbation;
pub mod presets;
pub mod resources;
