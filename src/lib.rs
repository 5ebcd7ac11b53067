//! nbody-chaos library
//!
//! Few-body Newtonian gravity with selectable integrators, named presets and
//! a compact shareable configuration text. The binary is a thin headless
//! driver around these modules; everything is public here so integration
//! tests and benchmarks can reach it.

pub mod cli;
pub mod config;
pub mod events;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod states;

// Test utilities are public for integration tests
pub mod test_utils;
