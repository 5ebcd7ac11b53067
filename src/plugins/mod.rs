pub mod frame_budget;
pub mod simulation;
pub mod simulation_diagnostics;
