use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Running,
    Paused,
}

impl AppState {
    /// The state that mirrors a physics pause flag
    pub fn for_pause_flag(paused: bool) -> Self {
        if paused {
            AppState::Paused
        } else {
            AppState::Running
        }
    }
}
