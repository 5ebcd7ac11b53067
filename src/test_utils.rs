//! Test utilities for plugin testing

use crate::events::{BodiesAdvanced, InjectBody, LoadConfiguration};
use crate::prelude::*;
use bevy::time::TimeUpdateStrategy;
use core::time::Duration;

/// Fixed frame length every test update advances by
pub const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Creates a minimal test app with core Bevy plugins needed for testing
///
/// Time advances by exactly [`FRAME`] per update; the very first update
/// carries zero elapsed time.
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        bevy::state::app::StatesPlugin,
        bevy::diagnostic::DiagnosticsPlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // Add events used by plugins
    app.add_event::<SimulationCommand>();
    app.add_event::<LoadConfiguration>();
    app.add_event::<InjectBody>();
    app.add_event::<BodiesAdvanced>();

    // Add states
    app.init_state::<AppState>();

    app
}

/// Run `count` frames
pub fn run_frames(app: &mut App, count: usize) {
    for _ in 0..count {
        app.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(app.world().contains_resource::<Time>());
        assert!(app.world().contains_resource::<State<AppState>>());
    }

    #[test]
    fn test_frames_advance_by_fixed_step() {
        let mut app = create_test_app();
        run_frames(&mut app, 3);

        let time = app.world().resource::<Time>();
        assert_eq!(time.delta(), FRAME);
        assert_eq!(time.elapsed(), FRAME * 2);
    }
}
