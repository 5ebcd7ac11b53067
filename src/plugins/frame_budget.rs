//! Exit after a fixed number of frames
//!
//! Used by `--frames` to run the simulation headless for a bounded time.

use bevy::app::AppExit;
use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    remaining: u32,
}

impl FrameBudget {
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

pub struct FrameBudgetPlugin {
    frames: u32,
}

impl FrameBudgetPlugin {
    pub fn new(frames: u32) -> Self {
        Self { frames }
    }
}

impl Plugin for FrameBudgetPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(FrameBudget {
            remaining: self.frames,
        });
        app.add_systems(Last, count_down_frames);
    }
}

fn count_down_frames(mut budget: ResMut<FrameBudget>, mut app_exit_events: EventWriter<AppExit>) {
    if budget.remaining == 0 {
        return;
    }

    budget.remaining -= 1;
    if budget.remaining == 0 {
        info!("Frame budget exhausted, exiting...");
        app_exit_events.write(AppExit::Success);
    }
}
