use crate::events::BodiesAdvanced;
use crate::physics::body::Body;
use crate::physics::integrators::step_with_field;
use crate::physics::math::Scalar;
use crate::physics::perturbation::apply_perturbations;
use crate::physics::resources::{CurrentIntegrator, Gravity, Perturbations, PhysicsTime};
use crate::physics::presets::Preset;
use crate::resources::{BodySet, ScenarioSource, SharedRng};
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    AdvanceBodies,
    PublishSnapshot,
}

/// Build the body set a scenario starts from
pub fn scenario_bodies(source: &ScenarioSource, rng: &mut SharedRng) -> Vec<Body> {
    match source {
        ScenarioSource::Preset { preset, scale } => preset.generate_with_rng(*scale, rng),
        ScenarioSource::Custom(bodies) => bodies.clone(),
    }
}

/// Bevy system to spawn simulation bodies at startup
pub fn spawn_simulation_bodies(
    source: Res<ScenarioSource>,
    mut rng: ResMut<SharedRng>,
    mut bodies: ResMut<BodySet>,
) {
    **bodies = scenario_bodies(&source, &mut rng);

    match source.as_ref() {
        ScenarioSource::Preset { preset, scale } => {
            info!(
                "Starting {} with {} bodies at scale {}",
                preset,
                bodies.len(),
                scale
            );
        }
        ScenarioSource::Custom(_) => {
            info!("Starting custom configuration with {} bodies", bodies.len());
        }
    }
}

/// Run one frame's worth of sub-steps.
///
/// Each sub-step applies the active perturbations and then one integrator
/// step of size `frame_delta * speed / substeps`. Nothing runs while paused.
pub fn integrate_motions(
    time: Res<Time>,
    physics_time: Res<PhysicsTime>,
    integrator: Res<CurrentIntegrator>,
    gravity: Res<Gravity>,
    perturbations: Res<Perturbations>,
    mut rng: ResMut<SharedRng>,
    mut bodies: ResMut<BodySet>,
) {
    let dt = physics_time.substep_dt(time.delta_secs_f64());
    if dt == 0.0 || bodies.is_empty() {
        return;
    }

    let integrator = integrator.0.integrator();
    let mut current = std::mem::take(&mut bodies.0);

    for _ in 0..physics_time.substeps() {
        if perturbations.is_active() {
            current = apply_perturbations(
                &current,
                &perturbations.sources,
                &perturbations.params,
                dt,
                &mut rng,
            );
        }
        current = step_with_field(&current, dt, integrator, &gravity.0);
    }

    bodies.0 = current;
}

/// Hand the post-frame snapshot to telemetry consumers
pub fn publish_snapshot(
    time: Res<Time>,
    physics_time: Res<PhysicsTime>,
    bodies: Res<BodySet>,
    mut advanced: EventWriter<BodiesAdvanced>,
) {
    let frame_delta = physics_time.frame_delta(time.delta_secs_f64());
    let simulated_delta =
        physics_time.substep_dt(time.delta_secs_f64()) * physics_time.substeps() as Scalar;

    advanced.write(BodiesAdvanced {
        bodies: bodies.0.clone(),
        frame_delta,
        simulated_delta,
    });
}

/// Rebuild the preset the scenario points at with a new scale
pub fn rescale_source(source: &ScenarioSource, scale: Scalar) -> Option<ScenarioSource> {
    match source {
        ScenarioSource::Preset { preset, .. } => Some(ScenarioSource::Preset {
            preset: *preset,
            scale,
        }),
        ScenarioSource::Custom(_) => None,
    }
}

/// Point the scenario at another preset, keeping the current scale
pub fn select_source(source: &ScenarioSource, preset: Preset) -> ScenarioSource {
    let scale = match source {
        ScenarioSource::Preset { scale, .. } => *scale,
        ScenarioSource::Custom(_) => Preset::DEFAULT_SCALE,
    };
    ScenarioSource::Preset { preset, scale }
}
