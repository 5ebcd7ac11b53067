//! Numerical integration methods for n-body simulation
//!
//! Both schemes advance the whole system at once: the gravitational
//! acceleration of each body depends on every other body's position, so an
//! intermediate stage has to move all bodies together before the field is
//! evaluated again.

use crate::physics::body::Body;
use crate::physics::gravity::{AccelerationField, NewtonianGravity};
use crate::physics::math::{Scalar, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod registry;
pub mod runge_kutta;
pub mod velocity_verlet;

pub use runge_kutta::RungeKuttaFourthOrder;
pub use velocity_verlet::VelocityVerlet;

/// Base trait for all integrators
pub trait Integrator: Send + Sync {
    /// Advance every body's position and velocity by one time step
    ///
    /// # Arguments
    /// * `positions` - Positions of all bodies, updated in place
    /// * `velocities` - Velocities of all bodies, updated in place
    /// * `masses` - Masses of all bodies, unchanged
    /// * `field` - Evaluates accelerations for a given system state
    /// * `dt` - Time step
    ///
    /// Returns the acceleration each body felt at the start of the step.
    fn advance(
        &self,
        positions: &mut [Vector],
        velocities: &mut [Vector],
        masses: &[Scalar],
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> Vec<Vector>;

    /// Get the canonical name of this integrator
    fn name(&self) -> &'static str;

    /// Short names this integrator also answers to
    fn aliases(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Get the order of this integrator
    fn convergence_order(&self) -> usize;
}

/// Selectable stepping scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[default]
    #[serde(alias = "runge_kutta_fourth_order")]
    Rk4,
    #[serde(alias = "velocity_verlet")]
    Verlet,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 2] = [IntegratorKind::Rk4, IntegratorKind::Verlet];

    pub fn integrator(self) -> &'static dyn Integrator {
        match self {
            IntegratorKind::Rk4 => &RungeKuttaFourthOrder,
            IntegratorKind::Verlet => &VelocityVerlet,
        }
    }

    /// Token used in configuration text
    pub fn token(self) -> &'static str {
        match self {
            IntegratorKind::Rk4 => "rk4",
            IntegratorKind::Verlet => "verlet",
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Advance a body set by one step under the default force law.
///
/// The result is a fresh collection; the input is left untouched. Count,
/// ids, masses, radii and colors carry over unchanged, positions and
/// velocities advance, and `force` records the acceleration at the start of
/// the step.
pub fn step(bodies: &[Body], dt: Scalar, kind: IntegratorKind) -> Vec<Body> {
    step_with_field(bodies, dt, kind.integrator(), &NewtonianGravity::default())
}

pub fn step_with_field(
    bodies: &[Body],
    dt: Scalar,
    integrator: &dyn Integrator,
    field: &dyn AccelerationField,
) -> Vec<Body> {
    let mut positions: Vec<Vector> = bodies.iter().map(|body| body.position).collect();
    let mut velocities: Vec<Vector> = bodies.iter().map(|body| body.velocity).collect();
    let masses: Vec<Scalar> = bodies.iter().map(|body| body.mass).collect();

    let forces = integrator.advance(&mut positions, &mut velocities, &masses, field, dt);

    bodies
        .iter()
        .zip(positions)
        .zip(velocities)
        .zip(forces)
        .map(|(((body, position), velocity), force)| Body {
            position,
            velocity,
            force: Some(force),
            ..body.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::Srgba;

    fn three_bodies() -> Vec<Body> {
        vec![
            Body::new(
                "a",
                3.0,
                Vector::new(1.0, 3.0, 0.0),
                Vector::new(0.1, 0.0, 0.0),
                0.4,
                Srgba::RED,
            ),
            Body::new(
                "b",
                4.0,
                Vector::new(-2.0, -1.0, 0.0),
                Vector::ZERO,
                0.5,
                Srgba::GREEN,
            ),
            Body::new(
                "c",
                5.0,
                Vector::new(1.0, -1.0, 0.0),
                Vector::new(0.0, 0.0, -0.2),
                0.6,
                Srgba::BLUE,
            ),
        ]
    }

    #[test]
    fn test_step_preserves_identity_attributes() {
        let bodies = three_bodies();

        for kind in IntegratorKind::ALL {
            let next = step(&bodies, 0.01, kind);
            assert_eq!(next.len(), bodies.len());

            for (before, after) in bodies.iter().zip(&next) {
                assert_eq!(before.id, after.id);
                assert_eq!(before.mass, after.mass);
                assert_eq!(before.radius, after.radius);
                assert_eq!(before.color, after.color);
                assert_ne!(before.position, after.position);
                assert!(after.force.is_some());
            }
        }
    }

    #[test]
    fn test_step_leaves_input_untouched() {
        let bodies = three_bodies();
        let snapshot = bodies.clone();

        let _ = step(&bodies, 0.01, IntegratorKind::Rk4);
        let _ = step(&bodies, 0.01, IntegratorKind::Verlet);

        assert_eq!(bodies, snapshot);
    }

    #[test]
    fn test_isolated_body_moves_ballistically() {
        let body = Body::new(
            "solo",
            5.0,
            Vector::new(1.0, -2.0, 0.5),
            Vector::new(0.3, 0.4, -0.1),
            0.5,
            Srgba::WHITE,
        );

        for kind in IntegratorKind::ALL {
            let next = step(std::slice::from_ref(&body), 0.01, kind);
            let expected = body.position + body.velocity * 0.01;

            assert_eq!(next[0].velocity, body.velocity);
            assert!((next[0].position - expected).length() < 1e-12);
            assert_eq!(next[0].force, Some(Vector::ZERO));
        }
    }

    #[test]
    fn test_empty_system_steps_to_empty() {
        assert!(step(&[], 0.01, IntegratorKind::Rk4).is_empty());
        assert!(step(&[], 0.01, IntegratorKind::Verlet).is_empty());
    }

    #[test]
    fn test_zero_dt_is_identity_on_state() {
        let bodies = three_bodies();
        for kind in IntegratorKind::ALL {
            let next = step(&bodies, 0.0, kind);
            for (before, after) in bodies.iter().zip(&next) {
                assert_eq!(before.position, after.position);
                assert_eq!(before.velocity, after.velocity);
            }
        }
    }

    #[test]
    fn test_schemes_are_deterministic() {
        let bodies = three_bodies();
        for kind in IntegratorKind::ALL {
            assert_eq!(step(&bodies, 0.02, kind), step(&bodies, 0.02, kind));
        }
    }

    #[test]
    fn test_kind_tokens() {
        assert_eq!(IntegratorKind::default(), IntegratorKind::Rk4);
        assert_eq!(IntegratorKind::Rk4.to_string(), "rk4");
        assert_eq!(IntegratorKind::Verlet.to_string(), "verlet");
        assert_eq!(IntegratorKind::Verlet.integrator().name(), "velocity_verlet");
    }
}
