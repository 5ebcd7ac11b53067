//! Softened pairwise Newtonian gravity
//!
//! Every body feels every other body directly, so one evaluation costs O(n²).
//! That is fine for the handful of bodies this simulation is built around; a
//! tree approximation would change the numerical results and is not used.

use crate::physics::body::Body;
use crate::physics::math::{Scalar, Vector, magnitude_squared};

/// Gravitational constant in simulation units
pub const G: Scalar = 1.0;

/// Softening length; bounds the force as two bodies approach coincidence
pub const SOFTENING: Scalar = 0.05;

/// Source of per-body accelerations for a whole system state.
///
/// Integrators evaluate the field at intermediate stage states, so it only
/// ever sees positions and masses, never the bodies themselves.
pub trait AccelerationField: Send + Sync {
    fn accelerations(&self, positions: &[Vector], masses: &[Scalar]) -> Vec<Vector>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub g: Scalar,
    pub softening: Scalar,
}

impl NewtonianGravity {
    pub fn new(g: Scalar, softening: Scalar) -> Self {
        Self { g, softening }
    }

    /// Softened potential energy of the whole system
    pub fn potential_energy(&self, positions: &[Vector], masses: &[Scalar]) -> Scalar {
        let softening_squared = self.softening * self.softening;
        let mut potential = 0.0;

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let dist_sq = magnitude_squared(positions[j] - positions[i]);
                potential -= self.g * masses[i] * masses[j] / libm::sqrt(dist_sq + softening_squared);
            }
        }

        potential
    }
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self::new(G, SOFTENING)
    }
}

impl AccelerationField for NewtonianGravity {
    fn accelerations(&self, positions: &[Vector], masses: &[Scalar]) -> Vec<Vector> {
        let softening_squared = self.softening * self.softening;

        positions
            .iter()
            .enumerate()
            .map(|(i, &position_i)| {
                positions
                    .iter()
                    .zip(masses)
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .fold(Vector::ZERO, |acceleration, (_, (&position_j, &mass_j))| {
                        let r = position_j - position_i;
                        let dist_sq = magnitude_squared(r);
                        let magnitude =
                            self.g * mass_j / libm::pow(dist_sq + softening_squared, 1.5);
                        acceleration + r * magnitude
                    })
            })
            .collect()
    }
}

/// Net acceleration on every body under the default force law.
///
/// Pure: the input is not modified and nothing else is touched.
pub fn accelerations(bodies: &[Body]) -> Vec<Vector> {
    let (positions, masses) = split_phase(bodies);
    NewtonianGravity::default().accelerations(&positions, &masses)
}

pub(crate) fn split_phase(bodies: &[Body]) -> (Vec<Vector>, Vec<Scalar>) {
    bodies.iter().map(|body| (body.position, body.mass)).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::Srgba;

    fn body_at(id: &str, mass: Scalar, position: Vector) -> Body {
        Body::new(id, mass, position, Vector::ZERO, 0.2, Srgba::WHITE)
    }

    #[test]
    fn test_single_body_feels_nothing() {
        let bodies = vec![body_at("a", 5.0, Vector::new(1.0, 2.0, 3.0))];
        assert_eq!(accelerations(&bodies), vec![Vector::ZERO]);
    }

    #[test]
    fn test_pair_attracts_along_separation() {
        let bodies = vec![
            body_at("a", 1.0, Vector::ZERO),
            body_at("b", 2.0, Vector::new(2.0, 0.0, 0.0)),
        ];
        let accels = accelerations(&bodies);

        let softened = libm::pow(4.0 + SOFTENING * SOFTENING, 1.5);
        let expected_a = 2.0 * 2.0 / softened;
        let expected_b = -1.0 * 2.0 / softened;

        assert!((accels[0].x - expected_a).abs() < 1e-12);
        assert!((accels[1].x - expected_b).abs() < 1e-12);
        assert_eq!(accels[0].y, 0.0);
        assert_eq!(accels[1].z, 0.0);
    }

    #[test]
    fn test_newton_third_law_in_forces() {
        let bodies = vec![
            body_at("a", 3.0, Vector::new(1.0, 3.0, 0.0)),
            body_at("b", 4.0, Vector::new(-2.0, -1.0, 0.5)),
            body_at("c", 5.0, Vector::new(1.0, -1.0, -0.5)),
        ];
        let accels = accelerations(&bodies);

        let net_force = bodies
            .iter()
            .zip(&accels)
            .fold(Vector::ZERO, |sum, (body, a)| sum + *a * body.mass);

        assert!(net_force.length() < 1e-12, "net force {net_force:?}");
    }

    #[test]
    fn test_coincident_bodies_stay_finite() {
        let bodies = vec![
            body_at("a", 1.0, Vector::new(1.0, 1.0, 1.0)),
            body_at("b", 1.0, Vector::new(1.0, 1.0, 1.0)),
        ];
        let accels = accelerations(&bodies);

        assert!(accels.iter().all(|a| a.is_finite()));
        assert_eq!(accels[0], Vector::ZERO);
    }

    #[test]
    fn test_softening_bounds_close_encounters() {
        let near = vec![
            body_at("a", 1.0, Vector::ZERO),
            body_at("b", 1.0, Vector::new(1e-6, 0.0, 0.0)),
        ];
        let accel = accelerations(&near)[0].length();

        // Bounded by roughly r / ε³ for tiny r
        assert!(accel < 1e-6 / (SOFTENING * SOFTENING * SOFTENING) * 1.01);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let bodies = vec![
            body_at("a", 1.0, Vector::ZERO),
            body_at("b", 1.0, Vector::X),
        ];
        let before = bodies.clone();
        let _ = accelerations(&bodies);
        assert_eq!(bodies, before);
    }

    #[test]
    fn test_potential_energy_of_pair() {
        let gravity = NewtonianGravity::new(1.0, 0.0);
        let potential =
            gravity.potential_energy(&[Vector::ZERO, Vector::new(2.0, 0.0, 0.0)], &[3.0, 4.0]);
        assert!((potential + 6.0).abs() < 1e-12);
    }
}
