//! External impulse sources layered on top of the n-body force law
//!
//! A wormhole is a point mass outside the body set. Before each sub-step it
//! gives every body an explicit Euler velocity kick towards itself, and it
//! teleports any body that strays inside its capture radius to the exit of
//! its paired wormhole. Sources never take part in the pairwise force
//! evaluation the integrators perform.

use crate::physics::body::Body;
use crate::physics::math::{Scalar, Vector, magnitude_squared, random_in_cube, random_unit_vector};
use crate::resources::SharedRng;
use bevy::log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wormhole {
    pub position: Vector,
    /// Where captured bodies come out
    pub target: Vector,
    pub mass: Scalar,
}

impl Wormhole {
    /// Two mutually linked wormholes on the x axis, `separation` apart
    pub fn pair(separation: Scalar, mass: Scalar) -> [Wormhole; 2] {
        let a = Vector::new(-0.5 * separation, 0.0, 0.0);
        let b = Vector::new(0.5 * separation, 0.0, 0.0);
        [
            Wormhole {
                position: a,
                target: b,
                mass,
            },
            Wormhole {
                position: b,
                target: a,
                mass,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbationParams {
    /// Effective gravitational constant for source impulses
    pub coupling: Scalar,
    /// Added to the squared distance before dividing
    pub softening: Scalar,
    pub capture_radius: Scalar,
    pub ejection_speed: Scalar,
    pub exit_jitter: Scalar,
}

impl Default for PerturbationParams {
    fn default() -> Self {
        Self {
            coupling: 1.0,
            softening: 0.1,
            capture_radius: 0.8,
            ejection_speed: 2.0,
            exit_jitter: 0.25,
        }
    }
}

/// Apply one sub-step worth of source impulses and captures.
///
/// Returns a new body set; the input is not modified. Bodies keep their ids
/// and order.
pub fn apply_perturbations(
    bodies: &[Body],
    sources: &[Wormhole],
    params: &PerturbationParams,
    dt: Scalar,
    rng: &mut SharedRng,
) -> Vec<Body> {
    let capture_radius_squared = params.capture_radius * params.capture_radius;

    bodies
        .iter()
        .map(|body| {
            let mut body = body.clone();

            for source in sources {
                let r = source.position - body.position;
                let dist_sq = magnitude_squared(r);

                let kick = params.coupling * source.mass / (dist_sq + params.softening) * dt;
                body.velocity += r.normalize_or_zero() * kick;

                if dist_sq < capture_radius_squared {
                    let direction = random_unit_vector(rng);
                    body.position = source.target
                        + direction * (2.0 * params.capture_radius)
                        + random_in_cube(rng, params.exit_jitter);
                    body.velocity = direction * params.ejection_speed;

                    debug!(
                        "Body {} captured at {:?}, ejected at {:?}",
                        body.id, source.position, body.position
                    );
                    break;
                }
            }

            body
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::Srgba;

    fn body_at(position: Vector) -> Body {
        Body::new("probe", 1.0, position, Vector::ZERO, 0.2, Srgba::WHITE)
    }

    fn single_source() -> Wormhole {
        Wormhole {
            position: Vector::ZERO,
            target: Vector::new(20.0, 0.0, 0.0),
            mass: 5.0,
        }
    }

    #[test]
    fn test_pair_is_linked() {
        let [a, b] = Wormhole::pair(20.0, 5.0);
        assert_eq!(a.position, Vector::new(-10.0, 0.0, 0.0));
        assert_eq!(a.target, b.position);
        assert_eq!(b.target, a.position);
    }

    #[test]
    fn test_impulse_points_at_source() {
        let mut rng = SharedRng::from_seed(1);
        let params = PerturbationParams::default();
        let bodies = vec![body_at(Vector::new(3.0, 0.0, 0.0))];

        let next = apply_perturbations(&bodies, &[single_source()], &params, 0.01, &mut rng);

        let expected = 1.0 * 5.0 / (9.0 + 0.1) * 0.01;
        assert!((next[0].velocity.x + expected).abs() < 1e-12);
        assert_eq!(next[0].velocity.y, 0.0);
        assert_eq!(next[0].position, bodies[0].position);
    }

    #[test]
    fn test_no_sources_or_zero_dt_is_identity() {
        let mut rng = SharedRng::from_seed(1);
        let params = PerturbationParams::default();
        let bodies = vec![body_at(Vector::new(3.0, 1.0, 0.0))];

        assert_eq!(apply_perturbations(&bodies, &[], &params, 0.01, &mut rng), bodies);
        assert_eq!(
            apply_perturbations(&bodies, &[single_source()], &params, 0.0, &mut rng),
            bodies
        );
    }

    #[test]
    fn test_capture_teleports_to_target() {
        let mut rng = SharedRng::from_seed(7);
        let params = PerturbationParams::default();
        let source = single_source();
        let bodies = vec![body_at(Vector::new(0.3, 0.0, 0.0))];

        let next = apply_perturbations(&bodies, &[source], &params, 0.01, &mut rng);
        let body = &next[0];

        assert_eq!(body.id, "probe");
        assert!((body.velocity.length() - params.ejection_speed).abs() < 1e-9);

        // Exit offset is twice the capture radius plus jitter in each axis
        let offset = (body.position - source.target).length();
        let jitter_bound = params.exit_jitter * 3.0_f64.sqrt();
        assert!(offset <= 2.0 * params.capture_radius + jitter_bound + 1e-9);
        assert!(offset >= 2.0 * params.capture_radius - jitter_bound - 1e-9);
    }

    #[test]
    fn test_capture_is_seed_reproducible() {
        let params = PerturbationParams::default();
        let bodies = vec![body_at(Vector::new(0.1, 0.1, 0.0))];

        let a = apply_perturbations(
            &bodies,
            &[single_source()],
            &params,
            0.01,
            &mut SharedRng::from_seed(3),
        );
        let b = apply_perturbations(
            &bodies,
            &[single_source()],
            &params,
            0.01,
            &mut SharedRng::from_seed(3),
        );
        assert_eq!(a, b);
    }
}
