//! System-wide observables for telemetry and monitoring
//!
//! None of these feed back into the dynamics. They are read from the body
//! snapshot taken after each frame.

use crate::physics::body::Body;
use crate::physics::gravity::{NewtonianGravity, split_phase};
use crate::physics::math::{Scalar, Vector};

/// Nearest-neighbour distance below which an encounter counts as chaotic
pub const CHAOTIC_DISTANCE: Scalar = 0.6;

/// Nearest-neighbour distance below which a body counts as transitional
pub const TRANSITIONAL_DISTANCE: Scalar = 1.5;

/// Ordered from most to least chaotic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StabilityEra {
    Chaotic,
    Transitional,
    Stable,
}

impl StabilityEra {
    pub fn from_nearest_distance(distance: Scalar) -> Self {
        if distance < CHAOTIC_DISTANCE {
            StabilityEra::Chaotic
        } else if distance < TRANSITIONAL_DISTANCE {
            StabilityEra::Transitional
        } else {
            StabilityEra::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StabilityEra::Chaotic => "CHAOTIC ERA",
            StabilityEra::Transitional => "TRANSITIONAL",
            StabilityEra::Stable => "STABLE ERA",
        }
    }
}

/// Per-body monitor reading
#[derive(Debug, Clone, PartialEq)]
pub struct BodyStatus {
    pub id: String,
    pub speed: Scalar,
    pub nearest_distance: Option<Scalar>,
    pub era: StabilityEra,
}

pub fn kinetic_energy(bodies: &[Body]) -> Scalar {
    bodies.iter().map(Body::kinetic_energy).sum()
}

pub fn potential_energy(bodies: &[Body], gravity: &NewtonianGravity) -> Scalar {
    let (positions, masses) = split_phase(bodies);
    gravity.potential_energy(&positions, &masses)
}

pub fn total_energy(bodies: &[Body], gravity: &NewtonianGravity) -> Scalar {
    kinetic_energy(bodies) + potential_energy(bodies, gravity)
}

pub fn total_momentum(bodies: &[Body]) -> Vector {
    bodies.iter().map(Body::momentum).sum()
}

/// Mass-weighted centre, `None` when the total mass vanishes
pub fn barycenter(bodies: &[Body]) -> Option<Vector> {
    let (weighted_positions, total_mass): (Vector, Scalar) = bodies
        .iter()
        .fold((Vector::ZERO, 0.0), |(pos_acc, mass_acc), body| {
            (pos_acc + body.position * body.mass, mass_acc + body.mass)
        });

    if total_mass.abs() <= Scalar::EPSILON {
        return None;
    }

    let barycenter = weighted_positions / total_mass;
    barycenter.is_finite().then_some(barycenter)
}

pub fn nearest_distance(bodies: &[Body], index: usize) -> Option<Scalar> {
    let position = bodies.get(index)?.position;
    bodies
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(_, other)| position.distance(other.position))
        .min_by(|a, b| a.total_cmp(b))
}

pub fn body_statuses(bodies: &[Body]) -> Vec<BodyStatus> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let nearest = nearest_distance(bodies, i);
            BodyStatus {
                id: body.id.clone(),
                speed: body.velocity.length(),
                nearest_distance: nearest,
                era: nearest
                    .map(StabilityEra::from_nearest_distance)
                    .unwrap_or(StabilityEra::Stable),
            }
        })
        .collect()
}
