//! Point-mass body model

use crate::physics::math::{Scalar, Vector};
use crate::resources::SharedRng;
use bevy::color::Srgba;
use rand::Rng;

/// One massive point body.
///
/// `radius` and `color` are presentation attributes only; dynamics read
/// `mass`, `position` and `velocity`. `force` holds the net acceleration last
/// evaluated for this body and exists for vector overlays and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: String,
    pub mass: Scalar,
    pub position: Vector,
    pub velocity: Vector,
    pub radius: Scalar,
    pub color: Srgba,
    pub force: Option<Vector>,
}

impl Body {
    pub fn new(
        id: impl Into<String>,
        mass: Scalar,
        position: Vector,
        velocity: Vector,
        radius: Scalar,
        color: Srgba,
    ) -> Self {
        Self {
            id: id.into(),
            mass,
            position,
            velocity,
            radius,
            color,
            force: None,
        }
    }

    /// Builds a user-injected body with a fresh `manual-` id.
    pub fn injected(
        mass: Scalar,
        position: Vector,
        velocity: Vector,
        color: Srgba,
        rng: &mut SharedRng,
    ) -> Self {
        Self::new(
            manual_body_id(rng),
            mass,
            position,
            velocity,
            injected_radius(mass),
            color,
        )
    }

    #[inline]
    pub fn momentum(&self) -> Vector {
        self.velocity * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> Scalar {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

/// Opaque sRGB color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Srgba {
    Srgba::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

/// Visual radius for bodies decoded from configuration text
pub fn imported_radius(mass: Scalar) -> Scalar {
    (mass * 0.1).max(0.2)
}

/// Visual radius for bodies injected by hand
pub fn injected_radius(mass: Scalar) -> Scalar {
    (mass * 0.1).clamp(0.1, 0.5)
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn manual_body_id(rng: &mut SharedRng) -> String {
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("manual-{suffix}")
}
