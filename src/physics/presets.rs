//! Named initial-condition generators
//!
//! Every preset is a pure function of its scale parameter and returns a
//! freshly allocated body set. The one exception is [`Preset::RandomChaos`],
//! which draws from the random generator it is handed.

use crate::physics::body::{Body, rgb};
use crate::physics::gravity::G;
use crate::physics::math::{Scalar, Vector, random_in_cube};
use crate::resources::SharedRng;
use bevy::color::Srgba;
use bevy::log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PALETTE: [Srgba; 3] = [
    rgb(0x00, 0xf3, 0xff),
    rgb(0x70, 0x00, 0xff),
    rgb(0xff, 0x00, 0x3c),
];

const SUN_COLOR: Srgba = rgb(0xfb, 0xbf, 0x24);
const EARTH_COLOR: Srgba = rgb(0x3b, 0x82, 0xf6);
const MOON_COLOR: Srgba = rgb(0x9c, 0xa3, 0xaf);

// Chenciner-Montgomery figure-eight initial conditions for unit masses, G = 1
const FIGURE_EIGHT_POSITION: (Scalar, Scalar) = (0.97000436, -0.24308753);
const FIGURE_EIGHT_VELOCITY: (Scalar, Scalar) = (0.4662036850, 0.4323657300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    FigureEight,
    RandomChaos,
    SunEarthMoon,
    Pythagorean,
    Lagrange,
}

impl Preset {
    pub const DEFAULT_SCALE: Scalar = 4.0;

    pub const ALL: [Preset; 5] = [
        Preset::FigureEight,
        Preset::RandomChaos,
        Preset::SunEarthMoon,
        Preset::Pythagorean,
        Preset::Lagrange,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Preset::FigureEight => "Figure 8",
            Preset::RandomChaos => "Random Chaos",
            Preset::SunEarthMoon => "Sun Earth Moon",
            Preset::Pythagorean => "Pythagorean",
            Preset::Lagrange => "Lagrange",
        }
    }

    /// Whether repeated generation at the same scale gives the same bodies
    pub fn is_deterministic(self) -> bool {
        !matches!(self, Preset::RandomChaos)
    }

    /// Resolve a preset name, falling back to the figure-eight orbit.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown preset '{}', falling back to {}",
                name,
                Preset::default()
            );
            Preset::default()
        })
    }

    /// Generate this preset, drawing any randomness from `rng`.
    pub fn generate_with_rng(self, scale: Scalar, rng: &mut SharedRng) -> Vec<Body> {
        match self {
            Preset::FigureEight => figure_eight(scale),
            Preset::RandomChaos => random_chaos(scale, rng),
            Preset::SunEarthMoon => sun_earth_moon(scale),
            Preset::Pythagorean => pythagorean(scale),
            Preset::Lagrange => lagrange(scale),
        }
    }

    /// Generate this preset; the random preset draws fresh entropy each call.
    pub fn generate(self, scale: Scalar) -> Vec<Body> {
        self.generate_with_rng(scale, &mut SharedRng::default())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "figure8" | "figureeight" => Ok(Preset::FigureEight),
            "randomchaos" | "random" => Ok(Preset::RandomChaos),
            "sunearthmoon" => Ok(Preset::SunEarthMoon),
            "pythagorean" => Ok(Preset::Pythagorean),
            "lagrange" => Ok(Preset::Lagrange),
            _ => Err(format!(
                "Unknown preset: '{}'. Available presets: {}",
                s,
                Preset::ALL
                    .iter()
                    .map(|preset| preset.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Generate a preset by name; unknown names get the figure-eight orbit.
pub fn generate(name: &str, scale: Scalar) -> Vec<Body> {
    Preset::from_name_or_default(name).generate(scale)
}

/// Three unit masses on the periodic figure-eight orbit.
///
/// Positions scale with `scale` and velocities with `1/√scale`, which keeps
/// the orbit on the same family under gravitational scaling.
fn figure_eight(scale: Scalar) -> Vec<Body> {
    let s = scale;
    let velocity_scale = 1.0 / libm::sqrt(s);
    let (px, py) = FIGURE_EIGHT_POSITION;
    let (vx, vy) = FIGURE_EIGHT_VELOCITY;

    vec![
        Body::new(
            "1",
            1.0,
            Vector::new(px * s, py * s, 0.0),
            Vector::new(vx * velocity_scale, vy * velocity_scale, 0.0),
            0.2,
            PALETTE[0],
        ),
        Body::new(
            "2",
            1.0,
            Vector::new(-px * s, -py * s, 0.0),
            Vector::new(vx * velocity_scale, vy * velocity_scale, 0.0),
            0.2,
            PALETTE[1],
        ),
        Body::new(
            "3",
            1.0,
            Vector::ZERO,
            Vector::new(-2.0 * vx * velocity_scale, -2.0 * vy * velocity_scale, 0.0),
            0.2,
            PALETTE[2],
        ),
    ]
}

/// Three bodies with masses in `[1, 2)` scattered through a cube of
/// half-width `scale`, with small random velocities.
fn random_chaos(scale: Scalar, rng: &mut SharedRng) -> Vec<Body> {
    PALETTE
        .iter()
        .enumerate()
        .map(|(i, &color)| {
            let mass = rng.random_range(1.0..2.0);
            let position = random_in_cube(rng, scale);
            let velocity = random_in_cube(rng, 0.25);
            Body::new((i + 1).to_string(), mass, position, velocity, 0.3, color)
        })
        .collect()
}

/// Schematic sun, planet and moon on circular orbits, `v = sqrt(G M / r)`.
fn sun_earth_moon(scale: Scalar) -> Vec<Body> {
    let s = scale * 0.5;

    let sun_mass = 100.0;
    let earth_mass = 1.0;
    let moon_mass = 0.01;

    let earth_orbit = 10.0 * s;
    let moon_orbit = 1.0 * s;

    let earth_speed = libm::sqrt(G * sun_mass / earth_orbit);
    let moon_speed = libm::sqrt(G * earth_mass / moon_orbit);

    vec![
        Body::new("Sun", sun_mass, Vector::ZERO, Vector::ZERO, 1.5, SUN_COLOR),
        Body::new(
            "Earth",
            earth_mass,
            Vector::new(earth_orbit, 0.0, 0.0),
            Vector::new(0.0, earth_speed, 0.0),
            0.4,
            EARTH_COLOR,
        ),
        Body::new(
            "Moon",
            moon_mass,
            Vector::new(earth_orbit + moon_orbit, 0.0, 0.0),
            Vector::new(0.0, earth_speed + moon_speed, 0.0),
            0.1,
            MOON_COLOR,
        ),
    ]
}

/// Burrau's problem: masses 3, 4, 5 at rest on a 3-4-5 right triangle.
fn pythagorean(scale: Scalar) -> Vec<Body> {
    let s = scale * 0.5;

    vec![
        Body::new(
            "1",
            3.0,
            Vector::new(1.0 * s, 3.0 * s, 0.0),
            Vector::ZERO,
            0.4,
            PALETTE[0],
        ),
        Body::new(
            "2",
            4.0,
            Vector::new(-2.0 * s, -1.0 * s, 0.0),
            Vector::ZERO,
            0.5,
            PALETTE[1],
        ),
        Body::new(
            "3",
            5.0,
            Vector::new(1.0 * s, -1.0 * s, 0.0),
            Vector::ZERO,
            0.6,
            PALETTE[2],
        ),
    ]
}

/// Equal masses on an equilateral triangle, rotating about the centre.
fn lagrange(scale: Scalar) -> Vec<Body> {
    let s = scale;
    let speed = 0.8 / libm::sqrt(s);
    let sin60 = 0.866;

    vec![
        Body::new(
            "1",
            1.0,
            Vector::new(1.0 * s, 0.0, 0.0),
            Vector::new(0.0, speed, 0.0),
            0.3,
            PALETTE[0],
        ),
        Body::new(
            "2",
            1.0,
            Vector::new(-0.5 * s, sin60 * s, 0.0),
            Vector::new(-sin60 * speed, -0.5 * speed, 0.0),
            0.3,
            PALETTE[1],
        ),
        Body::new(
            "3",
            1.0,
            Vector::new(-0.5 * s, -sin60 * s, 0.0),
            Vector::new(sin60 * speed, -0.5 * speed, 0.0),
            0.3,
            PALETTE[2],
        ),
    ]
}
