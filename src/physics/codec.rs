//! Compact text encoding of a whole system configuration
//!
//! The format is a query string: `n=3&m=1,1,1&p=...&v=...&im=verlet&dt=0.01`.
//! Keys are order independent and the text may carry a leading `?` or a full
//! URL in front of it, so a shared link can be pasted as is.
//!
//! Decoding is lenient about the numbers inside the lists: a component that
//! is missing or does not parse falls back to `1` for masses and `0` for
//! positions and velocities. Only the presence of the four required keys and
//! a usable body count are enforced.

use crate::physics::body::{Body, imported_radius, rgb};
use crate::physics::integrators::IntegratorKind;
use crate::physics::math::{Scalar, Vector};
use bevy::color::Srgba;
use std::collections::HashMap;
use std::fmt;

/// Time step used when the text carries none
pub const DEFAULT_TIME_STEP: Scalar = 0.01;

/// Largest body count accepted from text
pub const MAX_BODIES: usize = 1024;

const IMPORT_PALETTE: [Srgba; 6] = [
    rgb(0xFF, 0x45, 0x00),
    rgb(0x32, 0xCD, 0x32),
    rgb(0x1E, 0x90, 0xFF),
    rgb(0xFF, 0xD7, 0x00),
    rgb(0xFF, 0x69, 0xB4),
    rgb(0x00, 0xFF, 0xFF),
];

/// A complete, self-contained starting state for the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub bodies: Vec<Body>,
    pub integrator: IntegratorKind,
    pub time_step: Scalar,
    pub camera_position: Option<Vector>,
    pub camera_target: Option<Vector>,
}

impl SystemConfig {
    pub fn new(bodies: Vec<Body>, integrator: IntegratorKind, time_step: Scalar) -> Self {
        Self {
            bodies,
            integrator,
            time_step,
            camera_position: None,
            camera_target: None,
        }
    }

    pub fn with_camera(mut self, position: Option<Vector>, target: Option<Vector>) -> Self {
        self.camera_position = position;
        self.camera_target = target;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MissingField(&'static str),
    InvalidBodyCount(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingField(key) => {
                write!(f, "Configuration is missing required field '{key}'")
            }
            DecodeError::InvalidBodyCount(value) => {
                write!(
                    f,
                    "Invalid body count '{value}': expected an integer between 1 and {MAX_BODIES}"
                )
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode configuration text into a [`SystemConfig`].
pub fn decode(text: &str) -> Result<SystemConfig, DecodeError> {
    let params = parse_query(query_part(text));

    let count_text = params.get("n").ok_or(DecodeError::MissingField("n"))?;
    let masses = params.get("m").ok_or(DecodeError::MissingField("m"))?;
    let positions = params.get("p").ok_or(DecodeError::MissingField("p"))?;
    let velocities = params.get("v").ok_or(DecodeError::MissingField("v"))?;

    let count = count_text
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_BODIES).contains(n))
        .ok_or_else(|| DecodeError::InvalidBodyCount(count_text.clone()))?;

    let masses = parse_list(masses);
    let positions = parse_list(positions);
    let velocities = parse_list(velocities);

    let bodies = (0..count)
        .map(|i| {
            let mass = masses
                .get(i)
                .copied()
                .flatten()
                .filter(|m| *m != 0.0)
                .unwrap_or(1.0);

            Body::new(
                format!("imported-{i}"),
                mass,
                triple_at(&positions, i),
                triple_at(&velocities, i),
                imported_radius(mass),
                IMPORT_PALETTE[i % IMPORT_PALETTE.len()],
            )
        })
        .collect();

    let integrator = match params.get("im").map(String::as_str) {
        Some("verlet") => IntegratorKind::Verlet,
        _ => IntegratorKind::Rk4,
    };

    let time_step = params
        .get("dt")
        .and_then(|dt| parse_number(dt))
        .filter(|dt| *dt > 0.0)
        .unwrap_or(DEFAULT_TIME_STEP);

    Ok(SystemConfig {
        bodies,
        integrator,
        time_step,
        camera_position: params.get("cp").and_then(|cp| parse_exact_triple(cp)),
        camera_target: params.get("ct").and_then(|ct| parse_exact_triple(ct)),
    })
}

/// Encode a configuration as text that [`decode`] reads back.
///
/// Ids, colors and radii are not carried; they are rebuilt on decode.
pub fn encode(config: &SystemConfig) -> String {
    let bodies = &config.bodies;

    let masses = join(bodies.iter().map(|body| body.mass));
    let positions = join(bodies.iter().flat_map(|body| body.position.to_array()));
    let velocities = join(bodies.iter().flat_map(|body| body.velocity.to_array()));

    let mut pairs = vec![
        format!("n={}", bodies.len()),
        format!("m={masses}"),
        format!("p={positions}"),
        format!("v={velocities}"),
        format!("im={}", config.integrator.token()),
        format!("dt={}", config.time_step),
    ];

    if let Some(position) = config.camera_position {
        pairs.push(format!("cp={}", join(position.to_array())));
    }
    if let Some(target) = config.camera_target {
        pairs.push(format!("ct={}", join(target.to_array())));
    }

    pairs.join("&")
}

fn query_part(text: &str) -> &str {
    let text = text.trim();
    let text = text.split_once('#').map_or(text, |(before, _)| before);
    text.split_once('?').map_or(text, |(_, query)| query)
}

/// Split into key/value pairs; the first occurrence of a repeated key wins
fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(percent_decode(key))
            .or_insert_with(|| percent_decode(value));
    }

    params
}

/// Decode `+` and `%XX` escapes; malformed escapes pass through literally
fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        decoded.push((high << 4) | low);
                        i += 2;
                    }
                    _ => decoded.push(b'%'),
                }
            }
            byte => decoded.push(byte),
        }
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<Scalar> {
    text.trim()
        .parse::<Scalar>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_list(text: &str) -> Vec<Option<Scalar>> {
    text.split(',').map(parse_number).collect()
}

fn triple_at(values: &[Option<Scalar>], index: usize) -> Vector {
    let component = |offset: usize| {
        values
            .get(index * 3 + offset)
            .copied()
            .flatten()
            .unwrap_or(0.0)
    };
    Vector::new(component(0), component(1), component(2))
}

fn parse_exact_triple(text: &str) -> Option<Vector> {
    let values = text
        .split(',')
        .map(parse_number)
        .collect::<Option<Vec<Scalar>>>()?;

    match values.as_slice() {
        [x, y, z] => Some(Vector::new(*x, *y, *z)),
        _ => None,
    }
}

fn join(values: impl IntoIterator<Item = Scalar>) -> String {
    values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
