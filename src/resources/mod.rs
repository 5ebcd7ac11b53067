use crate::physics::body::Body;
use crate::physics::math::Vector;
use crate::physics::presets::Preset;
use crate::prelude::*;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

#[derive(Resource, Deref, DerefMut, Debug, Clone, PartialEq)]
pub struct SharedRng(pub ChaCha8Rng);

impl SharedRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::default(),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

/// The live, ordered body collection owned by the simulation driver
#[derive(Resource, Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct BodySet(pub Vec<Body>);

/// Where the current body set came from, so a reset can rebuild it
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum ScenarioSource {
    Preset { preset: Preset, scale: Scalar },
    Custom(Vec<Body>),
}

impl Default for ScenarioSource {
    fn default() -> Self {
        Self::Preset {
            preset: Preset::default(),
            scale: Preset::DEFAULT_SCALE,
        }
    }
}

/// Optional camera hints carried by a decoded configuration
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraHints {
    pub position: Option<Vector>,
    pub target: Option<Vector>,
}
