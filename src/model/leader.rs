use serde::{Deserialize, Serialize};

use crate::rng::SimRng;

/// How far an heir's traits may drift from the predecessor's, per axis.
const SUCCESSION_DRIFT: f64 = 0.15;

/// Six personality axes, each in `[0, 1]`, weighted into every decision
/// the owning tribe or country makes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub aggression: f64,
    pub caution: f64,
    pub diplomacy: f64,
    pub ambition: f64,
    pub freedom: f64,
    pub rationality: f64,
}

impl Traits {
    /// Fresh uniform traits. Draw order is fixed (aggression first,
    /// rationality last).
    pub fn sample(rng: &mut SimRng) -> Self {
        Self {
            aggression: rng.next(),
            caution: rng.next(),
            diplomacy: rng.next(),
            ambition: rng.next(),
            freedom: rng.next(),
            rationality: rng.next(),
        }
    }

    /// Heir traits: each axis moves by up to ±0.15, clamped to `[0, 1]`.
    pub fn drifted(&self, rng: &mut SimRng) -> Self {
        let mut drift = |v: f64| -> f64 {
            (v + rng.range(-SUCCESSION_DRIFT, SUCCESSION_DRIFT)).clamp(0.0, 1.0)
        };
        Self {
            aggression: drift(self.aggression),
            caution: drift(self.caution),
            diplomacy: drift(self.diplomacy),
            ambition: drift(self.ambition),
            freedom: drift(self.freedom),
            rationality: drift(self.rationality),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub years_in_power: u32,
    pub traits: Traits,
}

impl Leader {
    pub fn new(id: u64, name: String, age: u32, traits: Traits) -> Self {
        Self {
            id,
            name,
            age,
            years_in_power: 0,
            traits,
        }
    }

    /// Ordinary succession: the heir inherits drifted traits.
    pub fn heir_of(&self, id: u64, name: String, age: u32, rng: &mut SimRng) -> Leader {
        Leader::new(id, name, age, self.traits.drifted(rng))
    }

    /// Revolutionary succession: all six axes resampled from scratch.
    pub fn revolutionary(id: u64, name: String, age: u32, rng: &mut SimRng) -> Leader {
        Leader::new(id, name, age, Traits::sample(rng))
    }
}
