use serde::{Deserialize, Serialize};

/// An active war between two countries, identified by their ids.
///
/// Exhaustion only accumulates, which is what bounds every war: with the
/// per-tick increments (0.05 attacker, 0.03 defender) a pure stalemate is
/// forced to terminate within 34 ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct War {
    pub attacker: u64,
    pub defender: u64,
    pub start_year: u32,
    pub attacker_exhaustion: f64,
    pub defender_exhaustion: f64,
    pub attacker_casualties: f64,
    pub defender_casualties: f64,
}

impl War {
    pub fn new(attacker: u64, defender: u64, start_year: u32) -> Self {
        Self {
            attacker,
            defender,
            start_year,
            attacker_exhaustion: 0.0,
            defender_exhaustion: 0.0,
            attacker_casualties: 0.0,
            defender_casualties: 0.0,
        }
    }

    pub fn involves(&self, country_id: u64) -> bool {
        self.attacker == country_id || self.defender == country_id
    }
}
