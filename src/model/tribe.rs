use serde::{Deserialize, Serialize};

use super::leader::Leader;

/// Minimum viable population; below this a tribe dies out.
pub const MIN_TRIBE_POPULATION: f64 = 10.0;

/// A migratory or settled band, the pre-state stage of a civilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tribe {
    pub id: u64,
    /// Stable short name, inherited by splits and by the country this
    /// tribe may become.
    pub culture: String,
    pub color: String,
    /// Tile coordinates of the tribe's center.
    pub x: u32,
    pub y: u32,
    pub population: f64,
    pub age: u32,
    pub tech_level: u32,
    pub settled: bool,
    pub settlement_years: u32,
    pub migration_cooldown: u32,
    pub territories: Vec<(u32, u32)>,
    pub leader: Leader,
}

impl Tribe {
    /// Display id, e.g. `tribe_7`.
    pub fn tag(&self) -> String {
        format!("tribe_{}", self.id)
    }

    pub fn owns(&self, tile: (u32, u32)) -> bool {
        self.territories.contains(&tile)
    }
}
