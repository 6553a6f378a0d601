use serde::{Deserialize, Serialize};

use super::biome::{Biome, ClimateZone, RiverPresence};

/// One cell of the coarse tile grid, aggregated from an 8x8 pixel block.
/// Immutable after world generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub elevation: f32,
    pub temperature: f32,
    pub rainfall: f32,
    /// Elevation spread (max - min) within the aggregated pixels.
    pub roughness: f32,
    pub is_land: bool,
    pub biome: Biome,
    pub climate_zone: ClimateZone,
    pub river: RiverPresence,
    /// Tile units to the nearest non-land tile; 0 on ocean, capped at 20.
    pub distance_to_coast: f32,
    pub fertility: f32,
    pub food_potential: f32,
    pub wood: f32,
    pub stone: f32,
    pub metals: f32,
    pub habitability: f32,
    pub population_capacity: f32,
    pub disease_risk: f32,
    pub movement_cost: f32,
}

impl Tile {
    /// Land a tribe or country may own: on land and not ice or alpine.
    pub fn claimable(&self) -> bool {
        self.is_land && self.biome.settleable()
    }
}
