use serde::{Deserialize, Serialize};

use super::leader::Leader;

/// A country below this population collapses at end of tick.
pub const MIN_COUNTRY_POPULATION: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub population: f64,
    pub is_capital: bool,
}

/// A state-level civilization formed from a tribe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub capital: (u32, u32),
    pub population: f64,
    pub age: u32,
    pub territories: Vec<(u32, u32)>,
    /// The first city is always the capital.
    pub cities: Vec<City>,
    pub government: String,
    pub tech_level: u32,
    /// Civil discontent in `[0, 100]`; feeds war strength and revolutions.
    pub unrest: f64,
    pub at_war: bool,
    pub allies: Vec<u64>,
    pub enemies: Vec<u64>,
    pub leader: Leader,
}

impl Country {
    /// Display id, e.g. `country_3`.
    pub fn tag(&self) -> String {
        format!("country_{}", self.id)
    }

    pub fn owns(&self, tile: (u32, u32)) -> bool {
        self.territories.contains(&tile)
    }

    pub fn capital_city(&self) -> Option<&City> {
        self.cities.first()
    }
}
