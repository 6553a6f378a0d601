use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Ocean,
    Ice,
    Tundra,
    Alpine,
    Desert,
    Savanna,
    Grassland,
    Jungle,
    Forest,
}

impl Biome {
    pub const ALL: [Biome; 9] = [
        Biome::Ocean,
        Biome::Ice,
        Biome::Tundra,
        Biome::Alpine,
        Biome::Desert,
        Biome::Savanna,
        Biome::Grassland,
        Biome::Jungle,
        Biome::Forest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::Ice => "ice",
            Biome::Tundra => "tundra",
            Biome::Alpine => "alpine",
            Biome::Desert => "desert",
            Biome::Savanna => "savanna",
            Biome::Grassland => "grassland",
            Biome::Jungle => "jungle",
            Biome::Forest => "forest",
        }
    }

    /// Tiles that can never be owned by a tribe or country.
    pub fn settleable(self) -> bool {
        !matches!(self, Biome::Ocean | Biome::Ice | Biome::Alpine)
    }

    /// Base timber yield before the moisture scale.
    pub fn wood_base(self) -> f32 {
        match self {
            Biome::Forest => 0.9,
            Biome::Jungle => 0.8,
            Biome::Grassland => 0.3,
            Biome::Savanna => 0.25,
            Biome::Tundra => 0.15,
            Biome::Ocean => 0.0,
            _ => 0.05,
        }
    }

    /// Movement cost added on top of the roughness term.
    pub fn movement_penalty(self) -> f32 {
        match self {
            Biome::Desert | Biome::Jungle => 0.5,
            Biome::Tundra => 0.3,
            Biome::Alpine => 2.0,
            _ => 0.0,
        }
    }

    /// Baseline endemic disease pressure.
    pub fn disease_base(self) -> f32 {
        match self {
            Biome::Jungle => 0.7,
            Biome::Grassland | Biome::Forest | Biome::Savanna => 0.2,
            Biome::Desert => 0.1,
            Biome::Tundra => 0.05,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateZone {
    Polar,
    Temperate,
    Tropical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiverPresence {
    None,
    Minor,
    Major,
}
