//! Fixtures for unit tests: a synthetic uniform world and a bundle of
//! tick state, so behavior tests don't need to run full world generation.

use crate::id::IdAllocator;
use crate::model::{
    Biome, City, ClimateZone, Country, EventLog, Leader, RiverPresence, Tile, Traits, Tribe,
    World,
};
use crate::rng::SimRng;
use crate::sim::{Stats, TerritoryIndex, TickCtx};
use crate::worldgen::{TILE_H, TILE_W};

/// A world of uniform habitable grassland. The dense pixel fields are
/// empty; the simulation only reads the tile grid.
pub(crate) fn flat_world() -> World {
    let mut tiles = Vec::with_capacity(TILE_W * TILE_H);
    for y in 0..TILE_H {
        for x in 0..TILE_W {
            tiles.push(Tile {
                x: x as u32,
                y: y as u32,
                elevation: 0.3,
                temperature: 0.3,
                rainfall: 0.5,
                roughness: 0.1,
                is_land: true,
                biome: Biome::Grassland,
                climate_zone: ClimateZone::Temperate,
                river: RiverPresence::None,
                distance_to_coast: 5.0,
                fertility: 0.5,
                food_potential: 0.5,
                wood: 0.3,
                stone: 0.2,
                metals: 0.2,
                habitability: 0.6,
                population_capacity: 0.6,
                disease_risk: 0.2,
                movement_cost: 1.2,
            });
        }
    }
    World {
        seed: 0,
        elevation: Vec::new(),
        temperature: Vec::new(),
        moisture: Vec::new(),
        river_mark: Vec::new(),
        rivers: Vec::new(),
        tiles,
    }
}

/// Owns everything a [`TickCtx`] borrows.
pub(crate) struct TickHarness {
    pub world: World,
    pub rng: SimRng,
    pub events: EventLog,
    pub ids: IdAllocator,
    pub stats: Stats,
    pub territory: TerritoryIndex,
    pub year: u32,
}

impl TickHarness {
    pub fn new(year: u32) -> Self {
        Self {
            world: flat_world(),
            rng: SimRng::new(777),
            events: EventLog::new(),
            ids: IdAllocator::new(),
            stats: Stats::default(),
            territory: TerritoryIndex::new(),
            year,
        }
    }

    pub fn ctx(&mut self) -> TickCtx<'_> {
        TickCtx {
            world: &self.world,
            rng: &mut self.rng,
            events: &mut self.events,
            ids: &mut self.ids,
            stats: &mut self.stats,
            territory: &mut self.territory,
            year: self.year,
        }
    }
}

pub(crate) fn neutral_traits() -> Traits {
    Traits {
        aggression: 0.5,
        caution: 0.5,
        diplomacy: 0.5,
        ambition: 0.5,
        freedom: 0.5,
        rationality: 0.5,
    }
}

pub(crate) fn test_tribe(id: u64, x: u32, y: u32, population: f64, settled: bool) -> Tribe {
    Tribe {
        id,
        culture: format!("Culture{id}"),
        color: "#336699".to_string(),
        x,
        y,
        population,
        age: 10,
        tech_level: 0,
        settled,
        settlement_years: 0,
        migration_cooldown: 0,
        territories: vec![(x, y)],
        leader: Leader::new(id, format!("Chief {id}"), 35, neutral_traits()),
    }
}

pub(crate) fn test_country(id: u64, tiles: Vec<(u32, u32)>, population: f64) -> Country {
    let capital = tiles[0];
    Country {
        id,
        name: format!("Nation{id} Civilization"),
        color: "#993366".to_string(),
        capital,
        population,
        age: 40,
        territories: tiles,
        cities: vec![City {
            id,
            name: format!("Capital{id}"),
            x: capital.0,
            y: capital.1,
            population: 100.0,
            is_capital: true,
        }],
        government: "tribal_confederation".to_string(),
        tech_level: 1,
        unrest: 0.0,
        at_war: false,
        allies: Vec::new(),
        enemies: Vec::new(),
        leader: Leader::new(id, format!("Ruler {id}"), 40, neutral_traits()),
    }
}
