//! Versioned JSON snapshots of simulation state.
//!
//! The dense world fields are never written — they are a pure function of
//! the seed and are regenerated on load. A load validates the snapshot
//! against the model invariants (ownership disjointness, land-only
//! territories, id references) and rejects corrupt files without touching
//! any existing simulation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::id::IdAllocator;
use crate::model::{City, Country, Leader, Traits, Tribe, War};
use crate::rng::{derive_seed, SimRng};
use crate::sim::{Owner, Simulation, Stats, TerritoryIndex};
use crate::worldgen;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointSave {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderSave {
    pub id: u64,
    pub name: String,
    pub age: u32,
    pub years_in_power: u32,
    pub traits: Traits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TribeSave {
    pub id: u64,
    pub culture: String,
    pub color: String,
    pub population: f64,
    pub age: u32,
    pub territories: Vec<PointSave>,
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub tech_level: u32,
    #[serde(default)]
    pub settled: bool,
    #[serde(default)]
    pub settlement_years: u32,
    #[serde(default)]
    pub migration_cooldown: u32,
    #[serde(default)]
    pub leader: Option<LeaderSave>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySave {
    pub id: u64,
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub population: f64,
    pub is_capital: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySave {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub population: f64,
    pub age: u32,
    pub territories: Vec<PointSave>,
    pub x: u32,
    pub y: u32,
    pub capital_x: u32,
    pub capital_y: u32,
    pub cities: Vec<CitySave>,
    pub leader: LeaderSave,
    pub government: String,
    pub tech_level: u32,
    pub unrest: f64,
    pub at_war: bool,
    pub allies: Vec<u64>,
    pub enemies: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarSave {
    pub attacker_id: u64,
    pub defender_id: u64,
    pub start_year: u32,
    pub attacker_exhaustion: f64,
    pub defender_exhaustion: f64,
    pub attacker_casualties: f64,
    pub defender_casualties: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSave {
    pub total_deaths: f64,
    pub total_wars: u32,
    pub total_civilizations: u32,
}

/// Id watermarks, so entities spawned after a load continue numbering
/// above ids that were retired before the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextIdsSave {
    pub tribe: u64,
    pub country: u64,
    pub city: u64,
    pub leader: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub version: u32,
    pub seed: u32,
    pub year: u32,
    pub tech_level: u32,
    pub tribes: Vec<TribeSave>,
    pub countries: Vec<CountrySave>,
    pub stats: StatsSave,
    /// Supplied by the caller at save time; the core never reads a clock.
    pub timestamp: u64,
    #[serde(default)]
    pub global_tension: f64,
    #[serde(default)]
    pub wars: Vec<WarSave>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_ids: Option<NextIdsSave>,
}

/// Capture the simulation into a serializable snapshot.
pub fn snapshot(sim: &Simulation, timestamp: u64) -> SaveState {
    let (next_tribe, next_country, next_city, next_leader) = sim.ids.watermarks();
    SaveState {
        version: SAVE_VERSION,
        seed: sim.world.seed,
        year: sim.year,
        tech_level: sim.tech_level,
        tribes: sim.tribes.iter().map(tribe_to_save).collect(),
        countries: sim.countries.iter().map(country_to_save).collect(),
        stats: StatsSave {
            total_deaths: sim.stats.total_deaths,
            total_wars: sim.stats.total_wars,
            total_civilizations: sim.stats.total_civilizations,
        },
        timestamp,
        global_tension: sim.ai.global_tension,
        wars: sim
            .wars
            .active
            .iter()
            .map(|war| WarSave {
                attacker_id: war.attacker,
                defender_id: war.defender,
                start_year: war.start_year,
                attacker_exhaustion: war.attacker_exhaustion,
                defender_exhaustion: war.defender_exhaustion,
                attacker_casualties: war.attacker_casualties,
                defender_casualties: war.defender_casualties,
            })
            .collect(),
        next_ids: Some(NextIdsSave {
            tribe: next_tribe,
            country: next_country,
            city: next_city,
            leader: next_leader,
        }),
    }
}

pub fn to_json(sim: &Simulation, timestamp: u64) -> Result<String, Error> {
    serde_json::to_string(&snapshot(sim, timestamp))
        .map_err(|e| Error::SaveCorrupt(e.to_string()))
}

pub fn save_to_path(sim: &Simulation, path: &Path, timestamp: u64) -> Result<(), Error> {
    let json = to_json(sim, timestamp)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn from_json(json: &str) -> Result<Simulation, Error> {
    let state: SaveState =
        serde_json::from_str(json).map_err(|e| Error::SaveCorrupt(e.to_string()))?;
    restore(state)
}

pub fn load_from_path(path: &Path) -> Result<Simulation, Error> {
    let json = fs::read_to_string(path)?;
    from_json(&json)
}

/// Rebuild a full simulation from a snapshot, regenerating the world from
/// the seed and validating every invariant on the way in.
pub fn restore(state: SaveState) -> Result<Simulation, Error> {
    if state.version != SAVE_VERSION {
        return Err(Error::SaveCorrupt(format!(
            "unsupported save version {}",
            state.version
        )));
    }

    let world = worldgen::generate(state.seed);
    let mut territory = TerritoryIndex::new();

    let mut tribes = Vec::with_capacity(state.tribes.len());
    for tribe in &state.tribes {
        tribes.push(tribe_from_save(tribe, state.seed)?);
        claim_all(
            &mut territory,
            &world,
            &tribe.territories,
            Owner::Tribe(tribe.id),
        )?;
    }

    let mut countries = Vec::with_capacity(state.countries.len());
    for country in &state.countries {
        countries.push(country_from_save(country)?);
        claim_all(
            &mut territory,
            &world,
            &country.territories,
            Owner::Country(country.id),
        )?;
    }

    // Referential checks: allies, enemies, and wars must point at loaded
    // countries.
    for country in &state.countries {
        for referenced in country.allies.iter().chain(&country.enemies) {
            if !state.countries.iter().any(|c| c.id == *referenced) {
                return Err(Error::SaveCorrupt(format!(
                    "country {} references unknown country {referenced}",
                    country.id
                )));
            }
        }
    }
    let mut wars = Vec::with_capacity(state.wars.len());
    for war in &state.wars {
        for id in [war.attacker_id, war.defender_id] {
            if !state.countries.iter().any(|c| c.id == id) {
                return Err(Error::SaveCorrupt(format!(
                    "war references unknown country {id}"
                )));
            }
        }
        wars.push(War {
            attacker: war.attacker_id,
            defender: war.defender_id,
            start_year: war.start_year,
            attacker_exhaustion: war.attacker_exhaustion,
            defender_exhaustion: war.defender_exhaustion,
            attacker_casualties: war.attacker_casualties,
            defender_casualties: war.defender_casualties,
        });
    }

    let ids = match state.next_ids {
        Some(next) => IdAllocator::resume_above(
            next.tribe.saturating_sub(1),
            next.country.saturating_sub(1),
            next.city.saturating_sub(1),
            next.leader.saturating_sub(1),
        ),
        None => {
            // Older snapshot: continue above every id still present.
            let max_tribe = state.tribes.iter().map(|t| t.id).max().unwrap_or(0);
            let max_country = state.countries.iter().map(|c| c.id).max().unwrap_or(0);
            let max_city = state
                .countries
                .iter()
                .flat_map(|c| c.cities.iter().map(|city| city.id))
                .max()
                .unwrap_or(0);
            let max_leader = state
                .countries
                .iter()
                .map(|c| c.leader.id)
                .chain(
                    state
                        .tribes
                        .iter()
                        .filter_map(|t| t.leader.as_ref().map(|l| l.id)),
                )
                .max()
                .unwrap_or(0);
            IdAllocator::resume_above(max_tribe, max_country, max_city, max_leader)
        }
    };

    let mut sim = Simulation::from_world(world);
    sim.year = state.year;
    sim.tech_level = state.tech_level;
    sim.tribes = tribes;
    sim.countries = countries;
    sim.wars.active = wars;
    sim.ai.global_tension = state.global_tension;
    sim.stats = Stats {
        total_deaths: state.stats.total_deaths,
        total_wars: state.stats.total_wars,
        total_civilizations: state.stats.total_civilizations,
    };
    sim.territory = territory;
    sim.ids = ids;
    Ok(sim)
}

fn claim_all(
    territory: &mut TerritoryIndex,
    world: &crate::model::World,
    tiles: &[PointSave],
    owner: Owner,
) -> Result<(), Error> {
    for point in tiles {
        if point.x >= worldgen::TILE_W as u32 || point.y >= worldgen::TILE_H as u32 {
            return Err(Error::SaveCorrupt(format!(
                "territory ({}, {}) outside the tile grid",
                point.x, point.y
            )));
        }
        if !world.tile(point.x, point.y).claimable() {
            return Err(Error::SaveCorrupt(format!(
                "territory ({}, {}) is not claimable land",
                point.x, point.y
            )));
        }
        if !territory.try_claim((point.x, point.y), owner) {
            return Err(Error::SaveCorrupt(format!(
                "tile ({}, {}) owned twice",
                point.x, point.y
            )));
        }
    }
    Ok(())
}

fn tribe_to_save(tribe: &Tribe) -> TribeSave {
    TribeSave {
        id: tribe.id,
        culture: tribe.culture.clone(),
        color: tribe.color.clone(),
        population: tribe.population,
        age: tribe.age,
        territories: tribe
            .territories
            .iter()
            .map(|&(x, y)| PointSave { x, y })
            .collect(),
        x: tribe.x,
        y: tribe.y,
        tech_level: tribe.tech_level,
        settled: tribe.settled,
        settlement_years: tribe.settlement_years,
        migration_cooldown: tribe.migration_cooldown,
        leader: Some(leader_to_save(&tribe.leader)),
    }
}

fn tribe_from_save(save: &TribeSave, seed: u32) -> Result<Tribe, Error> {
    if save.population < 0.0 {
        return Err(Error::SaveCorrupt(format!(
            "tribe {} has negative population",
            save.id
        )));
    }
    let leader = match &save.leader {
        Some(leader) => leader_from_save(leader),
        None => {
            // Pre-extension snapshot: synthesize a deterministic leader.
            let mut rng = SimRng::new(derive_seed(seed, "leader", save.id as u32));
            Leader::new(
                save.id,
                format!("Elder of the {}", save.culture),
                rng.int(25, 45) as u32,
                Traits::sample(&mut rng),
            )
        }
    };
    Ok(Tribe {
        id: save.id,
        culture: save.culture.clone(),
        color: save.color.clone(),
        x: save.x,
        y: save.y,
        population: save.population,
        age: save.age,
        tech_level: save.tech_level,
        settled: save.settled,
        settlement_years: save.settlement_years,
        migration_cooldown: save.migration_cooldown,
        territories: save.territories.iter().map(|p| (p.x, p.y)).collect(),
        leader,
    })
}

fn country_to_save(country: &Country) -> CountrySave {
    CountrySave {
        id: country.id,
        name: country.name.clone(),
        color: country.color.clone(),
        population: country.population,
        age: country.age,
        territories: country
            .territories
            .iter()
            .map(|&(x, y)| PointSave { x, y })
            .collect(),
        x: country.capital.0,
        y: country.capital.1,
        capital_x: country.capital.0,
        capital_y: country.capital.1,
        cities: country
            .cities
            .iter()
            .map(|city| CitySave {
                id: city.id,
                name: city.name.clone(),
                x: city.x,
                y: city.y,
                population: city.population,
                is_capital: city.is_capital,
            })
            .collect(),
        leader: leader_to_save(&country.leader),
        government: country.government.clone(),
        tech_level: country.tech_level,
        unrest: country.unrest,
        at_war: country.at_war,
        allies: country.allies.clone(),
        enemies: country.enemies.clone(),
    }
}

fn country_from_save(save: &CountrySave) -> Result<Country, Error> {
    if save.population < 0.0 {
        return Err(Error::SaveCorrupt(format!(
            "country {} has negative population",
            save.id
        )));
    }
    if !(0.0..=100.0).contains(&save.unrest) {
        return Err(Error::SaveCorrupt(format!(
            "country {} unrest {} out of range",
            save.id, save.unrest
        )));
    }
    Ok(Country {
        id: save.id,
        name: save.name.clone(),
        color: save.color.clone(),
        capital: (save.capital_x, save.capital_y),
        population: save.population,
        age: save.age,
        territories: save.territories.iter().map(|p| (p.x, p.y)).collect(),
        cities: save
            .cities
            .iter()
            .map(|city| City {
                id: city.id,
                name: city.name.clone(),
                x: city.x,
                y: city.y,
                population: city.population,
                is_capital: city.is_capital,
            })
            .collect(),
        government: save.government.clone(),
        tech_level: save.tech_level,
        unrest: save.unrest,
        at_war: save.at_war,
        allies: save.allies.clone(),
        enemies: save.enemies.clone(),
        leader: leader_from_save(&save.leader),
    })
}

fn leader_to_save(leader: &Leader) -> LeaderSave {
    LeaderSave {
        id: leader.id,
        name: leader.name.clone(),
        age: leader.age,
        years_in_power: leader.years_in_power,
        traits: leader.traits,
    }
}

fn leader_from_save(save: &LeaderSave) -> Leader {
    Leader {
        id: save.id,
        name: save.name.clone(),
        age: save.age,
        years_in_power: save.years_in_power,
        traits: save.traits,
    }
}
