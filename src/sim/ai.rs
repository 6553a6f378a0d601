use std::collections::BTreeSet;

use crate::model::{City, Country, Event, EventKind, RiverPresence};
use crate::worldgen::tile_neighbors8;

use super::countries::bordering_countries;
use super::territory::Owner;
use super::wars::WarManager;
use super::{names, TickCtx};

const MAX_ALLIES: usize = 3;
const TERRITORY_SOFT_CAP: usize = 50;
const MIN_WAR_POPULATION: f64 = 500.0;
const TENSION_PER_WAR: f64 = 0.1;
const TENSION_DECAY: f64 = 0.01;
const TENSION_ALARM: f64 = 0.7;
const STABILITY_RELIEF: f64 = 10.0;

/// The five things a country can decide to do on a policy turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyAction {
    Expand,
    BuildCity,
    SeekAlliance,
    DeclareWar,
    ImproveStability,
}

const ACTIONS: [PolicyAction; 5] = [
    PolicyAction::Expand,
    PolicyAction::BuildCity,
    PolicyAction::SeekAlliance,
    PolicyAction::DeclareWar,
    PolicyAction::ImproveStability,
];

/// Per-country decision policy plus the shared diplomatic temperature.
///
/// `global_tension` rises with every AI-declared war and decays a little
/// each year, biasing later war rolls upward — wars breed wars.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryAi {
    pub global_tension: f64,
}

impl CountryAi {
    pub fn new() -> Self {
        Self {
            global_tension: 0.0,
        }
    }

    /// One policy turn for `countries[i]`: weight the five actions by
    /// circumstance and leader temperament, then roll.
    pub(crate) fn act(
        &mut self,
        i: usize,
        countries: &mut Vec<Country>,
        wars: &mut WarManager,
        ctx: &mut TickCtx,
    ) {
        let frontier = frontier_tiles(&countries[i], ctx);
        let neighbors = bordering_countries(i, countries, ctx.territory);
        let approachable: Vec<usize> = neighbors
            .iter()
            .copied()
            .filter(|&j| {
                let other_id = countries[j].id;
                !countries[i].allies.contains(&other_id)
                    && !wars
                        .active
                        .iter()
                        .any(|w| w.involves(countries[i].id) && w.involves(other_id))
            })
            .collect();

        let weights = {
            let country = &countries[i];
            let traits = &country.leader.traits;
            let expand_base = if country.territories.len() > TERRITORY_SOFT_CAP {
                0.0
            } else if !frontier.is_empty() {
                0.5
            } else {
                0.1
            };
            let w_expand = expand_base * (1.0 + traits.ambition);
            let w_city = if country.cities.len() < country.territories.len() / 10 {
                0.2
            } else {
                0.0
            };
            let alliance_base = if country.allies.len() > MAX_ALLIES {
                0.0
            } else if !approachable.is_empty() {
                0.15
            } else {
                0.05
            };
            let w_alliance = alliance_base * (1.0 + traits.diplomacy);
            let weaker = neighbors
                .iter()
                .filter(|&&j| countries[j].population < country.population)
                .count();
            let w_war = if country.at_war
                || country.population < MIN_WAR_POPULATION
                || neighbors.is_empty()
            {
                0.0
            } else {
                (0.1 + 0.3 * self.global_tension + 0.2 * weaker as f64)
                    * (1.0 + traits.aggression)
                    * (1.0 - traits.caution)
            };
            let w_stability = if country.unrest > 50.0 { 0.4 } else { 0.05 };
            [w_expand, w_city, w_alliance, w_war, w_stability]
        };

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return;
        }
        let mut roll = ctx.rng.range(0.0, total);
        let mut action = *ACTIONS.last().unwrap();
        for (weight, candidate) in weights.iter().zip(ACTIONS) {
            if roll < *weight {
                action = candidate;
                break;
            }
            roll -= weight;
        }

        match action {
            PolicyAction::Expand => self.expand(i, countries, frontier, ctx),
            PolicyAction::BuildCity => self.build_city(i, countries, ctx),
            PolicyAction::SeekAlliance => self.seek_alliance(i, approachable, countries, ctx),
            PolicyAction::DeclareWar => self.declare_war(i, neighbors, countries, wars, ctx),
            PolicyAction::ImproveStability => {
                countries[i].unrest = (countries[i].unrest - STABILITY_RELIEF).max(0.0);
            }
        }
    }

    /// Tick phase 4: the world calms down a little every year.
    pub(crate) fn decay(&mut self) {
        self.global_tension = (self.global_tension - TENSION_DECAY).max(0.0);
    }

    fn expand(
        &mut self,
        i: usize,
        countries: &mut [Country],
        frontier: Vec<(u32, u32)>,
        ctx: &mut TickCtx,
    ) {
        if frontier.is_empty() {
            return;
        }
        let tile = *ctx.rng.choice(&frontier);
        ctx.territory.claim(tile, Owner::Country(countries[i].id));
        countries[i].territories.push(tile);
    }

    fn build_city(&mut self, i: usize, countries: &mut [Country], ctx: &mut TickCtx) {
        if countries[i].territories.is_empty() {
            return;
        }
        let site = countries[i]
            .territories
            .iter()
            .copied()
            .find(|&(x, y)| {
                let tile = ctx.world.tile(x, y);
                tile.river != RiverPresence::None || tile.fertility > 0.5
            })
            .unwrap_or_else(|| *ctx.rng.choice(&countries[i].territories));

        let city = City {
            id: ctx.ids.city(),
            name: names::city_name(ctx.rng),
            x: site.0,
            y: site.1,
            population: ctx.rng.int(50, 200) as f64,
            is_capital: false,
        };
        ctx.events.push(Event::located(
            ctx.year,
            EventKind::CityFounded,
            format!("{} founds the city of {}", countries[i].name, city.name),
            site.0,
            site.1,
        ));
        countries[i].cities.push(city);
    }

    fn seek_alliance(
        &mut self,
        i: usize,
        approachable: Vec<usize>,
        countries: &mut [Country],
        ctx: &mut TickCtx,
    ) {
        if approachable.is_empty() {
            return;
        }
        let j = *ctx.rng.choice(&approachable);
        let (id_a, id_b) = (countries[i].id, countries[j].id);
        if !countries[i].allies.contains(&id_b) {
            countries[i].allies.push(id_b);
        }
        if !countries[j].allies.contains(&id_a) {
            countries[j].allies.push(id_a);
        }
        ctx.events.push(Event::located(
            ctx.year,
            EventKind::AllianceFormed,
            format!(
                "{} and {} swear an alliance",
                countries[i].name, countries[j].name
            ),
            countries[i].capital.0,
            countries[i].capital.1,
        ));
    }

    fn declare_war(
        &mut self,
        i: usize,
        neighbors: Vec<usize>,
        countries: &mut [Country],
        wars: &mut WarManager,
        ctx: &mut TickCtx,
    ) {
        if neighbors.is_empty() {
            return;
        }
        let target = *ctx.rng.choice(&neighbors);
        let (attacker, defender) = (countries[i].id, countries[target].id);
        wars.declare(countries, attacker, defender, ctx);

        let before = self.global_tension;
        self.global_tension = (self.global_tension + TENSION_PER_WAR).min(1.0);
        if before < TENSION_ALARM && self.global_tension >= TENSION_ALARM {
            ctx.events.push(Event::new(
                ctx.year,
                EventKind::TensionRising,
                "Tensions rise across the known world".to_string(),
            ));
        }
    }
}

impl Default for CountryAi {
    fn default() -> Self {
        Self::new()
    }
}

/// Unclaimed habitable tiles adjacent to the country's territory.
fn frontier_tiles(country: &Country, ctx: &TickCtx) -> Vec<(u32, u32)> {
    let mut frontier: BTreeSet<(u32, u32)> = BTreeSet::new();
    for &(tx, ty) in &country.territories {
        for (nx, ny) in tile_neighbors8(tx, ty) {
            if ctx.world.tile(nx, ny).claimable() && ctx.territory.is_free((nx, ny)) {
                frontier.insert((nx, ny));
            }
        }
    }
    frontier.into_iter().collect()
}
