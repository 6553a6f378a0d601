use crate::model::{Country, Event, EventKind, War};
use crate::worldgen::tile_neighbors8;

use super::territory::Owner;
use super::TickCtx;

const ATTACKER_EXHAUSTION_PER_TICK: f64 = 0.05;
const DEFENDER_EXHAUSTION_PER_TICK: f64 = 0.03;
const EXHAUSTION_LIMIT: f64 = 1.0;

const CASUALTY_RATE_MIN: f64 = 0.001;
const CASUALTY_RATE_MAX: f64 = 0.005;

const ANNEXATION_CHANCE: f64 = 0.3;

const DEFENDER_COLLAPSE_POPULATION: f64 = 100.0;
const DEFENDER_COLLAPSE_TERRITORIES: usize = 2;
const ATTACKER_COLLAPSE_POPULATION: f64 = 200.0;

/// War keeps both capitals restless.
const ATTACKER_WAR_UNREST: f64 = 2.0;
const DEFENDER_WAR_UNREST: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Victor {
    Attacker,
    Defender,
}

/// Owns the active-war list and advances every war one step per tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarManager {
    pub active: Vec<War>,
}

impl WarManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a war between two living countries. A duplicate declaration
    /// between the same pair is ignored.
    pub(crate) fn declare(
        &mut self,
        countries: &mut [Country],
        attacker_id: u64,
        defender_id: u64,
        ctx: &mut TickCtx,
    ) {
        if attacker_id == defender_id {
            return;
        }
        if self
            .active
            .iter()
            .any(|war| war.involves(attacker_id) && war.involves(defender_id))
        {
            return;
        }
        let Some(attacker) = countries.iter().position(|c| c.id == attacker_id) else {
            return;
        };
        let Some(defender) = countries.iter().position(|c| c.id == defender_id) else {
            return;
        };

        countries[attacker].at_war = true;
        countries[defender].at_war = true;
        if !countries[attacker].enemies.contains(&defender_id) {
            countries[attacker].enemies.push(defender_id);
        }
        if !countries[defender].enemies.contains(&attacker_id) {
            countries[defender].enemies.push(attacker_id);
        }

        self.active.push(War::new(attacker_id, defender_id, ctx.year));
        ctx.stats.total_wars += 1;
        ctx.events.push(Event::located(
            ctx.year,
            EventKind::WarDeclared,
            format!(
                "{} declares war on {}",
                countries[attacker].name, countries[defender].name
            ),
            countries[attacker].capital.0,
            countries[attacker].capital.1,
        ));
    }

    /// Tick phase 3: one battle round per active war, reverse index order.
    pub(crate) fn tick(&mut self, countries: &mut Vec<Country>, ctx: &mut TickCtx) {
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let (attacker_id, defender_id) = {
                let war = &self.active[i];
                (war.attacker, war.defender)
            };
            let attacker = countries.iter().position(|c| c.id == attacker_id);
            let defender = countries.iter().position(|c| c.id == defender_id);

            let (Some(a), Some(d)) = (attacker, defender) else {
                // One side collapsed out from under the war.
                self.dissolve(i, attacker.or(defender), countries, ctx);
                continue;
            };

            self.battle_round(i, a, d, countries, ctx);
        }
    }

    fn battle_round(
        &mut self,
        war_index: usize,
        a: usize,
        d: usize,
        countries: &mut Vec<Country>,
        ctx: &mut TickCtx,
    ) {
        let attacker_strength = strength(&countries[a], false);
        let defender_strength = strength(&countries[d], true);
        let advantage = attacker_strength / (attacker_strength + defender_strength);

        // Three outcomes: attacker win, defender win, stalemate. Only an
        // attacker win changes the map; the rest of the round is attrition.
        let roll = ctx.rng.next();
        let attacker_won = roll < 0.6 * advantage;

        // Attrition on both sides regardless of the day's outcome.
        let attacker_losses = countries[a].population * ctx.rng.range(CASUALTY_RATE_MIN, CASUALTY_RATE_MAX);
        let defender_losses = countries[d].population * ctx.rng.range(CASUALTY_RATE_MIN, CASUALTY_RATE_MAX);
        countries[a].population = (countries[a].population - attacker_losses).max(0.0);
        countries[d].population = (countries[d].population - defender_losses).max(0.0);
        ctx.stats.total_deaths += attacker_losses + defender_losses;
        {
            let war = &mut self.active[war_index];
            war.attacker_casualties += attacker_losses;
            war.defender_casualties += defender_losses;
        }

        if attacker_won {
            self.try_annex(a, d, countries, ctx);
        }

        {
            let war = &mut self.active[war_index];
            war.attacker_exhaustion += ATTACKER_EXHAUSTION_PER_TICK;
            war.defender_exhaustion += DEFENDER_EXHAUSTION_PER_TICK;
        }
        countries[a].unrest = (countries[a].unrest + ATTACKER_WAR_UNREST).min(100.0);
        countries[d].unrest = (countries[d].unrest + DEFENDER_WAR_UNREST).min(100.0);

        // Termination conditions, checked in fixed order.
        let war = &self.active[war_index];
        let victor = if countries[d].population < DEFENDER_COLLAPSE_POPULATION
            || countries[d].territories.len() < DEFENDER_COLLAPSE_TERRITORIES
        {
            Some(Victor::Attacker)
        } else if countries[a].population < ATTACKER_COLLAPSE_POPULATION {
            Some(Victor::Defender)
        } else if war.attacker_exhaustion > EXHAUSTION_LIMIT
            || war.defender_exhaustion > EXHAUSTION_LIMIT
        {
            Some(if war.attacker_exhaustion < war.defender_exhaustion {
                Victor::Attacker
            } else {
                Victor::Defender
            })
        } else {
            None
        };

        if let Some(victor) = victor {
            self.conclude(war_index, victor, a, d, countries, ctx);
        }
    }

    /// One conquered tile per won battle: a defender tile touching
    /// attacker land, chosen uniformly, taken with a fixed chance.
    fn try_annex(&mut self, a: usize, d: usize, countries: &mut [Country], ctx: &mut TickCtx) {
        let attacker_id = countries[a].id;
        let border: Vec<(u32, u32)> = countries[d]
            .territories
            .iter()
            .filter(|&&(x, y)| {
                tile_neighbors8(x, y)
                    .into_iter()
                    .any(|n| ctx.territory.owner_of(n) == Some(Owner::Country(attacker_id)))
            })
            .copied()
            .collect();
        if border.is_empty() || !ctx.rng.chance(ANNEXATION_CHANCE) {
            return;
        }
        let tile = *ctx.rng.choice(&border);
        transfer_tile(tile, d, a, countries, ctx);
        ctx.events.push(Event::located(
            ctx.year,
            EventKind::TerritoryConquered,
            format!(
                "{} seizes a border region from {}",
                countries[a].name, countries[d].name
            ),
            tile.0,
            tile.1,
        ));
    }

    fn conclude(
        &mut self,
        war_index: usize,
        victor: Victor,
        a: usize,
        d: usize,
        countries: &mut [Country],
        ctx: &mut TickCtx,
    ) {
        if victor == Victor::Attacker {
            let spoils =
                3_usize.min((0.3 * countries[d].territories.len() as f64).floor() as usize);
            for _ in 0..spoils {
                if countries[d].territories.is_empty() {
                    break;
                }
                let tile = countries[d].territories[0];
                transfer_tile(tile, d, a, countries, ctx);
            }
        }

        let war = self.active.remove(war_index);
        let (winner, loser) = match victor {
            Victor::Attacker => (a, d),
            Victor::Defender => (d, a),
        };
        ctx.events.push(Event::located(
            ctx.year,
            EventKind::WarEnded,
            format!(
                "{} prevails over {} after {} years of war",
                countries[winner].name,
                countries[loser].name,
                ctx.year - war.start_year,
            ),
            countries[winner].capital.0,
            countries[winner].capital.1,
        ));

        countries[a].at_war = self.active.iter().any(|w| w.involves(war.attacker));
        countries[d].at_war = self.active.iter().any(|w| w.involves(war.defender));
    }

    /// A war whose participant no longer exists ends by default.
    fn dissolve(
        &mut self,
        war_index: usize,
        survivor: Option<usize>,
        countries: &mut [Country],
        ctx: &mut TickCtx,
    ) {
        self.active.remove(war_index);
        if let Some(s) = survivor {
            let survivor_id = countries[s].id;
            countries[s].at_war = self.active.iter().any(|w| w.involves(survivor_id));
            ctx.events.push(Event::located(
                ctx.year,
                EventKind::WarEnded,
                format!(
                    "{} wins its war by default; the enemy is no more",
                    countries[s].name
                ),
                countries[s].capital.0,
                countries[s].capital.1,
            ));
        } else {
            ctx.events.push(Event::new(
                ctx.year,
                EventKind::WarEnded,
                "A war ends with both sides gone".to_string(),
            ));
        }
    }
}

/// Effective military strength. Defenders fight harder, cautious leaders
/// defend better, aggressive leaders attack better.
fn strength(country: &Country, is_defender: bool) -> f64 {
    let traits = &country.leader.traits;
    let posture = if is_defender {
        1.2 * (1.0 + 0.2 * traits.caution)
    } else {
        1.0 + 0.2 * traits.aggression
    };
    (country.population
        * (1.0 + 0.1 * country.tech_level as f64)
        * (1.0 - country.unrest / 100.0)
        * posture)
        .max(1.0)
}

fn transfer_tile(
    tile: (u32, u32),
    from: usize,
    to: usize,
    countries: &mut [Country],
    ctx: &mut TickCtx,
) {
    let from_id = countries[from].id;
    let to_id = countries[to].id;
    ctx.territory
        .transfer(tile, Owner::Country(from_id), Owner::Country(to_id));
    let position = countries[from]
        .territories
        .iter()
        .position(|&t| t == tile)
        .expect("transferred tile not in source territory list");
    countries[from].territories.remove(position);
    countries[to].territories.push(tile);
}
