use std::collections::BTreeSet;

use crate::model::{
    City, Country, Event, EventKind, Leader, Tribe, MIN_COUNTRY_POPULATION,
};
use crate::worldgen::tile_neighbors8;

use super::ai::CountryAi;
use super::territory::Owner;
use super::wars::WarManager;
use super::{names, TerritoryIndex, TickCtx};

const TECH_INTERVAL: u32 = 50;
const TECH_CHANCE: f64 = 0.4;

const LEADER_OLD_AGE: u32 = 65;
const LEADER_DEATH_CHANCE: f64 = 0.05;
const REVOLUTION_UNREST: f64 = 70.0;

const EXPANSION_INTERVAL: u32 = 15;
const EXPANSION_TILE_CHANCE: f64 = 0.3;

const WAR_MIN_AGE: u32 = 30;
const WAR_CHANCE: f64 = 0.03;
const WAR_MIN_AGGRESSION: f64 = 0.6;

const PEACETIME_UNREST_DECAY: f64 = 0.5;

const AI_INTERVAL: u32 = 5;

/// Birth of a country from a tribe: same people, same land, a capital
/// city, and a confederation government.
pub(crate) fn found_country(tribe: Tribe, ctx: &mut TickCtx) -> Country {
    let id = ctx.ids.country();
    let name = format!("{} Civilization", tribe.culture);
    let capital = City {
        id: ctx.ids.city(),
        name: names::city_name(ctx.rng),
        x: tribe.x,
        y: tribe.y,
        population: ctx.rng.int(50, 200) as f64,
        is_capital: true,
    };
    for &tile in &tribe.territories {
        ctx.territory
            .transfer(tile, Owner::Tribe(tribe.id), Owner::Country(id));
    }
    ctx.stats.total_civilizations += 1;
    ctx.events.push(Event::located(
        ctx.year,
        EventKind::CivilizationFormed,
        format!("{} rises under {}", name, tribe.leader.name),
        tribe.x,
        tribe.y,
    ));

    Country {
        id,
        name,
        color: tribe.color,
        capital: (tribe.x, tribe.y),
        population: tribe.population,
        age: 0,
        territories: tribe.territories,
        cities: vec![capital],
        government: "tribal_confederation".to_string(),
        tech_level: tribe.tech_level,
        unrest: 0.0,
        at_war: false,
        allies: Vec::new(),
        enemies: Vec::new(),
        leader: tribe.leader,
    }
}

/// Tick phase 2: every country in reverse index order; collapse removes
/// in place at the end of each country's turn.
pub(crate) fn tick_countries(
    countries: &mut Vec<Country>,
    wars: &mut WarManager,
    ai: &mut CountryAi,
    ctx: &mut TickCtx,
) {
    let mut i = countries.len();
    while i > 0 {
        i -= 1;

        {
            let country = &mut countries[i];
            country.age += 1;
            country.leader.age += 1;
            country.leader.years_in_power += 1;

            // Population is carried by the land, not tracked incrementally.
            let tech_bonus = 1.0 + 0.1 * country.tech_level as f64;
            country.population = country
                .territories
                .iter()
                .map(|&(x, y)| {
                    let tile = ctx.world.tile(x, y);
                    (tile.population_capacity as f64
                        * 1000.0
                        * 0.03
                        * tile.food_potential as f64
                        * tech_bonus)
                        .floor()
                })
                .sum();
        }

        if ctx.year % TECH_INTERVAL == 0 && ctx.rng.chance(TECH_CHANCE) {
            let country = &mut countries[i];
            country.tech_level += 1;
            ctx.events.push(Event::located(
                ctx.year,
                EventKind::TechAdvancement,
                format!(
                    "{} advances to technology level {}",
                    country.name, country.tech_level
                ),
                country.capital.0,
                country.capital.1,
            ));
        }

        if countries[i].leader.age > LEADER_OLD_AGE && ctx.rng.chance(LEADER_DEATH_CHANCE) {
            succeed_leader(&mut countries[i], ctx);
        }

        if ctx.year % EXPANSION_INTERVAL == 0 {
            expand(&mut countries[i], ctx);
        }

        maybe_declare_war(i, countries, wars, ctx);

        if !countries[i].at_war {
            countries[i].unrest = (countries[i].unrest - PEACETIME_UNREST_DECAY).max(0.0);
        }

        if ctx.year % AI_INTERVAL == 0 {
            ai.act(i, countries, wars, ctx);
        }

        // Collapse check, end of this country's turn.
        if countries[i].population < MIN_COUNTRY_POPULATION || countries[i].territories.is_empty()
        {
            collapse(i, countries, ctx);
        }
    }
}

fn succeed_leader(country: &mut Country, ctx: &mut TickCtx) {
    ctx.events.push(Event::located(
        ctx.year,
        EventKind::LeaderDied,
        format!(
            "{} of {} dies after {} years in power",
            country.leader.name, country.name, country.leader.years_in_power
        ),
        country.capital.0,
        country.capital.1,
    ));

    let name = names::leader_name(ctx.rng);
    let age = ctx.rng.int(25, 45) as u32;
    let id = ctx.ids.leader();
    if country.unrest > REVOLUTION_UNREST {
        country.leader = Leader::revolutionary(id, name, age, ctx.rng);
        ctx.events.push(Event::located(
            ctx.year,
            EventKind::IdeologicalShift,
            format!("Revolution sweeps {}; a new order takes power", country.name),
            country.capital.0,
            country.capital.1,
        ));
    } else {
        country.leader = country.leader.heir_of(id, name, age, ctx.rng);
    }
}

/// Countries push their borders every 15 years; each frontier tile is
/// taken independently.
fn expand(country: &mut Country, ctx: &mut TickCtx) {
    let mut frontier: BTreeSet<(u32, u32)> = BTreeSet::new();
    for &(tx, ty) in &country.territories {
        for (nx, ny) in tile_neighbors8(tx, ty) {
            if ctx.world.tile(nx, ny).claimable() && ctx.territory.is_free((nx, ny)) {
                frontier.insert((nx, ny));
            }
        }
    }
    let mut frontier: Vec<(u32, u32)> = frontier.into_iter().collect();
    ctx.rng.shuffle(&mut frontier);
    for tile in frontier {
        if ctx.rng.chance(EXPANSION_TILE_CHANCE) {
            ctx.territory.claim(tile, Owner::Country(country.id));
            country.territories.push(tile);
        }
    }
}

fn maybe_declare_war(
    i: usize,
    countries: &mut [Country],
    wars: &mut WarManager,
    ctx: &mut TickCtx,
) {
    if countries[i].age <= WAR_MIN_AGE || countries[i].at_war || !ctx.rng.chance(WAR_CHANCE) {
        return;
    }
    let neighbors = bordering_countries(i, countries, ctx.territory);
    if neighbors.is_empty() {
        return;
    }
    let target = *ctx.rng.choice(&neighbors);
    let own_size = countries[i].territories.len() as f64;
    let target_size = countries[target].territories.len() as f64;
    if countries[i].leader.traits.aggression > WAR_MIN_AGGRESSION || own_size < 0.5 * target_size
    {
        let (attacker, defender) = (countries[i].id, countries[target].id);
        wars.declare(countries, attacker, defender, ctx);
    }
}

/// Indices of countries holding any tile 8-adjacent to ours, in id order.
pub(crate) fn bordering_countries(
    i: usize,
    countries: &[Country],
    territory: &TerritoryIndex,
) -> Vec<usize> {
    let own_id = countries[i].id;
    let mut ids: BTreeSet<u64> = BTreeSet::new();
    for &(tx, ty) in &countries[i].territories {
        for neighbor in tile_neighbors8(tx, ty) {
            if let Some(Owner::Country(id)) = territory.owner_of(neighbor) {
                if id != own_id {
                    ids.insert(id);
                }
            }
        }
    }
    ids.iter()
        .filter_map(|id| countries.iter().position(|c| c.id == *id))
        .collect()
}

fn collapse(i: usize, countries: &mut Vec<Country>, ctx: &mut TickCtx) {
    let country = &countries[i];
    for &tile in &country.territories {
        ctx.territory.release(tile, Owner::Country(country.id));
    }
    ctx.events.push(Event::located(
        ctx.year,
        EventKind::Collapse,
        format!("{} collapses into history", country.name),
        country.capital.0,
        country.capital.1,
    ));
    countries.remove(i);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_country, test_tribe, TickHarness};

    #[test]
    fn founding_re_owns_the_tribe_lands() {
        let mut harness = TickHarness::new(80);
        let mut tribe = test_tribe(5, 30, 30, 450.0, true);
        tribe.territories = vec![(30, 30), (31, 30)];
        harness.territory.claim((30, 30), Owner::Tribe(5));
        harness.territory.claim((31, 30), Owner::Tribe(5));

        let mut ctx = harness.ctx();
        let country = found_country(tribe, &mut ctx);
        drop(ctx);

        assert_eq!(country.name, "Culture5 Civilization");
        assert_eq!(country.government, "tribal_confederation");
        assert_eq!(country.capital, (30, 30));
        assert_eq!(country.population, 450.0);
        assert_eq!(country.unrest, 0.0);
        assert!(country.allies.is_empty() && country.enemies.is_empty());

        let capital = country.capital_city().unwrap();
        assert!(capital.is_capital);
        assert!((50.0..=200.0).contains(&capital.population));

        for &tile in &country.territories {
            assert_eq!(
                harness.territory.owner_of(tile),
                Some(Owner::Country(country.id))
            );
        }
        assert_eq!(harness.stats.total_civilizations, 1);
        assert_eq!(harness.events.count_of(EventKind::CivilizationFormed), 1);
    }

    #[test]
    fn calm_succession_installs_a_drifted_heir() {
        let mut harness = TickHarness::new(200);
        let mut country = test_country(1, vec![(20, 20)], 400.0);
        country.leader.age = 70;
        let old_traits = country.leader.traits;

        let mut ctx = harness.ctx();
        succeed_leader(&mut country, &mut ctx);
        drop(ctx);

        assert_eq!(country.leader.years_in_power, 0);
        assert!((25..=45).contains(&country.leader.age));
        for (old, new) in [
            (old_traits.aggression, country.leader.traits.aggression),
            (old_traits.caution, country.leader.traits.caution),
            (old_traits.diplomacy, country.leader.traits.diplomacy),
            (old_traits.ambition, country.leader.traits.ambition),
            (old_traits.freedom, country.leader.traits.freedom),
            (old_traits.rationality, country.leader.traits.rationality),
        ] {
            assert!((old - new).abs() <= 0.15 + 1e-12);
        }
        assert_eq!(harness.events.count_of(EventKind::LeaderDied), 1);
        assert_eq!(harness.events.count_of(EventKind::IdeologicalShift), 0);
    }

    #[test]
    fn unrest_makes_succession_revolutionary() {
        let mut harness = TickHarness::new(200);
        let mut country = test_country(1, vec![(20, 20)], 400.0);
        country.leader.age = 70;
        country.unrest = 85.0;

        let mut ctx = harness.ctx();
        succeed_leader(&mut country, &mut ctx);
        drop(ctx);

        assert_eq!(country.leader.years_in_power, 0);
        assert_eq!(harness.events.count_of(EventKind::LeaderDied), 1);
        assert_eq!(harness.events.count_of(EventKind::IdeologicalShift), 1);
    }

    #[test]
    fn expansion_never_touches_owned_tiles() {
        let mut harness = TickHarness::new(15);
        let mut country = test_country(1, vec![(40, 40)], 400.0);
        harness.territory.claim((40, 40), Owner::Country(1));
        // Wall the country in completely.
        for neighbor in tile_neighbors8(40, 40) {
            harness.territory.claim(neighbor, Owner::Country(99));
        }

        let mut ctx = harness.ctx();
        expand(&mut country, &mut ctx);
        drop(ctx);

        assert_eq!(country.territories, vec![(40, 40)]);
    }

    #[test]
    fn expansion_grows_into_open_land() {
        let mut harness = TickHarness::new(15);
        let mut country = test_country(1, vec![(40, 40)], 400.0);
        harness.territory.claim((40, 40), Owner::Country(1));

        let mut ctx = harness.ctx();
        // Several rounds; each frontier tile is an independent roll.
        for _ in 0..5 {
            expand(&mut country, &mut ctx);
        }
        drop(ctx);

        assert!(country.territories.len() > 1, "no expansion in five rounds");
        for &tile in &country.territories {
            assert_eq!(harness.territory.owner_of(tile), Some(Owner::Country(1)));
        }
    }

    #[test]
    fn collapse_releases_every_tile() {
        let mut harness = TickHarness::new(300);
        let mut countries = vec![test_country(1, vec![(20, 20), (21, 20)], 30.0)];
        harness.territory.claim((20, 20), Owner::Country(1));
        harness.territory.claim((21, 20), Owner::Country(1));

        let mut ctx = harness.ctx();
        collapse(0, &mut countries, &mut ctx);
        drop(ctx);

        assert!(countries.is_empty());
        assert!(harness.territory.is_empty());
        assert_eq!(harness.events.count_of(EventKind::Collapse), 1);
    }

    #[test]
    fn neighbors_are_found_through_shared_borders() {
        let mut harness = TickHarness::new(10);
        let countries = vec![
            test_country(1, vec![(50, 50)], 400.0),
            test_country(2, vec![(51, 50)], 400.0),
            test_country(3, vec![(90, 90)], 400.0),
        ];
        harness.territory.claim((50, 50), Owner::Country(1));
        harness.territory.claim((51, 50), Owner::Country(2));
        harness.territory.claim((90, 90), Owner::Country(3));

        assert_eq!(bordering_countries(0, &countries, &harness.territory), vec![1]);
        assert_eq!(bordering_countries(1, &countries, &harness.territory), vec![0]);
        assert!(bordering_countries(2, &countries, &harness.territory).is_empty());
    }
}
