use std::collections::BTreeSet;

use crate::model::{Biome, Country, Event, EventKind, RiverPresence, Tribe, MIN_TRIBE_POPULATION};
use crate::worldgen::{tile_neighbors8, wrap_x, TILE_H, TILE_W};

use super::countries::found_country;
use super::territory::Owner;
use super::{names, TickCtx};

/// Hard cap on living tribes, to bound memory under runaway splitting.
pub const MAX_TRIBES: usize = 600;

const GROWTH_RATE: f64 = 0.02;
const DISASTER_CHANCE: f64 = 0.01;
const DISASTER_TOLL: f64 = 0.10;

const EXPANSION_INTERVAL: u32 = 5;
const EXPANSION_MIN_POPULATION: f64 = 150.0;

const CONVERSION_MIN_TERRITORIES: usize = 5;
const CONVERSION_MIN_POPULATION: f64 = 400.0;
const CONVERSION_MIN_AGE: u32 = 50;

const SPLIT_MIN_POPULATION: f64 = 500.0;
const SPLIT_CHANCE: f64 = 0.05;

const CONFLICT_CHANCE: f64 = 0.02;
const ABSORB_POPULATION_RATIO: f64 = 1.3;
const ABSORB_RANGE: i64 = 2;

const MIGRATION_RADIUS: i64 = 2;

/// Tick phase 1: every tribe, visited in reverse index order so in-place
/// removals are safe and splits (which append) are not visited until next
/// year.
pub(crate) fn tick_tribes(
    tribes: &mut Vec<Tribe>,
    countries: &mut Vec<Country>,
    ctx: &mut TickCtx,
) {
    let mut i = tribes.len();
    while i > 0 {
        i -= 1;

        // Growth, disease, starvation death.
        {
            let tribe = &mut tribes[i];
            tribe.age += 1;
            let tile = ctx.world.tile(tribe.x, tribe.y);
            tribe.population += tribe.population * GROWTH_RATE * tile.food_potential as f64;
            if ctx.rng.chance(DISASTER_CHANCE) {
                let losses = tribe.population * DISASTER_TOLL;
                tribe.population -= losses;
                ctx.stats.total_deaths += losses;
                ctx.events.push(Event::located(
                    ctx.year,
                    EventKind::PandemicStarted,
                    format!("Disease and famine ravage the {} tribe", tribe.culture),
                    tribe.x,
                    tribe.y,
                ));
            }
        }
        if tribes[i].population < MIN_TRIBE_POPULATION {
            remove_dead(i, tribes, ctx);
            continue;
        }

        if !tribes[i].settled {
            if tribes[i].migration_cooldown > 0 {
                tribes[i].migration_cooldown -= 1;
                tribes[i].settlement_years += 1;
                if should_settle(&tribes[i], ctx) {
                    settle(i, tribes, ctx);
                    let ambition = tribes[i].leader.traits.ambition;
                    if ambition > 0.7 && ctx.rng.chance(0.4) {
                        let tribe = tribes.remove(i);
                        countries.push(found_country(tribe, ctx));
                        continue;
                    }
                }
            } else {
                migrate(i, tribes, ctx);
            }
        } else {
            if ctx.year % EXPANSION_INTERVAL == 0
                && tribes[i].population > EXPANSION_MIN_POPULATION
            {
                let tile = ctx.world.tile(tribes[i].x, tribes[i].y);
                let resource_score =
                    ((tile.food_potential + tile.wood + tile.fertility) / 3.0) as f64;
                let pop_score = (tribes[i].population / 500.0).min(1.0);
                let p = 0.5 * resource_score
                    + 0.3 * pop_score
                    + 0.2 * tribes[i].leader.traits.ambition;
                if ctx.rng.chance(p) {
                    try_expand(i, tribes, ctx);
                }
            }
            if tribes[i].territories.len() > CONVERSION_MIN_TERRITORIES
                && tribes[i].population > CONVERSION_MIN_POPULATION
                && tribes[i].age > CONVERSION_MIN_AGE
                && ctx.rng.chance(0.03 * tribes[i].leader.traits.ambition)
            {
                let tribe = tribes.remove(i);
                countries.push(found_country(tribe, ctx));
                continue;
            }
        }

        if tribes[i].population > SPLIT_MIN_POPULATION
            && ctx.rng.chance(SPLIT_CHANCE)
            && tribes.len() < MAX_TRIBES
        {
            split(i, tribes, ctx);
        }

        if tribes[i].settled && ctx.rng.chance(CONFLICT_CHANCE) {
            if let Some(victim) = find_absorb_victim(i, tribes) {
                absorb(i, victim, tribes, ctx);
                if victim < i {
                    i -= 1;
                }
            }
        }
    }
}

fn remove_dead(i: usize, tribes: &mut Vec<Tribe>, ctx: &mut TickCtx) {
    let tribe = &tribes[i];
    for &tile in &tribe.territories {
        ctx.territory.release(tile, Owner::Tribe(tribe.id));
    }
    ctx.events.push(Event::located(
        ctx.year,
        EventKind::Extinction,
        format!("The {} tribe has died out", tribe.culture),
        tribe.x,
        tribe.y,
    ));
    tribes.remove(i);
}

fn should_settle(tribe: &Tribe, ctx: &TickCtx) -> bool {
    let patience = 20.0 + 20.0 * tribe.leader.traits.caution;
    tribe.settlement_years as f64 > patience
        && ctx.world.tile(tribe.x, tribe.y).habitability as f64 > 0.4
        && tribe.population > 100.0
}

fn settle(i: usize, tribes: &mut [Tribe], ctx: &mut TickCtx) {
    let tribe = &mut tribes[i];
    tribe.settled = true;
    tribe.tech_level = tribe.tech_level.max(1);
    ctx.events.push(Event::located(
        ctx.year,
        EventKind::Settlement,
        format!(
            "The {} tribe settles after {} years of wandering",
            tribe.culture, tribe.settlement_years
        ),
        tribe.x,
        tribe.y,
    ));
}

/// Score nearby tiles and move the tribe to one of the better ones — or,
/// for an irrational leader, occasionally one of the worst.
fn migrate(i: usize, tribes: &mut [Tribe], ctx: &mut TickCtx) {
    let (cx, cy) = (tribes[i].x, tribes[i].y);
    let mut candidates: Vec<(u32, u32, f32)> = Vec::new();
    for dy in -MIGRATION_RADIUS..=MIGRATION_RADIUS {
        let ny = cy as i64 + dy;
        if ny < 0 || ny >= TILE_H as i64 {
            continue;
        }
        for dx in -MIGRATION_RADIUS..=MIGRATION_RADIUS {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = wrap_x(cx as i64 + dx, TILE_W) as u32;
            let tile = ctx.world.tile(nx, ny as u32);
            if !tile.claimable() || !ctx.territory.is_free((nx, ny as u32)) {
                continue;
            }
            let mut score = 100.0 * tile.habitability;
            score += match tile.river {
                RiverPresence::Major => 50.0,
                RiverPresence::Minor => 25.0,
                RiverPresence::None => 0.0,
            };
            if tile.distance_to_coast < 2.0 {
                score += 30.0;
            }
            if tile.biome == Biome::Desert {
                score -= 40.0;
            }
            if matches!(tile.biome, Biome::Ice | Biome::Tundra) {
                score -= 60.0;
            }
            if tile.roughness > 0.5 {
                score -= 30.0;
            }
            candidates.push((nx, ny as u32, score));
        }
    }
    if candidates.is_empty() {
        return;
    }
    // Stable sort: equal scores keep scan order.
    candidates.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap());

    let rationality = tribes[i].leader.traits.rationality;
    let (nx, ny, _) = if rationality < 0.3 && ctx.rng.chance(0.02) {
        // A bad call: one of the three worst options.
        let start = candidates.len().saturating_sub(3);
        candidates[ctx.rng.int(start as i64, candidates.len() as i64 - 1) as usize]
    } else {
        let k = (((1.0 - rationality) * 5.0).floor() as usize + 1).min(candidates.len());
        candidates[ctx.rng.int(0, k as i64 - 1) as usize]
    };

    let tribe = &mut tribes[i];
    for &tile in &tribe.territories {
        ctx.territory.release(tile, Owner::Tribe(tribe.id));
    }
    tribe.territories.clear();
    tribe.x = nx;
    tribe.y = ny;
    tribe.territories.push((nx, ny));
    ctx.territory.claim((nx, ny), Owner::Tribe(tribe.id));
    tribe.migration_cooldown = ctx.rng.int(15, 35) as u32;
    tribe.settlement_years = 0;
}

/// Claim one random adjacent unclaimed tile.
fn try_expand(i: usize, tribes: &mut [Tribe], ctx: &mut TickCtx) {
    let mut frontier: BTreeSet<(u32, u32)> = BTreeSet::new();
    for &(tx, ty) in &tribes[i].territories {
        for (nx, ny) in tile_neighbors8(tx, ty) {
            if ctx.world.tile(nx, ny).claimable() && ctx.territory.is_free((nx, ny)) {
                frontier.insert((nx, ny));
            }
        }
    }
    if frontier.is_empty() {
        return;
    }
    let mut frontier: Vec<(u32, u32)> = frontier.into_iter().collect();
    ctx.rng.shuffle(&mut frontier);
    let tile = frontier[0];
    ctx.territory.claim(tile, Owner::Tribe(tribes[i].id));
    tribes[i].territories.push(tile);
}

/// Half the population walks away as a new unsettled tribe of the same
/// culture, led by an heir of the current leader.
fn split(i: usize, tribes: &mut Vec<Tribe>, ctx: &mut TickCtx) {
    let emigrants = (tribes[i].population / 2.0).floor();
    tribes[i].population -= emigrants;

    let leader_name = names::leader_name(ctx.rng);
    let leader_age = ctx.rng.int(25, 45) as u32;
    let leader = tribes[i]
        .leader
        .heir_of(ctx.ids.leader(), leader_name, leader_age, ctx.rng);

    let id = ctx.ids.tribe();
    let parent = &tribes[i];
    let offshoot = Tribe {
        id,
        culture: parent.culture.clone(),
        color: parent.color.clone(),
        x: parent.x,
        y: parent.y,
        population: emigrants,
        age: 0,
        tech_level: parent.tech_level,
        settled: false,
        settlement_years: 0,
        migration_cooldown: 0,
        territories: Vec::new(),
        leader,
    };
    ctx.events.push(Event::located(
        ctx.year,
        EventKind::TribeSplit,
        format!("The {} tribe splits; {emigrants} people set out", parent.culture),
        parent.x,
        parent.y,
    ));
    tribes.push(offshoot);
}

/// First settled tribe within Manhattan range that we outnumber 1.3:1.
fn find_absorb_victim(i: usize, tribes: &[Tribe]) -> Option<usize> {
    let me = &tribes[i];
    tribes.iter().position(|other| {
        if other.id == me.id || !other.settled {
            return false;
        }
        let raw_dx = (me.x as i64 - other.x as i64).abs();
        let dx = raw_dx.min(TILE_W as i64 - raw_dx);
        let dy = (me.y as i64 - other.y as i64).abs();
        dx + dy <= ABSORB_RANGE && me.population > ABSORB_POPULATION_RATIO * other.population
    })
}

fn absorb(winner: usize, victim: usize, tribes: &mut Vec<Tribe>, ctx: &mut TickCtx) {
    let absorbed = tribes.remove(victim);
    let winner = if victim < winner { winner - 1 } else { winner };
    let tribe = &mut tribes[winner];

    tribe.population += absorbed.population / 2.0;
    ctx.stats.total_deaths += absorbed.population / 2.0;
    for &tile in &absorbed.territories {
        ctx.territory
            .transfer(tile, Owner::Tribe(absorbed.id), Owner::Tribe(tribe.id));
        tribe.territories.push(tile);
    }
    ctx.events.push(Event::located(
        ctx.year,
        EventKind::Conquest,
        format!(
            "The {} tribe absorbs the {} tribe",
            tribe.culture, absorbed.culture
        ),
        tribe.x,
        tribe.y,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_tribe, TickHarness};

    #[test]
    fn migration_relocates_to_a_free_claimed_tile() {
        let mut harness = TickHarness::new(1);
        let mut tribes = vec![test_tribe(1, 50, 50, 120.0, false)];
        harness.territory.claim((50, 50), Owner::Tribe(1));

        let mut ctx = harness.ctx();
        migrate(0, &mut tribes, &mut ctx);
        drop(ctx);

        let tribe = &tribes[0];
        assert_ne!((tribe.x, tribe.y), (50, 50), "tribe should have moved");
        assert_eq!(tribe.territories, vec![(tribe.x, tribe.y)]);
        assert!((15..=35).contains(&tribe.migration_cooldown));
        assert_eq!(tribe.settlement_years, 0);
        assert!(harness.territory.is_free((50, 50)));
        assert_eq!(
            harness.territory.owner_of((tribe.x, tribe.y)),
            Some(Owner::Tribe(1))
        );
    }

    #[test]
    fn expansion_claims_one_adjacent_tile() {
        let mut harness = TickHarness::new(5);
        let mut tribes = vec![test_tribe(1, 40, 40, 300.0, true)];
        harness.territory.claim((40, 40), Owner::Tribe(1));

        let mut ctx = harness.ctx();
        try_expand(0, &mut tribes, &mut ctx);
        drop(ctx);

        assert_eq!(tribes[0].territories.len(), 2);
        let new_tile = tribes[0].territories[1];
        let dx = (new_tile.0 as i64 - 40).abs().min(TILE_W as i64 - (new_tile.0 as i64 - 40).abs());
        let dy = (new_tile.1 as i64 - 40).abs();
        assert!(dx <= 1 && dy <= 1, "expanded to non-adjacent {new_tile:?}");
        assert_eq!(harness.territory.owner_of(new_tile), Some(Owner::Tribe(1)));
    }

    #[test]
    fn split_spawns_an_unsettled_offshoot() {
        let mut harness = TickHarness::new(20);
        let mut tribes = vec![test_tribe(9, 60, 60, 1001.0, true)];

        let mut ctx = harness.ctx();
        split(0, &mut tribes, &mut ctx);
        drop(ctx);

        assert_eq!(tribes.len(), 2);
        let (parent, offshoot) = (&tribes[0], &tribes[1]);
        assert_eq!(offshoot.population, 500.0);
        assert_eq!(parent.population, 501.0);
        assert_eq!(offshoot.culture, parent.culture);
        assert_eq!(offshoot.tech_level, parent.tech_level);
        assert!(!offshoot.settled);
        assert_eq!(offshoot.migration_cooldown, 0);
        assert!(offshoot.territories.is_empty());
        assert_eq!(offshoot.leader.years_in_power, 0);
        assert_eq!(harness.events.count_of(EventKind::TribeSplit), 1);
    }

    #[test]
    fn absorb_merges_people_and_land() {
        let mut harness = TickHarness::new(30);
        let mut tribes = vec![
            test_tribe(1, 10, 10, 1000.0, true),
            test_tribe(2, 11, 10, 500.0, true),
        ];
        harness.territory.claim((10, 10), Owner::Tribe(1));
        harness.territory.claim((11, 10), Owner::Tribe(2));

        assert_eq!(find_absorb_victim(0, &tribes), Some(1));

        let mut ctx = harness.ctx();
        absorb(0, 1, &mut tribes, &mut ctx);
        drop(ctx);

        assert_eq!(tribes.len(), 1);
        assert_eq!(tribes[0].population, 1250.0);
        assert!(tribes[0].owns((10, 10)) && tribes[0].owns((11, 10)));
        assert_eq!(harness.territory.owner_of((11, 10)), Some(Owner::Tribe(1)));
        assert_eq!(harness.stats.total_deaths, 250.0);
        assert_eq!(harness.events.count_of(EventKind::Conquest), 1);
    }

    #[test]
    fn absorb_needs_a_clear_population_edge() {
        let tribes = vec![
            test_tribe(1, 10, 10, 600.0, true),
            test_tribe(2, 11, 10, 500.0, true),
        ];
        // 600 < 1.3 * 500, so no absorption.
        assert_eq!(find_absorb_victim(0, &tribes), None);
    }

    #[test]
    fn distant_tribes_are_not_victims() {
        let tribes = vec![
            test_tribe(1, 10, 10, 1000.0, true),
            test_tribe(2, 14, 10, 100.0, true),
        ];
        assert_eq!(find_absorb_victim(0, &tribes), None);
    }
}
