mod common;

use std::collections::HashSet;

use civsim::{City, Country, EventKind, Leader, Owner, Simulation, Traits, World};

use common::{all_owned_tiles, shared_world};

/// Corners of `w` x `h` blocks of claimable tiles whose population yield
/// is at least `min_quality`, scan order row-major.
fn claimable_blocks(world: &World, w: u32, h: u32, min_quality: f32) -> Vec<(u32, u32)> {
    let mut corners = Vec::new();
    for y in 0..(128 - h) {
        'corner: for x in 0..(256 - w) {
            for dy in 0..h {
                for dx in 0..w {
                    let tile = world.tile(x + dx, y + dy);
                    if !tile.claimable()
                        || tile.population_capacity * tile.food_potential < min_quality
                    {
                        continue 'corner;
                    }
                }
            }
            corners.push((x, y));
        }
    }
    corners
}

/// True when two blocks of the given size can share no 8-adjacent tiles,
/// accounting for the horizontal wrap.
fn well_separated(a: (u32, u32), b: (u32, u32), size: i64) -> bool {
    let raw_dx = (a.0 as i64 - b.0 as i64).abs();
    let dx = raw_dx.min(256 - raw_dx);
    let dy = (a.1 as i64 - b.1 as i64).abs();
    dx > size + 1 || dy > size + 1
}

fn block_tiles(corner: (u32, u32), w: u32, h: u32) -> Vec<(u32, u32)> {
    let mut tiles = Vec::new();
    for dx in 0..w {
        for dy in 0..h {
            tiles.push((corner.0 + dx, corner.1 + dy));
        }
    }
    tiles
}

fn plant_country(
    sim: &mut Simulation,
    id: u64,
    name: &str,
    tiles: Vec<(u32, u32)>,
    aggression: f64,
    caution: f64,
    population: f64,
) {
    for &tile in &tiles {
        sim.territory.claim(tile, Owner::Country(id));
    }
    let capital = tiles[0];
    sim.countries.push(Country {
        id,
        name: name.to_string(),
        color: "#AA4444".to_string(),
        capital,
        population,
        age: 40,
        territories: tiles,
        cities: vec![City {
            id,
            name: format!("{name} City"),
            x: capital.0,
            y: capital.1,
            population: 100.0,
            is_capital: true,
        }],
        government: "tribal_confederation".to_string(),
        tech_level: 1,
        unrest: 0.0,
        at_war: false,
        allies: vec![],
        enemies: vec![],
        leader: Leader::new(
            id,
            format!("{name} Leader"),
            40,
            Traits {
                aggression,
                caution,
                diplomacy: 0.5,
                ambition: 0.5,
                freedom: 0.5,
                rationality: 0.5,
            },
        ),
    });
}

/// A strong aggressor bordering a one-tile defender: the defender cannot
/// sustain itself and must be gone within a century, with a war-ended
/// entry naming the victor.
#[test]
fn forced_war_destroys_the_weak_neighbor() {
    let world = shared_world().clone();
    let corner = [0.3, 0.2, 0.1]
        .iter()
        .find_map(|&q| claimable_blocks(&world, 6, 3, q).into_iter().next())
        .expect("world should contain a 6x3 claimable block");

    let mut sim = Simulation::from_world(world);
    let mut tiles = block_tiles(corner, 6, 3);
    let b_tiles = vec![tiles.pop().unwrap()];

    plant_country(&mut sim, 1, "Aland", tiles, 1.0, 0.0, 10_000.0);
    plant_country(&mut sim, 2, "Boria", b_tiles, 0.2, 0.5, 100.0);
    sim.declare_war(1, 2);
    assert!(sim.countries.iter().all(|c| c.at_war));
    assert_eq!(sim.stats.total_wars, 1);

    for _ in 0..100 {
        sim.tick();

        // Ownership stays disjoint and synchronized throughout the war.
        let owned = all_owned_tiles(&sim);
        let unique: HashSet<_> = owned.iter().copied().collect();
        assert_eq!(owned.len(), unique.len());
        assert_eq!(owned.len(), sim.territory.len());

        if !sim.countries.iter().any(|c| c.id == 2) {
            break;
        }
    }

    assert!(
        !sim.countries.iter().any(|c| c.id == 2),
        "defender survived 100 years against a hundredfold aggressor"
    );
    let (events, _) = sim.events.read_from(0);
    assert!(
        events
            .iter()
            .any(|e| e.kind == EventKind::WarEnded && e.message.contains("Aland")),
        "no war-ended event naming the victor"
    );
    assert!(sim.wars.active.is_empty());
}

/// Exhaustion accumulates every tick, so a war between distant countries
/// that can never annex anything still terminates within 34 years.
#[test]
fn stalemates_end_by_exhaustion() {
    let world = shared_world().clone();
    let corners = [0.3, 0.2, 0.1, 0.05]
        .iter()
        .map(|&q| claimable_blocks(&world, 5, 5, q))
        .find(|corners| {
            corners
                .iter()
                .any(|&a| corners.iter().any(|&b| well_separated(a, b, 5)))
        })
        .expect("world should contain two separated 5x5 blocks");
    let first = corners
        .iter()
        .copied()
        .find(|&a| corners.iter().any(|&b| well_separated(a, b, 5)))
        .unwrap();
    let second = corners
        .iter()
        .copied()
        .find(|&b| well_separated(first, b, 5))
        .unwrap();

    let mut sim = Simulation::from_world(world);
    plant_country(&mut sim, 1, "Casora", block_tiles(first, 5, 5), 0.5, 0.5, 300.0);
    plant_country(&mut sim, 2, "Dravek", block_tiles(second, 5, 5), 0.5, 0.5, 300.0);
    sim.declare_war(1, 2);

    let mut ended_at = None;
    for years in 1..=40 {
        sim.tick();
        if sim.wars.active.is_empty() {
            ended_at = Some(years);
            break;
        }
    }
    let ended_at = ended_at.expect("war never terminated");
    assert!(ended_at <= 34, "war took {ended_at} years to end");
    assert_eq!(sim.events.count_of(EventKind::WarEnded), 1);
    for country in &sim.countries {
        assert!(!country.at_war, "{} still flagged at war", country.name);
    }
}
