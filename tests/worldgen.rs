use civsim::{generate, Biome, World, MAP_H, MAP_W, TILE_H, TILE_W};

const SEED: u32 = 0x01;

fn fnv64(bytes: impl Iterator<Item = u8>) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Hash of the concatenated elevation/temperature/moisture byte streams.
fn field_hash(world: &World) -> u64 {
    fnv64(
        world
            .elevation
            .iter()
            .chain(&world.temperature)
            .chain(&world.moisture)
            .flat_map(|v| v.to_le_bytes()),
    )
}

#[test]
fn fields_have_fixed_shape_and_range() {
    let world = generate(SEED);
    assert_eq!(world.elevation.len(), MAP_W * MAP_H);
    assert_eq!(world.temperature.len(), MAP_W * MAP_H);
    assert_eq!(world.moisture.len(), MAP_W * MAP_H);
    assert_eq!(world.river_mark.len(), MAP_W * MAP_H);
    assert_eq!(world.tiles.len(), TILE_W * TILE_H);

    assert!(world.elevation.iter().all(|e| e.is_finite()));
    assert!(world.temperature.iter().all(|t| (-1.0..=1.0).contains(t)));
    assert!(world.moisture.iter().all(|m| (0.0..=1.2).contains(m)));
}

#[test]
fn sea_level_puts_most_of_the_world_underwater() {
    let world = generate(SEED);
    let land = world.elevation.iter().filter(|&&e| e > 0.0).count();
    let fraction = land as f64 / world.elevation.len() as f64;
    // The 60th percentile is sea level, so land sits at ~40%; mountains
    // only add height to existing land.
    assert!(
        (0.30..=0.45).contains(&fraction),
        "land fraction {fraction} out of expected band"
    );
}

#[test]
fn rivers_are_long_marked_and_in_bounds() {
    let world = generate(SEED);
    assert!(!world.rivers.is_empty(), "seed should produce rivers");
    assert!(world.rivers.len() <= 150);

    for river in &world.rivers {
        assert!(river.points.len() > 10);
        assert!(river.strength > 0.0 && river.strength <= 1.0);
        for &(x, y) in &river.points {
            assert!((x as usize) < MAP_W && (y as usize) < MAP_H);
        }
    }
    for &mark in world.river_mark.iter().filter(|&&m| m != 0) {
        assert!(
            (mark as usize) <= world.rivers.len(),
            "river mark {mark} has no river"
        );
    }
}

#[test]
fn tiles_are_classified_consistently() {
    let world = generate(SEED);
    for tile in &world.tiles {
        assert_eq!(tile.is_land, tile.elevation > 0.0);
        assert_eq!(tile.biome == Biome::Ocean, !tile.is_land);

        if tile.is_land {
            assert!(tile.distance_to_coast > 0.0 && tile.distance_to_coast <= 20.0);
        } else {
            assert_eq!(tile.distance_to_coast, 0.0);
        }

        for v in [
            tile.fertility,
            tile.food_potential,
            tile.wood,
            tile.stone,
            tile.metals,
            tile.habitability,
            tile.population_capacity,
            tile.disease_risk,
        ] {
            assert!((0.0..=1.0).contains(&v), "tile field out of range: {v}");
        }
        assert!(tile.movement_cost >= 1.0);
        assert!(tile.roughness >= 0.0);

        if !tile.is_land || matches!(tile.biome, Biome::Ice | Biome::Alpine) {
            assert_eq!(tile.habitability, 0.0);
        }
    }
    // A real world has somewhere habitable.
    assert!(world.tiles.iter().any(|t| t.habitability > 0.4));
}

#[test]
fn generation_is_bit_identical_for_a_seed() {
    let first = generate(SEED);
    let second = generate(SEED);
    assert_eq!(field_hash(&first), field_hash(&second));
    assert_eq!(first.rivers, second.rivers);
    assert_eq!(first.tiles, second.tiles);
}

/// Prints the field hash for pinning as a release test vector:
/// `cargo test --test worldgen print_field_hash -- --ignored --nocapture`
#[test]
#[ignore]
fn print_field_hash() {
    let world = generate(SEED);
    println!("seed {SEED:#010x} field hash: {:#018x}", field_hash(&world));
}
