use crate::model::{Biome, ClimateZone, River, RiverPresence, Tile};
use crate::noise::GradientNoise;

use super::{wrap_x, MAP_W, TILE_H, TILE_SIZE, TILE_W};

/// Pixel sampling stride inside each tile block (16 samples per tile).
const SAMPLE_STRIDE: usize = 2;

const MAJOR_RIVER_STRENGTH: f32 = 0.5;
const MINOR_RIVER_STRENGTH: f32 = 0.2;

/// Farthest coast search radius in tiles; landlocked tiles beyond it
/// store the radius itself.
const MAX_COAST_RADIUS: i64 = 20;

/// Phase 7: aggregate pixel fields into the coarse tile grid and classify
/// each tile. Resource fields are filled by [`finalize_tiles`].
pub(super) fn build_tiles(
    elevation: &[f32],
    temperature: &[f32],
    moisture: &[f32],
    river_mark: &[u8],
    rivers: &[River],
) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(TILE_W * TILE_H);
    for ty in 0..TILE_H {
        for tx in 0..TILE_W {
            let mut sum_elevation = 0.0f64;
            let mut sum_temperature = 0.0f64;
            let mut sum_moisture = 0.0f64;
            let mut min_elevation = f32::MAX;
            let mut max_elevation = f32::MIN;
            let mut river_strength = 0.0f32;
            let mut samples = 0u32;

            for dy in (0..TILE_SIZE).step_by(SAMPLE_STRIDE) {
                for dx in (0..TILE_SIZE).step_by(SAMPLE_STRIDE) {
                    let px = tx * TILE_SIZE + dx;
                    let py = ty * TILE_SIZE + dy;
                    let i = py * MAP_W + px;
                    let e = elevation[i];
                    sum_elevation += e as f64;
                    sum_temperature += temperature[i] as f64;
                    sum_moisture += moisture[i] as f64;
                    min_elevation = min_elevation.min(e);
                    max_elevation = max_elevation.max(e);
                    let mark = river_mark[i];
                    if mark != 0 {
                        river_strength = river_strength.max(rivers[mark as usize - 1].strength);
                    }
                    samples += 1;
                }
            }

            let avg_elevation = (sum_elevation / samples as f64) as f32;
            let avg_temperature = (sum_temperature / samples as f64) as f32;
            let rainfall = (sum_moisture / samples as f64) as f32;
            let is_land = avg_elevation > 0.0;
            let biome = classify_biome(avg_elevation, avg_temperature, rainfall);
            let climate_zone = if avg_temperature < -0.2 {
                ClimateZone::Polar
            } else if avg_temperature > 0.4 {
                ClimateZone::Tropical
            } else {
                ClimateZone::Temperate
            };
            let river = if river_strength >= MAJOR_RIVER_STRENGTH {
                RiverPresence::Major
            } else if river_strength >= MINOR_RIVER_STRENGTH {
                RiverPresence::Minor
            } else {
                RiverPresence::None
            };

            tiles.push(Tile {
                x: tx as u32,
                y: ty as u32,
                elevation: avg_elevation,
                temperature: avg_temperature,
                rainfall,
                roughness: max_elevation - min_elevation,
                is_land,
                biome,
                climate_zone,
                river,
                distance_to_coast: 0.0,
                fertility: 0.0,
                food_potential: 0.0,
                wood: 0.0,
                stone: 0.0,
                metals: 0.0,
                habitability: 0.0,
                population_capacity: 0.0,
                disease_risk: 0.0,
                movement_cost: 1.0,
            });
        }
    }
    tiles
}

/// Ordered decision ladder; the first matching rung wins.
fn classify_biome(elevation: f32, temperature: f32, rainfall: f32) -> Biome {
    if elevation <= 0.0 {
        Biome::Ocean
    } else if temperature < -0.5 {
        Biome::Ice
    } else if temperature < -0.2 {
        Biome::Tundra
    } else if elevation > 0.7 {
        Biome::Alpine
    } else if rainfall < 0.2 {
        Biome::Desert
    } else if rainfall < 0.4 {
        if temperature > 0.3 {
            Biome::Savanna
        } else {
            Biome::Grassland
        }
    } else if rainfall < 0.7 {
        if temperature > 0.4 {
            Biome::Jungle
        } else {
            Biome::Forest
        }
    } else if temperature > 0.5 {
        Biome::Jungle
    } else {
        Biome::Forest
    }
}

/// Phase 8: distance-to-coast, then the derived resource and habitability
/// fields (some of which read the coast distance).
pub(super) fn finalize_tiles(noise: &GradientNoise, tiles: &mut [Tile]) {
    for i in 0..tiles.len() {
        let (x, y) = (tiles[i].x as usize, tiles[i].y as usize);
        tiles[i].distance_to_coast = if tiles[i].is_land {
            coast_distance(tiles, x, y)
        } else {
            0.0
        };
    }

    for tile in tiles.iter_mut() {
        derive_resources(noise, tile);
    }
}

/// Smallest Chebyshev ring around `(x, y)` containing a non-land tile;
/// returns the Euclidean distance to the nearest such tile in that ring.
fn coast_distance(tiles: &[Tile], x: usize, y: usize) -> f32 {
    for r in 1..=MAX_COAST_RADIUS {
        let mut best: Option<f32> = None;
        for dy in -r..=r {
            let ny = y as i64 + dy;
            if ny < 0 || ny >= TILE_H as i64 {
                continue;
            }
            for dx in -r..=r {
                if dx.abs().max(dy.abs()) != r {
                    continue;
                }
                let nx = wrap_x(x as i64 + dx, TILE_W);
                if !tiles[ny as usize * TILE_W + nx].is_land {
                    let d = ((dx * dx + dy * dy) as f32).sqrt();
                    best = Some(best.map_or(d, |b: f32| b.min(d)));
                }
            }
        }
        if let Some(d) = best {
            return d;
        }
    }
    MAX_COAST_RADIUS as f32
}

fn derive_resources(noise: &GradientNoise, tile: &mut Tile) {
    let river_bonus = match tile.river {
        RiverPresence::Major => 0.2,
        RiverPresence::Minor => 0.1,
        RiverPresence::None => 0.0,
    };
    let coastal = tile.is_land && tile.distance_to_coast < 2.0;
    let coast_bonus = if coastal { 0.1 } else { 0.0 };

    let mut fertility =
        (tile.rainfall * 0.6 + (1.0 - (tile.temperature - 0.35).abs()) * 0.4).clamp(0.0, 1.0);
    if !tile.claimable() {
        fertility = 0.0;
    } else if tile.river != RiverPresence::None {
        fertility = (fertility * 1.3).clamp(0.0, 1.0);
    }
    tile.fertility = fertility;
    tile.food_potential = (fertility * 0.7 + river_bonus + coast_bonus).clamp(0.0, 1.0);

    if tile.is_land {
        tile.wood = tile.biome.wood_base() * tile.rainfall.clamp(0.0, 1.0);
        tile.stone = (tile.roughness * 1.2).clamp(0.0, 1.0);
        let metal_noise = (noise.noise2d(
            tile.x as f64 / TILE_W as f64 * 30.0,
            tile.y as f64 / TILE_H as f64 * 30.0,
        ) as f32
            + 1.0)
            * 0.5;
        tile.metals = (tile.roughness * 0.5 + 0.5 * metal_noise).clamp(0.0, 1.0);
    }

    tile.habitability = if !tile.claimable() {
        0.0
    } else {
        let mut h = tile.food_potential * 0.45
            + tile.fertility * 0.25
            + (1.0 - tile.roughness.min(1.0)) * 0.15
            + river_bonus * 0.5
            + coast_bonus;
        if matches!(tile.biome, Biome::Desert | Biome::Tundra) {
            h -= 0.2;
        }
        h.clamp(0.0, 1.0)
    };
    tile.population_capacity =
        (tile.habitability * 0.7 + tile.food_potential * 0.3).clamp(0.0, 1.0);
    tile.disease_risk = (tile.biome.disease_base()
        + if tile.rainfall > 0.9 && tile.temperature > 0.3 {
            0.2
        } else {
            0.0
        })
    .clamp(0.0, 1.0);
    tile.movement_cost = 1.0 + tile.roughness.min(1.0) * 2.0 + tile.biome.movement_penalty();
}
