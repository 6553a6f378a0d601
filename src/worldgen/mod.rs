pub mod climate;
pub mod elevation;
pub mod rivers;
pub mod tiles;

use tracing::debug;

use crate::model::{River, Tile, World};
use crate::noise::GradientNoise;
use crate::rng::{derive_seed, SimRng};

/// Pixel grid dimensions of the equirectangular world.
pub const MAP_W: usize = 2048;
pub const MAP_H: usize = 1024;
/// Coarse tile grid dimensions; one tile aggregates an 8x8 pixel block.
pub const TILE_W: usize = 256;
pub const TILE_H: usize = 128;
pub const TILE_SIZE: usize = 8;

/// Horizontal wrap: the world is a torus in X.
pub fn wrap_x(x: i64, width: usize) -> usize {
    x.rem_euclid(width as i64) as usize
}

/// Vertical clamp: the world ends at the poles.
pub fn clamp_y(y: i64, height: usize) -> usize {
    y.clamp(0, height as i64 - 1) as usize
}

/// 8-neighborhood on the tile grid. X wraps; rows clamped off the grid
/// coincide with already-visited rows, so off-grid Y is simply dropped.
pub fn tile_neighbors8(x: u32, y: u32) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(8);
    for dy in -1..=1i64 {
        for dx in -1..=1i64 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let ny = y as i64 + dy;
            if ny < 0 || ny >= TILE_H as i64 {
                continue;
            }
            out.push((wrap_x(x as i64 + dx, TILE_W) as u32, ny as u32));
        }
    }
    out
}

/// Progress marker produced between generation phases, for drivers that
/// want to surface a progress bar without observing half-built fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub fraction: f32,
    pub label: &'static str,
}

const PHASES: [&str; 8] = [
    "continents",
    "sea level",
    "mountains",
    "temperature",
    "moisture",
    "rivers",
    "tile index",
    "coastlines",
];

/// Staged world generation.
///
/// Phases run in a fixed order, each reading only fields written by
/// earlier phases; [`advance`](Self::advance) runs one phase and reports
/// progress. The world is only obtainable once every phase has run, so a
/// driver that interleaves UI work between phases can never observe a
/// half-built world.
pub struct WorldGenerator {
    seed: u32,
    rng: SimRng,
    noise: GradientNoise,
    phase: usize,
    elevation: Vec<f32>,
    temperature: Vec<f32>,
    moisture: Vec<f32>,
    river_mark: Vec<u8>,
    rivers: Vec<River>,
    tiles: Vec<Tile>,
}

impl WorldGenerator {
    pub fn new(seed: u32) -> Self {
        let mut rng = SimRng::new(derive_seed(seed, "worldgen", 0));
        let noise = GradientNoise::new(&mut rng);
        Self {
            seed,
            rng,
            noise,
            phase: 0,
            elevation: Vec::new(),
            temperature: Vec::new(),
            moisture: Vec::new(),
            river_mark: Vec::new(),
            rivers: Vec::new(),
            tiles: Vec::new(),
        }
    }

    /// Run the next phase. Returns `None` once generation is complete.
    pub fn advance(&mut self) -> Option<Progress> {
        if self.phase >= PHASES.len() {
            return None;
        }
        match self.phase {
            0 => self.elevation = elevation::base_elevation(&self.noise),
            1 => elevation::normalize_sea_level(&mut self.elevation),
            2 => elevation::raise_mountains(&self.noise, &mut self.elevation),
            3 => self.temperature = climate::temperature_field(&self.noise, &self.elevation),
            4 => self.moisture = climate::moisture_field(&self.noise, &self.elevation),
            5 => {
                self.river_mark = vec![0; MAP_W * MAP_H];
                self.rivers = rivers::carve_rivers(
                    &mut self.rng,
                    &self.elevation,
                    &self.moisture,
                    &mut self.river_mark,
                );
            }
            6 => {
                self.tiles = tiles::build_tiles(
                    &self.elevation,
                    &self.temperature,
                    &self.moisture,
                    &self.river_mark,
                    &self.rivers,
                )
            }
            7 => tiles::finalize_tiles(&self.noise, &mut self.tiles),
            _ => unreachable!(),
        }
        self.phase += 1;
        let label = PHASES[self.phase - 1];
        debug!(phase = label, "worldgen phase complete");
        Some(Progress {
            fraction: self.phase as f32 / PHASES.len() as f32,
            label,
        })
    }

    /// Finish generation.
    ///
    /// # Panics
    /// Panics if called before every phase has run.
    pub fn into_world(self) -> World {
        assert_eq!(self.phase, PHASES.len(), "world generation incomplete");
        World {
            seed: self.seed,
            elevation: self.elevation,
            temperature: self.temperature,
            moisture: self.moisture,
            river_mark: self.river_mark,
            rivers: self.rivers,
            tiles: self.tiles,
        }
    }
}

/// Generate a complete world from a seed, driving all phases.
pub fn generate(seed: u32) -> World {
    let mut generator = WorldGenerator::new(seed);
    while generator.advance().is_some() {}
    generator.into_world()
}
