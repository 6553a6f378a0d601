use serde::{Deserialize, Serialize};

use super::tile::Tile;
use crate::worldgen::{MAP_H, MAP_W, TILE_H, TILE_W};

/// A traced river: the ordered pixel path from source to mouth and a
/// normalized strength derived from its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct River {
    pub points: Vec<(u32, u32)>,
    pub strength: f32,
}

/// The generated planet. Immutable once built; the simulation only reads
/// it. Dense pixel fields are indexed `y * MAP_W + x`, the coarse tile
/// grid `y * TILE_W + x`.
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u32,
    pub elevation: Vec<f32>,
    pub temperature: Vec<f32>,
    pub moisture: Vec<f32>,
    /// Nonzero marks a river pixel; the value is the 1-based river index.
    pub river_mark: Vec<u8>,
    pub rivers: Vec<River>,
    pub tiles: Vec<Tile>,
}

impl World {
    pub fn pixel_index(x: usize, y: usize) -> usize {
        debug_assert!(x < MAP_W && y < MAP_H);
        y * MAP_W + x
    }

    pub fn tile_index(x: usize, y: usize) -> usize {
        debug_assert!(x < TILE_W && y < TILE_H);
        y * TILE_W + x
    }

    pub fn tile(&self, x: u32, y: u32) -> &Tile {
        &self.tiles[Self::tile_index(x as usize, y as usize)]
    }
}
