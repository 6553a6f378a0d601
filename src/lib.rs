pub mod error;
pub mod id;
pub mod model;
pub mod noise;
pub mod rng;
pub mod save;
pub mod sim;
#[cfg(test)]
pub(crate) mod testutil;
pub mod worldgen;

pub use error::Error;
pub use id::IdAllocator;
pub use model::{
    Biome, City, ClimateZone, Country, Event, EventKind, EventLog, Leader, River, RiverPresence,
    Tile, Traits, Tribe, War, World,
};
pub use noise::GradientNoise;
pub use rng::{derive_seed, SimRng};
pub use save::SaveState;
pub use sim::{CountryAi, Owner, SimState, Simulation, Stats, TerritoryIndex, WarManager};
pub use worldgen::{generate, WorldGenerator, MAP_H, MAP_W, TILE_H, TILE_W};
