pub mod biome;
pub mod country;
pub mod event;
pub mod leader;
pub mod tile;
pub mod tribe;
pub mod war;
pub mod world;

pub use biome::{Biome, ClimateZone, RiverPresence};
pub use country::{City, Country, MIN_COUNTRY_POPULATION};
pub use event::{Event, EventKind, EventLog};
pub use leader::{Leader, Traits};
pub use tile::Tile;
pub use tribe::{Tribe, MIN_TRIBE_POPULATION};
pub use war::War;
pub use world::{River, World};
