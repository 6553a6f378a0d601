pub mod ai;
pub mod countries;
pub mod names;
pub mod simulation;
pub mod territory;
pub mod tribes;
pub mod wars;

use crate::id::IdAllocator;
use crate::model::{EventLog, World};
use crate::rng::SimRng;

pub use ai::CountryAi;
pub use simulation::{SimState, Simulation, Stats};
pub use territory::{Owner, TerritoryIndex};
pub use wars::WarManager;

/// Context handed through every phase of a tick.
///
/// Bundled so phase functions can grow without signature churn; the world
/// is read-only, everything else is the mutable spine of the tick.
pub(crate) struct TickCtx<'a> {
    pub world: &'a World,
    pub rng: &'a mut SimRng,
    pub events: &'a mut EventLog,
    pub ids: &'a mut IdAllocator,
    pub stats: &'a mut Stats,
    pub territory: &'a mut TerritoryIndex,
    pub year: u32,
}

/// Mid-brightness `#RRGGBB` entity color.
pub(crate) fn random_color(rng: &mut SimRng) -> String {
    let r = rng.int(40, 215);
    let g = rng.int(40, 215);
    let b = rng.int(40, 215);
    format!("#{r:02X}{g:02X}{b:02X}")
}
