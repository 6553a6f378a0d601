#![allow(dead_code)]

use std::sync::OnceLock;

use civsim::{Simulation, World};

pub const TEST_SEED: u32 = 0x01;

/// One generated world per test binary; clone it into each simulation.
pub fn shared_world() -> &'static World {
    static WORLD: OnceLock<World> = OnceLock::new();
    WORLD.get_or_init(|| civsim::generate(TEST_SEED))
}

pub fn initialized_sim() -> Simulation {
    let mut sim = Simulation::from_world(shared_world().clone());
    sim.initialize().expect("test seed should be habitable");
    sim
}

pub fn run_years(sim: &mut Simulation, years: u32) {
    for _ in 0..years {
        sim.tick();
    }
}

/// Every owned tile across tribes and countries, for invariant checks.
pub fn all_owned_tiles(sim: &Simulation) -> Vec<(u32, u32)> {
    sim.tribes
        .iter()
        .flat_map(|t| t.territories.iter().copied())
        .chain(
            sim.countries
                .iter()
                .flat_map(|c| c.territories.iter().copied()),
        )
        .collect()
}
