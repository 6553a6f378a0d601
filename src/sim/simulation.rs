use tracing::{debug, info};

use crate::error::Error;
use crate::id::IdAllocator;
use crate::model::{Country, Event, EventKind, EventLog, Leader, Traits, Tribe, War, World};
use crate::rng::{derive_seed, SimRng};
use crate::worldgen::{self, TILE_H, TILE_W};

use super::ai::CountryAi;
use super::territory::{Owner, TerritoryIndex};
use super::wars::WarManager;
use super::{countries, names, random_color, tribes, TickCtx};

const MIN_START_TRIBES: i64 = 10;
const MAX_START_TRIBES: i64 = 16;
const PLACEMENT_ATTEMPTS: u32 = 100;
const MIN_START_HABITABILITY: f32 = 0.2;

const GLOBAL_TECH_INTERVAL: u32 = 100;
const GLOBAL_TECH_CAP: u32 = 10;
const GLOBAL_TECH_CHANCE: f64 = 0.1;

/// Milliseconds between ticks for speeds 0..=4; speed 0 is paused.
const TICK_INTERVALS_MS: [Option<u64>; 5] = [None, Some(2000), Some(600), Some(200), Some(50)];

/// Running totals reported in the save file and the tech-score check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub total_deaths: f64,
    pub total_wars: u32,
    pub total_civilizations: u32,
}

/// Read-only snapshot handed to renderers and drivers.
#[derive(Debug)]
pub struct SimState<'a> {
    pub year: u32,
    pub tribes: &'a [Tribe],
    pub countries: &'a [Country],
    pub tech_level: u32,
    pub wars: &'a [War],
    pub total_population: f64,
}

/// The simulation: owns the world, every entity collection, and the
/// yearly tick loop.
///
/// A tick is atomic and strictly ordered — tribes, then countries, then
/// wars, then global AI state, then the centennial tech check. Within
/// each phase entities are visited in reverse index order so in-place
/// removals are deterministic and appends are not seen until next year.
///
/// Each year draws from its own sub-stream of the master seed, so a
/// simulation restored from a save continues exactly as the original
/// would have.
pub struct Simulation {
    pub world: World,
    pub year: u32,
    pub tribes: Vec<Tribe>,
    pub countries: Vec<Country>,
    pub wars: WarManager,
    pub ai: CountryAi,
    pub events: EventLog,
    pub stats: Stats,
    pub tech_level: u32,
    pub territory: TerritoryIndex,
    pub(crate) ids: IdAllocator,
    speed: u8,
    last_tick_ms: Option<u64>,
}

impl Simulation {
    /// Generate the world for `seed` and wrap it in an empty simulation;
    /// call [`initialize`](Self::initialize) to seed the first tribes.
    pub fn new(seed: u32) -> Self {
        Self::from_world(worldgen::generate(seed))
    }

    /// Build a simulation over an already generated world.
    pub fn from_world(world: World) -> Self {
        Self {
            world,
            year: 0,
            tribes: Vec::new(),
            countries: Vec::new(),
            wars: WarManager::new(),
            ai: CountryAi::new(),
            events: EventLog::new(),
            stats: Stats::default(),
            tech_level: 0,
            territory: TerritoryIndex::new(),
            ids: IdAllocator::new(),
            speed: 1,
            last_tick_ms: None,
        }
    }

    /// Seed the starting tribes on habitable land.
    ///
    /// Placement is rejection sampling, at most 100 attempts per tribe;
    /// a seed that cannot host the minimum number of tribes is reported
    /// as [`Error::WorldUninhabitable`] rather than silently re-rolled.
    pub fn initialize(&mut self) -> Result<(), Error> {
        let mut rng = SimRng::new(derive_seed(self.world.seed, "init", 0));
        let target = rng.int(MIN_START_TRIBES, MAX_START_TRIBES);

        for _ in 0..target {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let x = rng.int(0, TILE_W as i64 - 1) as u32;
                let y = rng.int(0, TILE_H as i64 - 1) as u32;
                let tile = self.world.tile(x, y);
                if !tile.claimable()
                    || tile.habitability < MIN_START_HABITABILITY
                    || !self.territory.is_free((x, y))
                {
                    continue;
                }

                let id = self.ids.tribe();
                let culture = names::culture_name(&mut rng);
                let leader = Leader::new(
                    self.ids.leader(),
                    names::leader_name(&mut rng),
                    rng.int(25, 45) as u32,
                    Traits::sample(&mut rng),
                );
                self.territory.claim((x, y), Owner::Tribe(id));
                self.events.push(Event::located(
                    self.year,
                    EventKind::TribeFormed,
                    format!("The {culture} tribe emerges"),
                    x,
                    y,
                ));
                self.tribes.push(Tribe {
                    id,
                    culture,
                    color: random_color(&mut rng),
                    x,
                    y,
                    population: rng.int(100, 200) as f64,
                    age: 0,
                    tech_level: 0,
                    settled: false,
                    settlement_years: 0,
                    migration_cooldown: rng.int(15, 35) as u32,
                    territories: vec![(x, y)],
                    leader,
                });
                break;
            }
        }

        if (self.tribes.len() as i64) < MIN_START_TRIBES {
            return Err(Error::WorldUninhabitable {
                placed: self.tribes.len() as u32,
                required: MIN_START_TRIBES as u32,
            });
        }
        info!(
            tribes = self.tribes.len(),
            seed = self.world.seed,
            "simulation initialized"
        );
        Ok(())
    }

    /// Advance one year.
    pub fn tick(&mut self) {
        self.year += 1;
        let mut rng = SimRng::new(derive_seed(self.world.seed, "tick", self.year));
        let mut ctx = TickCtx {
            world: &self.world,
            rng: &mut rng,
            events: &mut self.events,
            ids: &mut self.ids,
            stats: &mut self.stats,
            territory: &mut self.territory,
            year: self.year,
        };

        // 1. Tribes
        tribes::tick_tribes(&mut self.tribes, &mut self.countries, &mut ctx);
        // 2. Countries (policy turns included)
        countries::tick_countries(&mut self.countries, &mut self.wars, &mut self.ai, &mut ctx);
        // 3. Wars
        self.wars.tick(&mut self.countries, &mut ctx);
        // 4. Global AI state
        self.ai.decay();
        // 5. Centennial tech-score check
        if self.year % GLOBAL_TECH_INTERVAL == 0 {
            let total_population: f64 = self.tribes.iter().map(|t| t.population).sum::<f64>()
                + self.countries.iter().map(|c| c.population).sum::<f64>();
            let score = total_population / 10_000.0
                + 10.0 * self.countries.len() as f64
                + 5.0 * ctx.stats.total_wars as f64;
            if score > self.tech_level as f64 * 1000.0
                && self.tech_level < GLOBAL_TECH_CAP
                && ctx.rng.chance(GLOBAL_TECH_CHANCE)
            {
                self.tech_level += 1;
                for country in &mut self.countries {
                    country.tech_level = country.tech_level.max(self.tech_level);
                }
                ctx.events.push(Event::new(
                    self.year,
                    EventKind::TechAdvancement,
                    format!("The world reaches technology level {}", self.tech_level),
                ));
            }
        }

        debug!(
            year = self.year,
            tribes = self.tribes.len(),
            countries = self.countries.len(),
            wars = self.wars.active.len(),
            "tick complete"
        );
    }

    /// Set simulation speed 0..=4 (0 pauses). Out-of-range values clamp.
    pub fn set_speed(&mut self, speed: u8) {
        self.speed = speed.min(4);
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Whether enough wall-clock time has passed for the next tick. The
    /// driver supplies the clock; the simulation never reads one.
    pub fn should_tick(&self, now_ms: u64) -> bool {
        let Some(interval) = TICK_INTERVALS_MS[self.speed as usize] else {
            return false;
        };
        match self.last_tick_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= interval,
        }
    }

    /// Tick and record the driver's clock for pacing.
    pub fn tick_at(&mut self, now_ms: u64) {
        self.last_tick_ms = Some(now_ms);
        self.tick();
    }

    /// Declare a war between two countries by id (used by drivers and
    /// scenario tooling; the AI path goes through the same manager).
    pub fn declare_war(&mut self, attacker_id: u64, defender_id: u64) {
        let mut rng = SimRng::new(derive_seed(self.world.seed, "declare", self.year));
        let mut ctx = TickCtx {
            world: &self.world,
            rng: &mut rng,
            events: &mut self.events,
            ids: &mut self.ids,
            stats: &mut self.stats,
            territory: &mut self.territory,
            year: self.year,
        };
        self.wars
            .declare(&mut self.countries, attacker_id, defender_id, &mut ctx);
    }

    pub fn state(&self) -> SimState<'_> {
        let total_population: f64 = self.tribes.iter().map(|t| t.population).sum::<f64>()
            + self.countries.iter().map(|c| c.population).sum::<f64>();
        SimState {
            year: self.year,
            tribes: &self.tribes,
            countries: &self.countries,
            tech_level: self.tech_level,
            wars: &self.wars.active,
            total_population,
        }
    }
}
