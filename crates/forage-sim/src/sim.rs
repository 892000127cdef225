//! The `Sim` struct and its tick loop.

use forage_core::{FoodSource, Obstacle, SimClock, SimConfig};
use forage_field::{PheromoneConfig, PheromoneField};
use forage_swarm::{FoodEvent, Swarm};
use forage_terrain::TerrainSource;

use crate::{SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim<T>` owns every moving part — the swarm, the trail field, the food
/// and obstacle lists — and borrows nothing, so one value is the complete,
/// reproducible simulation state.  Each tick it:
///
/// 1. decays and diffuses the pheromone field,
/// 2. steps the swarm (steer / apply / separate / settle),
/// 3. forwards this tick's pickup and depletion events to the observer.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<T: TerrainSource> {
    /// Global configuration (total ticks, seed, reference frame interval, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to sim time.
    pub clock: SimClock,

    /// The terrain agents walk on.  Height/normal queries only.
    pub terrain: T,

    /// The two-channel trail grid.
    pub field: PheromoneField,

    /// Trail tuning shared by the field update and the swarm's sensing.
    pub trail_config: PheromoneConfig,

    /// All agents plus their scratch state.
    pub swarm: Swarm,

    /// Static circular obstacle footprints.
    pub obstacles: Vec<Obstacle>,

    /// Food sources.  Stock decrements in place; depleted sources stay in
    /// the list so `FoodId`s remain stable.
    pub foods: Vec<FoodSource>,

    /// Dedicated worker pool sized from `config.num_threads`.
    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<T: TerrainSource> Sim<T> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run at the fixed reference rate from the current tick to
    /// `config.end_tick()`, invoking observer hooks at every boundary.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.tick(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    /// Advance one tick with a caller-supplied frame interval.
    ///
    /// This is the entry point for an interactive render loop: pass the real
    /// frame `dt` and the swarm clamps it to `config.max_dt_secs()` so a
    /// stalled frame never teleports agents.  The tick counter still
    /// advances by exactly one.
    pub fn step<O: SimObserver>(&mut self, dt: f32, observer: &mut O) {
        self.process_tick(dt, observer);
    }

    // ── Tick processing ───────────────────────────────────────────────────

    fn tick<O: SimObserver>(&mut self, observer: &mut O) {
        let dt = self.clock.reference_dt_secs;
        self.process_tick(dt, observer);
    }

    fn process_tick<O: SimObserver>(&mut self, dt: f32, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        // ── Phase 1: field decay & diffusion ──────────────────────────────
        //
        // Runs before the swarm step, per the field's tick ordering
        // contract: this tick's deposits land after the swap and are first
        // decayed next tick.
        self.field.update(&self.trail_config);

        // ── Phase 2: swarm step ───────────────────────────────────────────
        let events = self.step_swarm(dt);

        // ── Phase 3: event fan-out ────────────────────────────────────────
        for event in events {
            observer.on_food_event(now, event);
            if event.remaining == 0 {
                observer.on_food_depleted(now, event.food);
            }
        }

        observer.on_tick_end(now, self.swarm.metrics());
        if self.config.snapshot_interval_ticks > 0
            && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
        {
            observer.on_snapshot(now, &self.swarm, &self.field);
        }

        self.clock.advance();
    }

    #[cfg(not(feature = "parallel"))]
    fn step_swarm(&mut self, dt: f32) -> Vec<FoodEvent> {
        self.swarm.update(
            dt,
            &self.terrain,
            &mut self.field,
            &self.trail_config,
            &self.obstacles,
            &mut self.foods,
        )
    }

    #[cfg(feature = "parallel")]
    fn step_swarm(&mut self, dt: f32) -> Vec<FoodEvent> {
        // Explicit field borrows so the pool closure captures disjoint refs.
        let Sim {
            swarm,
            terrain,
            field,
            trail_config,
            obstacles,
            foods,
            pool,
            ..
        } = self;
        let terrain = &*terrain;
        match pool {
            Some(pool) => pool.install(|| {
                swarm.update(dt, terrain, field, trail_config, obstacles, foods)
            }),
            None => swarm.update(dt, terrain, field, trail_config, obstacles, foods),
        }
    }
}
