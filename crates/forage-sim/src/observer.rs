//! Simulation observer trait for progress reporting and data collection.

use forage_core::{FoodId, Tick};
use forage_field::PheromoneField;
use forage_swarm::{FoodEvent, Swarm, SwarmMetrics};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  This is also the simulation's whole
/// observability surface: pickups, depletions, and metrics flow out through
/// these hooks rather than a logging backend.
///
/// # Example — depletion logger
///
/// ```rust,ignore
/// struct DepletionLog;
///
/// impl SimObserver for DepletionLog {
///     fn on_food_depleted(&mut self, tick: Tick, food: FoodId) {
///         println!("{tick}: source {food} exhausted");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per pickup, the tick it happens, in ascending agent order.
    fn on_food_event(&mut self, _tick: Tick, _event: FoodEvent) {}

    /// Called exactly once per source, on the tick its last unit is taken.
    fn on_food_depleted(&mut self, _tick: Tick, _food: FoodId) {}

    /// Called at the end of each tick with the cumulative swarm counters.
    fn on_tick_end(&mut self, _tick: Tick, _metrics: &SwarmMetrics) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks).
    ///
    /// Provides read-only access to the swarm and the trail field so output
    /// writers can record a frame without the sim knowing about any specific
    /// output format.
    fn on_snapshot(&mut self, _tick: Tick, _swarm: &Swarm, _field: &PheromoneField) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
