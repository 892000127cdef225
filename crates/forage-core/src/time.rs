//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to simulated seconds is held in `SimClock`:
//!
//!   sim_time = tick * reference_dt_secs
//!
//! The swarm update itself is driven by a caller-supplied `dt` (so a render
//! loop with a variable frame rate can drive it directly), but the *reference*
//! frame interval defines both the fixed-step conversion above and the upper
//! clamp on any single step: a slow frame never advances an agent by more
//! than [`SimConfig::max_dt_secs`] worth of motion.
//!
//! The default reference interval is 1/60 s (one display frame).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64` to avoid overflow: at 60 ticks per second a u64 lasts
/// ~9.7 billion years — far longer than any conceivable run.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// How many simulated seconds one reference tick represents.
    /// Default: 1/60 (one display frame).
    pub reference_dt_secs: f32,
    /// The current tick — advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick zero with the given reference frame interval.
    pub fn new(reference_dt_secs: f32) -> Self {
        Self {
            reference_dt_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0, at the reference rate.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * self.reference_dt_secs as f64
    }

    /// How many ticks span `secs` simulated seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        (secs / self.reference_dt_secs).ceil() as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Total ticks to simulate when driven by `Sim::run`.  Interactive
    /// callers stepping frame-by-frame may ignore this.
    pub total_ticks: u64,

    /// Reference seconds per tick.  Default: 1/60.
    pub reference_dt_secs: f32,

    /// Worker thread count passed to Rayon (with the `parallel` feature).
    /// `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Invoke the observer snapshot hook every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Upper clamp for a single integration step: twice the reference frame.
    /// A stalled render loop produces one long `dt`, not a teleporting swarm.
    #[inline]
    pub fn max_dt_secs(&self) -> f32 {
        2.0 * self.reference_dt_secs
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.reference_dt_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            total_ticks: 0,
            reference_dt_secs: 1.0 / 60.0,
            num_threads: None,
            snapshot_interval_ticks: 0,
        }
    }
}
