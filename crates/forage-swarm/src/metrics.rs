//! Cumulative diagnostic counters.
//!
//! The collision solvers are approximate by design: they stop at a fixed
//! iteration budget instead of looping to exactness.  That is not an error,
//! so it surfaces here instead of in a `Result`.

/// Counters accumulated over the life of a [`Swarm`][crate::Swarm].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmMetrics {
    /// Ticks processed.
    pub ticks: u64,

    /// Separation-pass iterations actually run (≤ 3 per tick).
    pub separation_iterations: u64,

    /// Agent pairs still closer than the minimum separation after the
    /// iteration budget, summed over ticks.  Each residual is bounded by one
    /// push-apart step.
    pub residual_separation_pairs: u64,

    /// Ticks on which an agent still overlapped an obstacle after the 3-pass
    /// push-out budget (overlapping obstacle footprints can do this).
    pub obstacle_budget_exhausted: u64,

    /// Food units picked up (one per arrival event).
    pub food_pickups: u64,
}

impl SwarmMetrics {
    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
