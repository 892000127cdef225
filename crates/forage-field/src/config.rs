//! Live-tunable pheromone parameters.

/// Pheromone field tuning — a plain value record.
///
/// The field re-reads this on every call instead of caching it at
/// construction: an external tuning panel may mutate it between ticks and
/// the change takes effect the same tick.
///
/// Values are trusted as-is; the configuration collaborator guarantees
/// rates and radii are non-negative and both per-tick fractions lie in
/// `[0, 1)`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PheromoneConfig {
    /// Scales home-channel deposits laid by searching agents.
    pub deposit_rate_search: f32,
    /// Scales food-channel deposits laid by returning agents.
    pub deposit_rate_return: f32,
    /// Fraction of each cell's trail removed per tick, in `[0, 1)`.
    pub evaporation: f32,
    /// Fraction of each cell exchanged with its 4-neighborhood per tick,
    /// in `[0, 1)`.
    pub diffusion: f32,
    /// Base antenna radius in world units; rays reach 6× this.
    pub sensing_radius: f32,
    /// Antenna endpoint jitter, as a fraction of the ray range.
    pub sensing_noise: f32,
    /// Attenuated strengths below this read as "no signal".
    pub min_trail_strength: f32,
}

impl Default for PheromoneConfig {
    fn default() -> Self {
        // Returning trail is the recruitment signal and is laid much heavier
        // than the ambient search trail.
        Self {
            deposit_rate_search: 0.2,
            deposit_rate_return: 0.8,
            evaporation: 0.012,
            diffusion: 0.12,
            sensing_radius: 1.5,
            sensing_noise: 0.15,
            min_trail_strength: 0.05,
        }
    }
}
