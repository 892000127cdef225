//! Fluent builder for constructing a [`Sim`].

use forage_core::{FoodSource, ForageError, Obstacle, SimConfig};
use forage_field::{PheromoneConfig, PheromoneField};
use forage_swarm::{Swarm, SwarmConfig};
use forage_terrain::TerrainSource;

use crate::{Sim, SimError, SimResult};

/// Trail grid resolution used when [`SimBuilder::field_resolution`] is not
/// called.  128² cells over the fixed trail extent ≈ 0.78 world units per
/// cell.
pub const DEFAULT_FIELD_RESOLUTION: usize = 128;

// `u16::MAX` is the invalid-id sentinel, so id-carrying lists may hold at
// most `u16::MAX - 1` entries.
fn check_id_capacity(what: &'static str, got: usize) -> SimResult<()> {
    let max = u16::MAX as usize - 1;
    if got > max {
        return Err(ForageError::CapacityExceeded { what, got, max }.into());
    }
    Ok(())
}

/// Fluent builder for [`Sim<T>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, total ticks, reference frame interval, …
/// - [`SwarmConfig`] — agent count, speeds, radii
/// - [`PheromoneConfig`] — trail deposit/decay/sensing tuning
/// - `T: TerrainSource` — the terrain (e.g.
///   [`HeightField`][forage_terrain::HeightField], or
///   [`FlatTerrain`][forage_terrain::FlatTerrain] in tests)
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                      |
/// |------------------------|------------------------------|
/// | `.obstacles(v)`        | none                         |
/// | `.foods(v)`            | none                         |
/// | `.field_resolution(n)` | `DEFAULT_FIELD_RESOLUTION`   |
///
/// # Example
///
/// ```rust,ignore
/// let mut rng = SimRng::new(config.seed);
/// let terrain = HeightField::new(TerrainConfig::default(), &mut rng);
/// let mut sim = SimBuilder::new(config, SwarmConfig::default(),
///                               PheromoneConfig::default(), terrain)
///     .foods(vec![FoodSource::new(Vec2::new(30.0, 35.0), 100)])
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<T: TerrainSource> {
    config:       SimConfig,
    swarm_config: SwarmConfig,
    trail_config: PheromoneConfig,
    terrain:      T,
    obstacles:    Option<Vec<Obstacle>>,
    foods:        Option<Vec<FoodSource>>,
    resolution:   Option<usize>,
}

impl<T: TerrainSource> SimBuilder<T> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:       SimConfig,
        swarm_config: SwarmConfig,
        trail_config: PheromoneConfig,
        terrain:      T,
    ) -> Self {
        Self {
            config,
            swarm_config,
            trail_config,
            terrain,
            obstacles:  None,
            foods:      None,
            resolution: None,
        }
    }

    /// Supply static obstacle footprints.
    pub fn obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = Some(obstacles);
        self
    }

    /// Supply food sources.  Their list indices become stable `FoodId`s.
    pub fn foods(mut self, foods: Vec<FoodSource>) -> Self {
        self.foods = Some(foods);
        self
    }

    /// Override the trail grid resolution (cells per side).
    pub fn field_resolution(mut self, resolution: usize) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    ///
    /// The swarm's per-step clamp is overwritten with
    /// [`SimConfig::max_dt_secs`] so there is a single source of truth for
    /// the frame interval.
    pub fn build(self) -> SimResult<Sim<T>> {
        let resolution = self.resolution.unwrap_or(DEFAULT_FIELD_RESOLUTION);
        if resolution == 0 {
            return Err(SimError::Config("field resolution must be > 0".into()));
        }
        if !(self.config.reference_dt_secs > 0.0) {
            return Err(SimError::Config(format!(
                "reference_dt_secs must be positive, got {}",
                self.config.reference_dt_secs
            )));
        }

        let obstacles = self.obstacles.unwrap_or_default();
        let foods = self.foods.unwrap_or_default();

        // IDs are u16-indexed; reject lists the handles cannot address.
        check_id_capacity("food sources", foods.len())?;
        check_id_capacity("obstacles", obstacles.len())?;

        let mut swarm_config = self.swarm_config;
        swarm_config.max_step_secs = self.config.max_dt_secs();
        let swarm = Swarm::new(swarm_config, self.config.seed);

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
            // None: use Rayon's implicit global pool.
            None => None,
        };

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            terrain: self.terrain,
            field: PheromoneField::new(resolution),
            trail_config: self.trail_config,
            swarm,
            obstacles,
            foods,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
