//! `forage-sim` — tick loop orchestrator for the rust_forage simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Field  — decay + diffuse both trail channels (double-buffer swap).
//!   ② Swarm  — steer / apply / separate / settle; agents read the decayed
//!              field and write this tick's deposits into it.
//!   ③ Events — pickup and depletion callbacks, in ascending agent order.
//!   ④ Hooks  — on_tick_end every tick; on_snapshot at the configured
//!              interval.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Steering runs on a Rayon pool sized from `num_threads`.  |
//! | `serde`    | Serde derives through the whole stack.                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use forage_core::{FoodSource, SimConfig, SimRng, Vec2};
//! use forage_field::PheromoneConfig;
//! use forage_sim::{NoopObserver, SimBuilder};
//! use forage_swarm::SwarmConfig;
//! use forage_terrain::{HeightField, TerrainConfig};
//!
//! let config = SimConfig { seed: 42, total_ticks: 2_000, ..SimConfig::default() };
//! let terrain = HeightField::new(TerrainConfig::default(), &mut SimRng::new(config.seed));
//! let mut sim = SimBuilder::new(config, SwarmConfig::default(),
//!                               PheromoneConfig::default(), terrain)
//!     .foods(vec![FoodSource::new(Vec2::new(30.0, 35.0), 100)])
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::{SimBuilder, DEFAULT_FIELD_RESOLUTION};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
