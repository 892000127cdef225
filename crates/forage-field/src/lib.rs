//! `forage-field` — the two-channel pheromone trail field.
//!
//! An N×N grid of `home` / `food` scalar trails with diffusion, evaporation,
//! batched deposits, and three read-only sensing queries (point sample,
//! gradient, antenna cone scan).  The grid double-buffers its update step so
//! readers never observe a half-diffused neighborhood.
//!
//! # Tick ordering contract
//!
//! Only [`PheromoneField::update`] swaps buffers; [`PheromoneField::deposit`]
//! always writes into the *current* (post-swap) buffer.  A driver that calls
//! `update()` then flushes the tick's deposits therefore decays each deposit
//! exactly once — fresh trail is laid on top of the already-decayed field,
//! never decayed twice in one tick.

pub mod config;
pub mod field;

#[cfg(test)]
mod tests;

pub use config::PheromoneConfig;
pub use field::{
    AntennaReading, Channel, PheromoneField, TrailDeposit, TRAIL_MAX, WORLD_SPAN,
};
