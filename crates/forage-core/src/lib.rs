//! `forage-core` — foundational types for the `rust_forage` swarm simulation.
//!
//! This crate is a dependency of every other `forage-*` crate.  It
//! intentionally has no `forage-*` dependencies and minimal external ones
//! (only `rand`, `glam`, and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `FoodId`, `ObstacleId`                      |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                        |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (global)              |
//! | [`world`]   | `Obstacle` footprints, `FoodSource` records            |
//! | [`error`]   | `ForageError`, `ForageResult`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ForageError, ForageResult};
pub use ids::{AgentId, FoodId, ObstacleId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
pub use world::{FoodSource, Obstacle};

// Ground-plane and surface-normal vector types used across the workspace.
pub use glam::{Vec2, Vec3};
