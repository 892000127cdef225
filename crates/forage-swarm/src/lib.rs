//! `forage-swarm` — agent kinematics, steering, and collision resolution.
//!
//! # Two-phase tick
//!
//! ```text
//! Swarm::update(dt, ...):
//!   ① Steer   — per agent, read-only against the start-of-tick snapshot:
//!               boundary reflection, state transition check, desired-
//!               direction synthesis (antenna sensing / direct attraction /
//!               obstacle repulsion / momentum), turn-rate clamp.  Parallel
//!               with the `parallel` feature; each agent writes only its
//!               own intent record.
//!   ② Apply   — sequential, ascending agent index for determinism:
//!               food pickups (exactly one per arrival, nearest source),
//!               soft agent-agent repulsion against start-of-tick
//!               positions, state/velocity commit, dt-clamped integration,
//!               iterative obstacle push-out.
//!   ③ Separate — global agent-agent separation over a uniform spatial
//!               hash, ≤3 iterations, symmetric half-overlap pushes.
//!   ④ Settle  — vertical placement on terrain or obstacle tops, then one
//!               batched trail deposit into the pheromone field.
//! ```
//!
//! Nothing on this path returns an error: degenerate vector math is
//! epsilon-guarded and exhausted iteration budgets surface through
//! [`SwarmMetrics`], not failures.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the steering phase on Rayon's thread pool.        |
//! | `serde`    | Serde derives on config and state types.               |

pub mod collision;
pub mod config;
pub mod grid;
pub mod metrics;
pub mod steering;
pub mod store;
pub mod swarm;

#[cfg(test)]
mod tests;

pub use config::SwarmConfig;
pub use metrics::SwarmMetrics;
pub use store::{AgentRngs, AgentState, AgentStore};
pub use swarm::{FoodEvent, Swarm};
