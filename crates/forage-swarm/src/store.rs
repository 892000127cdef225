//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The parallel steering phase needs `&mut AgentRngs` (exclusive mutable
//! access to each agent's RNG) and `&AgentStore` (shared read access to the
//! start-of-tick snapshot) simultaneously.  Rust's borrow checker forbids
//! this if both live inside a single struct.  Keeping RNGs in a separate
//! `AgentRngs` struct resolves the conflict cleanly.

use forage_core::{AgentId, AgentRng};
use glam::Vec2;

use crate::SwarmConfig;

// ── AgentState ────────────────────────────────────────────────────────────────

/// The behavioral state machine.  Exactly two variants — the behavior this
/// models defines no others, so resist adding any.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// Searching outward for food; lays home trail.
    Exploring,
    /// Hauling a find back to the nest; lays food trail.
    Returning,
}

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] to enable
/// simultaneous `&mut AgentRngs` + `&AgentStore` borrows in the parallel
/// steering phase.
///
/// Every draw goes through `&mut`, so `par_iter_mut()` hands each Rayon
/// worker exclusive generator state and the steering phase stays replayable
/// regardless of thread count.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them.  Agents are created once at construction and never
/// destroyed, so the arrays never resize.
///
/// Positions and velocities live on the ground plane (`Vec2 { x, y }` is
/// world `(x, z)`); the vertical coordinate `y` is derived from terrain and
/// obstacle tops every tick, never integrated.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Ground-plane position.
    pub pos: Vec<Vec2>,

    /// Derived vertical coordinate (terrain height + ride height, or an
    /// obstacle top when standing on one).
    pub y: Vec<f32>,

    /// Ground-plane velocity.  Invariant after every tick: its magnitude is
    /// exactly the current state's fixed speed.
    pub vel: Vec<Vec2>,

    /// Short-horizon momentum — an exponentially smoothed heading distinct
    /// from `vel`, blended into steering to damp jittery reversals.
    pub momentum: Vec<Vec2>,

    /// Behavioral state.
    pub state: Vec<AgentState>,
}

impl AgentStore {
    /// Spawn `config.agent_count` agents scattered around the nest with
    /// randomized headings, all exploring, and the paired RNG bank.
    pub fn spawn(config: &SwarmConfig, global_seed: u64) -> (Self, AgentRngs) {
        let count = config.agent_count;
        let mut rngs = AgentRngs::new(count, global_seed);

        let mut pos = Vec::with_capacity(count);
        let mut vel = Vec::with_capacity(count);
        let mut momentum = Vec::with_capacity(count);
        for i in 0..count {
            let rng = &mut rngs.inner[i];
            let heading = rng.unit_vec2();
            pos.push(config.nest_position + rng.in_disc(config.spawn_radius));
            vel.push(heading * config.speed_exploring);
            momentum.push(heading);
        }

        let store = Self {
            count,
            pos,
            y: vec![0.0; count],
            vel,
            momentum,
            state: vec![AgentState::Exploring; count],
        };
        (store, rngs)
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Unit heading of an agent, falling back to +X for a (never expected)
    /// zero velocity rather than dividing by zero.
    #[inline]
    pub fn heading(&self, i: usize) -> Vec2 {
        self.vel[i].try_normalize().unwrap_or(Vec2::X)
    }
}
