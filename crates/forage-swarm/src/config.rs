//! Swarm tuning parameters.

use glam::Vec2;

use crate::store::AgentState;

/// Swarm behavior and geometry tuning — a plain value record, trusted as-is
/// (radii non-negative, speeds positive; validation is the configuration
/// collaborator's job).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmConfig {
    /// Number of agents, fixed for the life of the swarm.
    pub agent_count: usize,

    // ── Nest & food geometry ──────────────────────────────────────────────
    /// Ground-plane position of the nest.
    pub nest_position: Vec2,
    /// Initial spawn spread around the nest.
    pub spawn_radius: f32,
    /// Arrival threshold: returning agents inside this switch to exploring.
    pub nest_radius: f32,
    /// Arrival threshold: exploring agents inside this pick up food.
    pub food_radius: f32,
    /// Direct line-of-sight range for spotting food while exploring.
    pub visual_range: f32,
    /// Ramp radius over which direct attraction overrides jitter as an
    /// agent closes on its target (nest or food).
    pub close_range: f32,

    // ── Kinematics ────────────────────────────────────────────────────────
    /// Fixed speed while exploring, world units per second.
    pub speed_exploring: f32,
    /// Fixed speed while returning.
    pub speed_returning: f32,
    /// Maximum heading change per tick while exploring, radians.
    pub max_turn_exploring: f32,
    /// Maximum heading change per tick while returning.  Lower: returning
    /// agents commit to their line more sharply.
    pub max_turn_returning: f32,
    /// Half-angle of the random-walk heading jitter, radians.
    pub heading_jitter: f32,
    /// Upper clamp on a single integration step, seconds.  A stalled frame
    /// advances the swarm by at most this much.
    pub max_step_secs: f32,

    // ── Collision & bounds ────────────────────────────────────────────────
    /// Hard minimum distance between any two agents.
    pub min_separation: f32,
    /// Radius of the soft agent-agent repulsion band.
    pub repulsion_radius: f32,
    /// Safety margin around obstacle footprints for repulsion steering.
    pub obstacle_margin: f32,
    /// Walkable half-extent of the world along each axis.
    pub world_half_extent: f32,
    /// Velocity reflects when an agent strays within this margin of the
    /// world edge.
    pub boundary_margin: f32,
    /// Height of an agent's body above the surface it stands on.
    pub ride_height: f32,
}

impl SwarmConfig {
    /// Fixed speed for a state.  Speed never ramps; each tick resets the
    /// velocity magnitude to exactly this value.
    #[inline]
    pub fn speed(&self, state: AgentState) -> f32 {
        match state {
            AgentState::Exploring => self.speed_exploring,
            AgentState::Returning => self.speed_returning,
        }
    }

    /// Per-tick turn-rate limit for a state, radians.
    #[inline]
    pub fn max_turn(&self, state: AgentState) -> f32 {
        match state {
            AgentState::Exploring => self.max_turn_exploring,
            AgentState::Returning => self.max_turn_returning,
        }
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            agent_count: 256,

            nest_position: Vec2::ZERO,
            spawn_radius: 2.0,
            nest_radius: 2.0,
            food_radius: 1.5,
            visual_range: 8.0,
            close_range: 10.0,

            speed_exploring: 6.0,
            speed_returning: 7.0,
            max_turn_exploring: 0.35,
            max_turn_returning: 0.22,
            heading_jitter: 0.5,
            max_step_secs: 2.0 / 60.0,

            min_separation: 0.6,
            repulsion_radius: 1.2,
            obstacle_margin: 1.5,
            world_half_extent: 50.0,
            boundary_margin: 2.0,
            ride_height: 0.35,
        }
    }
}
