//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! This means:
//!
//! - Agents never share RNG state (no contention, no ordering dependency).
//! - Heading jitter, antenna ray noise, and initial spawn spread all replay
//!   bit-identically for a given global seed, regardless of thread count.
//! - All RNG calls are local to the owning thread; no synchronisation needed.
//!
//! There is deliberately no ambient/thread-local generator anywhere in the
//! workspace: every random draw flows through one of these two wrappers.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Create one per agent at simulation init; store in a parallel `Vec<AgentRng>`
/// alongside the other SoA arrays.  Access is always through `&mut`, so a
/// Rayon worker holds exclusive slices and agents never share generator state.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    // ── Steering helpers ──────────────────────────────────────────────────

    /// A unit vector with uniformly random heading.
    #[inline]
    pub fn unit_vec2(&mut self) -> Vec2 {
        Vec2::from_angle(self.0.gen_range(0.0..TAU))
    }

    /// A signed angle uniform in `[-max, max]` radians.
    ///
    /// Returns 0.0 for `max <= 0` so callers can pass a disabled jitter
    /// setting without branching.
    #[inline]
    pub fn jitter_angle(&mut self, max: f32) -> f32 {
        if max <= 0.0 {
            return 0.0;
        }
        self.0.gen_range(-max..=max)
    }

    /// A point uniform over the disc of radius `radius` centred at origin.
    ///
    /// Uses the sqrt radial transform (no rejection loop, constant cost).
    #[inline]
    pub fn in_disc(&mut self, radius: f32) -> Vec2 {
        let r = radius * self.0.gen_range(0.0f32..=1.0).sqrt();
        self.unit_vec2() * r
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (terrain noise offsets, spawn
/// layout, exogenous events).
///
/// Used only in single-threaded or explicitly synchronised contexts.  If you
/// need parallel randomness, give each worker thread its own `SimRng` seeded
/// from this one via [`SimRng::child`].
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — useful for
    /// seeding per-subsystem RNGs deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
