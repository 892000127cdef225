//! The height field: layered Perlin octaves with a flattened nest clearing.
//!
//! # Shaping pipeline
//!
//! ```text
//! height(x, z) = radial_flatten(
//!     soft_clip( base_octaves(x, z) + mask_gate(x, z) * detail_octaves(x, z) )
//! )
//! ```
//!
//! - **Base pair**: two low-frequency octaves define the large-scale
//!   topology (hills and shallow valleys).
//! - **Masked detail**: three finer octaves add micro-terrain, but only
//!   where a separate very-low-frequency mask channel opens the gate — so
//!   roughness appears in patches instead of uniformly everywhere.
//! - **Valley soft-clip**: heights below −2 are compressed toward −2 by a
//!   0.5 factor, keeping valley floors walkable.
//! - **Radial flatten**: a Hermite smoothstep over `[flatten_inner,
//!   flatten_outer]` zeroes the terrain around the origin so the nest sits
//!   on level ground.
//!
//! Every query is deterministic for a given construction seed and cheap
//! enough to recompute per agent per tick; nothing is cached.

use forage_core::SimRng;
use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};

/// Central-difference step for normal estimation.
const NORMAL_EPS: f32 = 0.1;

/// Noise offsets are drawn uniformly from this span.  Large enough that two
/// instances practically never overlap in noise space.
const OFFSET_SPAN: f32 = 1024.0;

// ── TerrainConfig ─────────────────────────────────────────────────────────────

/// Terrain shape parameters.  Plain data; trusted as-is by the generator.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainConfig {
    /// World extent of the (square) terrain patch, in world units.
    pub size: f32,
    /// Radius around the origin that is fully flattened for the nest.
    pub flatten_inner: f32,
    /// Radius beyond which the terrain regains its full height.
    pub flatten_outer: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            flatten_inner: 6.0,
            flatten_outer: 14.0,
        }
    }
}

// ── HeightField ───────────────────────────────────────────────────────────────

/// Procedural terrain elevation, queryable over all of ℝ².
///
/// Immutable after construction and `Sync`: any number of readers (agents,
/// render collaborators) may query concurrently.
pub struct HeightField {
    config: TerrainConfig,
    noise: Perlin,
    /// Offset applied to the base and detail octaves.
    base_offset: Vec2,
    /// Offset for the detail-gating mask channel, independent of the base so
    /// the two patterns decorrelate.
    mask_offset: Vec2,
}

impl HeightField {
    /// Draw per-instance noise offsets from `rng` and freeze them.
    pub fn new(config: TerrainConfig, rng: &mut SimRng) -> Self {
        let noise = Perlin::new(rng.random::<u32>());
        let base_offset = Vec2::new(
            rng.gen_range(0.0..OFFSET_SPAN),
            rng.gen_range(0.0..OFFSET_SPAN),
        );
        let mask_offset = Vec2::new(
            rng.gen_range(0.0..OFFSET_SPAN),
            rng.gen_range(0.0..OFFSET_SPAN),
        );
        Self { config, noise, base_offset, mask_offset }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// World extent of the terrain patch.
    #[inline]
    pub fn size(&self) -> f32 {
        self.config.size
    }

    /// Half the world extent — the walkable bound along each axis.
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.config.size * 0.5
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Terrain elevation at `(x, z)`.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        // Base pair: large-scale topology.
        let mut h = self.octave(x, z, 0.020, self.base_offset) * 4.0
            + self.octave(x, z, 0.045, self.base_offset) * 1.6;

        // Three finer octaves, gated into patches by the mask channel.
        let mask = self.octave(x, z, 0.012, self.mask_offset);
        let gate = smoothstep(0.1, 0.55, mask);
        if gate > 0.0 {
            let detail = self.octave(x, z, 0.12, self.base_offset) * 0.9
                + self.octave(x, z, 0.25, self.base_offset) * 0.45
                + self.octave(x, z, 0.50, self.base_offset) * 0.22;
            h += detail * gate;
        }

        h = soft_clip_valley(h);

        // Flatten the nest clearing around the origin.
        let r = (x * x + z * z).sqrt();
        h * smoothstep(self.config.flatten_inner, self.config.flatten_outer, r)
    }

    /// Surface normal at `(x, z)` by central difference, always unit length
    /// and never `(0, 0, 0)` — a degenerate gradient yields straight up.
    pub fn normal(&self, x: f32, z: f32) -> Vec3 {
        let e = NORMAL_EPS;
        let dx = self.height(x + e, z) - self.height(x - e, z);
        let dz = self.height(x, z + e) - self.height(x, z - e);
        Vec3::new(-dx, 2.0 * e, -dz)
            .try_normalize()
            .unwrap_or(Vec3::Y)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// One Perlin octave in [-1, 1] at the given frequency and offset.
    #[inline]
    fn octave(&self, x: f32, z: f32, freq: f32, offset: Vec2) -> f32 {
        self.noise.get([
            (x * freq + offset.x) as f64,
            (z * freq + offset.y) as f64,
        ]) as f32
    }
}

// ── Shaping helpers ───────────────────────────────────────────────────────────

/// Hermite smoothstep: 0 at `edge0`, 1 at `edge1`, zero derivative at both.
#[inline]
pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Compress heights below −2 toward −2 by a 0.5 factor.
#[inline]
pub(crate) fn soft_clip_valley(h: f32) -> f32 {
    if h < -2.0 { -2.0 + (h + 2.0) * 0.5 } else { h }
}
