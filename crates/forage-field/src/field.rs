//! The pheromone grid: storage, decay/diffusion, deposits, and sensing.

use std::f32::consts::{FRAC_1_SQRT_2, PI};

use forage_core::AgentRng;
use glam::Vec2;

use crate::PheromoneConfig;

/// World span covered by the grid: positions map linearly from ±50 world
/// units into grid UV space.
///
/// Deliberately a fixed constant independent of `TerrainConfig::size` — the
/// two extents were independent in the system this models, and visualization
/// collaborators rely on the fixed mapping.  Do not couple them silently.
pub const WORLD_SPAN: f32 = 100.0;

/// Upper clamp on any cell value.  A crate constant rather than a config
/// field: the `[0, TRAIL_MAX]` invariant must hold even while the config is
/// being tuned live.
pub const TRAIL_MAX: f32 = 10.0;

/// Values below this snap to exactly 0 after decay, so unvisited regions
/// converge to true zero instead of accumulating denormals.
const ZERO_SNAP: f32 = 1e-3;

/// Gradient magnitudes below this floor read as "field is flat here".
const GRADIENT_FLOOR: f32 = 0.08;

/// Fraction of each deposit spread over the 8-connected neighborhood.
const DEPOSIT_SPREAD: f32 = 0.25;

/// Antenna cone: 7 rays in 15° steps, spanning ±45° around the heading.
const ANTENNA_RAYS: i32 = 7;
const ANTENNA_STEP: f32 = 15.0 * PI / 180.0;

/// Ray range as a multiple of the configured sensing radius.
const ANTENNA_RANGE_FACTOR: f32 = 6.0;

/// Post-selection heading wobble (radians) so agents don't lock onto
/// perfectly straight trails.
const ANTENNA_WOBBLE: f32 = 0.12;

// ── Channel & cell ────────────────────────────────────────────────────────────

/// The two independent trail channels.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Laid while searching; followed to navigate back to the nest.
    Home,
    /// Laid while hauling food home; followed outward to known food.
    Food,
}

/// One grid cell: both channels, always in `[0, TRAIL_MAX]`.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
struct TrailCell {
    home: f32,
    food: f32,
}

impl TrailCell {
    #[inline]
    fn get(self, channel: Channel) -> f32 {
        match channel {
            Channel::Home => self.home,
            Channel::Food => self.food,
        }
    }

    #[inline]
    fn get_mut(&mut self, channel: Channel) -> &mut f32 {
        match channel {
            Channel::Home => &mut self.home,
            Channel::Food => &mut self.food,
        }
    }
}

// ── Deposit & sensing records ─────────────────────────────────────────────────

/// One agent's trail contribution for the tick, batched into a single
/// [`PheromoneField::deposit`] call by the swarm.
#[derive(Copy, Clone, Debug)]
pub struct TrailDeposit {
    /// Agent's final ground-plane position this tick.
    pub position: Vec2,
    /// Weight on the home channel (1.0 while exploring, else 0.0).
    pub search_amount: f32,
    /// Weight on the food channel (1.0 while returning, else 0.0).
    pub return_amount: f32,
}

/// Result of an antenna cone scan: where the strongest trail lies and how
/// strong it read (after range attenuation).
#[derive(Copy, Clone, Debug)]
pub struct AntennaReading {
    /// Unit direction toward the best sample, with a small random wobble.
    pub direction: Vec2,
    /// Attenuated strength of the best sample; callers weight this against
    /// other steering inputs.
    pub strength: f32,
}

// ── PheromoneField ────────────────────────────────────────────────────────────

/// A square, double-buffered, two-channel trail grid.
///
/// Allocated once at a fixed resolution; never resized.  `update()` is the
/// only operation that swaps buffers — deposits and all queries address the
/// live buffer.
pub struct PheromoneField {
    resolution: usize,
    /// Ping-pong cell arenas, row-major `[z * resolution + x]`.
    buffers: [Vec<TrailCell>; 2],
    /// Which arena is live (readable); `update()` writes the other, then flips.
    live: usize,
}

impl PheromoneField {
    /// Allocate an all-zero grid of `resolution × resolution` cells.
    ///
    /// `resolution` must be at least 1.
    pub fn new(resolution: usize) -> Self {
        assert!(resolution > 0, "pheromone grid resolution must be >= 1");
        let cells = vec![TrailCell::default(); resolution * resolution];
        Self {
            resolution,
            buffers: [cells.clone(), cells],
            live: 0,
        }
    }

    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Width of one grid cell in world units.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        WORLD_SPAN / self.resolution as f32
    }

    // ── Update (decay + diffuse) ──────────────────────────────────────────

    /// Advance decay and diffusion one tick, then swap buffers.
    ///
    /// Per cell, per channel:
    /// `new = ((old*(1-D) + D*mean4) * (1-E))`, snapped to 0 below 1e-3 and
    /// clamped into `[0, TRAIL_MAX]`.  Edge cells read missing neighbors as
    /// themselves (reflecting boundary — no flux across the world edge).
    pub fn update(&mut self, cfg: &PheromoneConfig) {
        let s = self.resolution;
        let d = cfg.diffusion;
        let e = cfg.evaporation;

        let (front, back) = self.buffers.split_at_mut(1);
        let (src, dst) = if self.live == 0 {
            (&*front[0], &mut back[0])
        } else {
            (&*back[0], &mut front[0])
        };

        for cz in 0..s {
            for cx in 0..s {
                // Edge-clamped neighbor reads: a clamped index lands on the
                // cell itself, which is exactly the reflecting boundary.
                let xm = src[cz * s + cx.saturating_sub(1)];
                let xp = src[cz * s + (cx + 1).min(s - 1)];
                let zm = src[cz.saturating_sub(1) * s + cx];
                let zp = src[(cz + 1).min(s - 1) * s + cx];
                let old = src[cz * s + cx];

                let out = &mut dst[cz * s + cx];
                out.home = decay_diffuse(old.home, mean4(xm.home, xp.home, zm.home, zp.home), d, e);
                out.food = decay_diffuse(old.food, mean4(xm.food, xp.food, zm.food, zp.food), d, e);
            }
        }

        self.live ^= 1;
    }

    // ── Deposits ──────────────────────────────────────────────────────────

    /// Apply a batch of agent deposits to the live buffer.
    ///
    /// Each deposit adds `search_amount * rate_search` to the home channel
    /// and `return_amount * rate_return` to the food channel of the agent's
    /// cell, then spreads a fraction over the 8-connected neighborhood
    /// weighted by inverse distance.  All writes are additive clamps, so the
    /// batch is order-independent up to float rounding.
    pub fn deposit(&mut self, cfg: &PheromoneConfig, deposits: &[TrailDeposit]) {
        for d in deposits {
            let home = d.search_amount * cfg.deposit_rate_search;
            let food = d.return_amount * cfg.deposit_rate_return;
            if home > 0.0 {
                self.deposit_one(d.position, Channel::Home, home);
            }
            if food > 0.0 {
                self.deposit_one(d.position, Channel::Food, food);
            }
        }
    }

    fn deposit_one(&mut self, position: Vec2, channel: Channel, amount: f32) {
        let s = self.resolution;
        let (cx, cz) = self.world_to_cell(position);
        let cells = &mut self.buffers[self.live];

        let v = cells[cz * s + cx].get_mut(channel);
        *v = (*v + amount).min(TRAIL_MAX);

        // Inverse-distance weights over the radius-1 disc: cardinals at 1,
        // diagonals at 1/√2, normalized so the spread fraction is exact.
        const W_CARD: f32 = 1.0;
        const W_DIAG: f32 = FRAC_1_SQRT_2;
        const W_TOTAL: f32 = 4.0 * (W_CARD + W_DIAG);

        let spread = amount * DEPOSIT_SPREAD;
        for dz in -1_isize..=1 {
            for dx in -1_isize..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let nx = cx as isize + dx;
                let nz = cz as isize + dz;
                if nx < 0 || nz < 0 || nx >= s as isize || nz >= s as isize {
                    continue; // edge cells lose the out-of-grid share
                }
                let w = if dx != 0 && dz != 0 { W_DIAG } else { W_CARD };
                let v = cells[nz as usize * s + nx as usize].get_mut(channel);
                *v = (*v + spread * w / W_TOTAL).min(TRAIL_MAX);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Nearest-cell strength at a world position.  Positions outside the
    /// ±50-unit span clamp to the border cells, so out-of-world queries are
    /// safe and read the field's edge.
    #[inline]
    pub fn sample(&self, position: Vec2, channel: Channel) -> f32 {
        let s = self.resolution;
        let (cx, cz) = self.world_to_cell(position);
        self.buffers[self.live][cz * s + cx].get(channel)
    }

    /// Finite-difference trail gradient, pointing toward higher strength.
    ///
    /// 8-point stencil: cardinal neighbors at weight 1, diagonals at 0.5.
    /// Returns `None` when the magnitude is below the noise floor — the
    /// field is flat there, which is an expected outcome, not an error.
    pub fn gradient(&self, position: Vec2, channel: Channel) -> Option<Vec2> {
        let (cx, cz) = self.world_to_cell(position);
        let at = |dx: isize, dz: isize| -> f32 {
            let s = self.resolution as isize;
            let x = (cx as isize + dx).clamp(0, s - 1) as usize;
            let z = (cz as isize + dz).clamp(0, s - 1) as usize;
            self.buffers[self.live][z * self.resolution + x].get(channel)
        };

        let gx = (at(1, 0) - at(-1, 0))
            + 0.5 * ((at(1, -1) - at(-1, -1)) + (at(1, 1) - at(-1, 1)));
        let gz = (at(0, 1) - at(0, -1))
            + 0.5 * ((at(-1, 1) - at(-1, -1)) + (at(1, 1) - at(1, -1)));

        let g = Vec2::new(gx, gz);
        if g.length() < GRADIENT_FLOOR {
            return None;
        }
        Some(g.normalize())
    }

    /// Forward-cone antenna scan for the strongest nearby trail.
    ///
    /// Casts 7 rays at 15° steps (±45° around `heading`) out to
    /// `sensing_radius × 6`, jitters each endpoint by `sensing_noise` of
    /// that range, attenuates each sample linearly to zero at the maximum
    /// jittered reach, and picks the best.  `None` if the best attenuated
    /// strength is under `min_trail_strength`.
    pub fn antennae_direction(
        &self,
        cfg:      &PheromoneConfig,
        position: Vec2,
        heading:  Vec2,
        channel:  Channel,
        rng:      &mut AgentRng,
    ) -> Option<AntennaReading> {
        let range = cfg.sensing_radius * ANTENNA_RANGE_FACTOR;
        if range <= 0.0 {
            return None;
        }
        // Linear falloff reaches zero at the farthest point a jittered
        // endpoint can land, so nominal-range samples still register.
        let max_reach = range * (1.0 + cfg.sensing_noise);
        let heading = heading.try_normalize().unwrap_or(Vec2::X);

        let mut best_point = position;
        let mut best_strength = f32::NEG_INFINITY;
        for i in 0..ANTENNA_RAYS {
            let angle = (i - ANTENNA_RAYS / 2) as f32 * ANTENNA_STEP;
            let dir = Vec2::from_angle(angle).rotate(heading);
            let point = position + dir * range + rng.in_disc(cfg.sensing_noise * range);
            let dist = point.distance(position);
            let atten = (1.0 - dist / max_reach).max(0.0);
            let strength = self.sample(point, channel) * atten;
            if strength > best_strength {
                best_strength = strength;
                best_point = point;
            }
        }

        if best_strength < cfg.min_trail_strength {
            return None;
        }
        let toward = (best_point - position).try_normalize()?;
        let direction = Vec2::from_angle(rng.jitter_angle(ANTENNA_WOBBLE)).rotate(toward);
        Some(AntennaReading { direction, strength: best_strength })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// World (x, z) → clamped grid cell.  The position is mapped into [0, 1]
    /// UV space over the fixed ±50 span before indexing, so this never
    /// indexes out of bounds.
    #[inline]
    fn world_to_cell(&self, position: Vec2) -> (usize, usize) {
        let s = self.resolution;
        let u = (position.x / WORLD_SPAN + 0.5).clamp(0.0, 1.0);
        let v = (position.y / WORLD_SPAN + 0.5).clamp(0.0, 1.0);
        let cx = ((u * s as f32) as usize).min(s - 1);
        let cz = ((v * s as f32) as usize).min(s - 1);
        (cx, cz)
    }

    /// World-space centre of a grid cell (for tests and visualization).
    #[inline]
    pub fn cell_center(&self, cx: usize, cz: usize) -> Vec2 {
        let cs = self.cell_size();
        Vec2::new(
            (cx as f32 + 0.5) * cs - WORLD_SPAN * 0.5,
            (cz as f32 + 0.5) * cs - WORLD_SPAN * 0.5,
        )
    }
}

// ── Kernel helpers ────────────────────────────────────────────────────────────

#[inline]
fn mean4(a: f32, b: f32, c: f32, d: f32) -> f32 {
    (a + b + c + d) * 0.25
}

/// One cell-channel update step: blend toward the neighborhood mean, then
/// evaporate, snap tiny residue to zero, clamp into `[0, TRAIL_MAX]`.
#[inline]
fn decay_diffuse(old: f32, neighbor_mean: f32, diffusion: f32, evaporation: f32) -> f32 {
    let v = (old * (1.0 - diffusion) + diffusion * neighbor_mean) * (1.0 - evaporation);
    if v < ZERO_SNAP {
        0.0
    } else {
        v.clamp(0.0, TRAIL_MAX)
    }
}
