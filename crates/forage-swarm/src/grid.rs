//! Uniform spatial hash over agent positions.
//!
//! Rebuilt from scratch every pass (positions move every tick; nothing is
//! worth persisting) and keyed by truncated cell coordinates.  With the cell
//! size matched to the query radius, a 3×3 cell scan covers every candidate
//! neighbor — this replaces the O(N²) all-pairs loop that would otherwise
//! dominate at tens of thousands of agents.

use glam::Vec2;
use rustc_hash::FxHashMap;

/// One-shot bucketing of agent indices by grid cell.
pub struct SpatialGrid {
    cell_size: f32,
    buckets: FxHashMap<(i32, i32), Vec<u32>>,
}

impl SpatialGrid {
    /// Bucket all `positions` into cells of `cell_size`.
    ///
    /// `cell_size` must be at least the query radius later passed to
    /// [`neighbors_into`][Self::neighbors_into], so the 3×3 scan is complete.
    pub fn build(positions: &[Vec2], cell_size: f32) -> Self {
        let mut buckets: FxHashMap<(i32, i32), Vec<u32>> =
            FxHashMap::with_capacity_and_hasher(positions.len(), Default::default());
        for (i, &p) in positions.iter().enumerate() {
            buckets
                .entry(cell_key(p, cell_size))
                .or_default()
                .push(i as u32);
        }
        Self { cell_size, buckets }
    }

    /// Append every agent index in the 3×3 cell neighborhood of `p` to `out`.
    ///
    /// `out` is not cleared — callers reuse one scratch buffer across agents
    /// and clear it themselves, avoiding per-agent allocation.
    pub fn neighbors_into(&self, p: Vec2, out: &mut Vec<u32>) {
        let (cx, cz) = cell_key(p, self.cell_size);
        for dz in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = self.buckets.get(&(cx + dx, cz + dz)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }

    /// Number of occupied cells (diagnostics / tests).
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }
}

#[inline]
fn cell_key(p: Vec2, cell_size: f32) -> (i32, i32) {
    ((p.x / cell_size).floor() as i32, (p.y / cell_size).floor() as i32)
}
