//! Shared world records consumed by the swarm: obstacle footprints and food
//! sources.
//!
//! Both are *owned by collaborators* (obstacle management, food respawn
//! logic) and only read — or, for food stock, decremented — by the core.
//! Geometry is expressed on the ground plane: `Vec2 { x, y }` here means
//! world `(x, z)`; the vertical axis is carried separately where needed.

use glam::Vec2;

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// A static circular obstacle footprint.
///
/// The core never mutates obstacles; it uses them for repulsion steering,
/// hard collision push-out, and vertical placement of agents standing on top.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    /// Footprint centre on the ground plane.
    pub center: Vec2,
    /// Effective avoidance radius — agents are pushed to this boundary.
    pub radius: f32,
    /// World-space height of the obstacle's top surface.  Agents whose
    /// footprint position falls inside `radius` rest at this height instead
    /// of the terrain height.
    pub top: f32,
}

impl Obstacle {
    pub fn new(center: Vec2, radius: f32, top: f32) -> Self {
        Self { center, radius, top }
    }

    /// `true` if the ground-plane point lies inside the footprint.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance_squared(self.center) < self.radius * self.radius
    }

    /// How far `p` penetrates into the band `[radius, radius + margin]`
    /// around the footprint, in `[0, 1]`.  0 outside the band, approaching 1
    /// at the footprint boundary.  Used for proximity-scaled repulsion.
    #[inline]
    pub fn penetration(&self, p: Vec2, margin: f32) -> f32 {
        let d = p.distance(self.center);
        if d >= self.radius + margin {
            return 0.0;
        }
        ((self.radius + margin - d) / margin).clamp(0.0, 1.0)
    }
}

// ── FoodSource ────────────────────────────────────────────────────────────────

/// A discrete food source with a remaining-quantity counter.
///
/// The swarm decrements `remaining` on each pickup and signals the event via
/// the observer; replenishment and respawn stay with the owning collaborator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodSource {
    /// Ground-plane position.
    pub position: Vec2,
    /// Units of food left.  0 means exhausted; exhausted sources are ignored
    /// by sight and arrival checks but kept in the list (stable `FoodId`s).
    pub remaining: u32,
}

impl FoodSource {
    pub fn new(position: Vec2, remaining: u32) -> Self {
        Self { position, remaining }
    }

    /// `true` while there is stock left to collect.
    #[inline]
    pub fn has_stock(&self) -> bool {
        self.remaining > 0
    }

    /// Remove one unit.  Returns `false` if the source was already empty.
    #[inline]
    pub fn take_one(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
