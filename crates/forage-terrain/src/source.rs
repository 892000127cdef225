//! The `TerrainSource` trait — the seam between the swarm and any terrain
//! implementation.

use glam::Vec3;

/// Read-only terrain queries the swarm needs.
///
/// [`HeightField`][crate::HeightField] is the production implementation;
/// tests substitute flat or analytic terrains.  Implementations must be pure
/// (same input, same output) and `Sync` so the per-agent steering pass can
/// query them from many threads.
pub trait TerrainSource: Sync {
    /// Elevation at ground-plane `(x, z)`.  Defined over all of ℝ².
    fn height(&self, x: f32, z: f32) -> f32;

    /// Unit surface normal at `(x, z)`.  Never the zero vector.
    fn normal(&self, x: f32, z: f32) -> Vec3;
}

impl TerrainSource for crate::HeightField {
    #[inline]
    fn height(&self, x: f32, z: f32) -> f32 {
        crate::HeightField::height(self, x, z)
    }

    #[inline]
    fn normal(&self, x: f32, z: f32) -> Vec3 {
        crate::HeightField::normal(self, x, z)
    }
}

/// Perfectly flat terrain at a fixed elevation.  Useful as a stand-in when
/// the simulation is driven without procedural terrain, and in tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct FlatTerrain {
    pub elevation: f32,
}

impl TerrainSource for FlatTerrain {
    #[inline]
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.elevation
    }

    #[inline]
    fn normal(&self, _x: f32, _z: f32) -> Vec3 {
        Vec3::Y
    }
}
