//! `forage-terrain` — procedural height-field queries for the rust_forage
//! swarm simulation.
//!
//! The terrain is a pure function of `(x, z)`: no mesh, no cache, no mutable
//! state beyond the noise offsets drawn at construction.  Rendering
//! collaborators tessellate it however they like; the swarm only ever asks
//! [`HeightField::height`] and [`HeightField::normal`].

pub mod heightfield;
pub mod source;


pub use heightfield::{HeightField, TerrainConfig};
pub use source::{FlatTerrain, TerrainSource};
