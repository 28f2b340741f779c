//! Icosphere-based planet terrain generation
//!
//! A standalone library for generating spherical terrain meshes from a
//! subdivided icosahedron, suitable for use with any game engine (Bevy,
//! Godot, wgpu, etc.). Each vertex gets an elevation from a layered noise
//! field, the surface is classified into water/land/mountain regions, and
//! the geometry is partitioned into bounded-size chunks.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use icosphere_planet::*;
//!
//! // Generate a planet
//! let config = PlanetConfigBuilder::new()
//!     .seed(42)
//!     .detail(PlanetDetail::Medium).unwrap()
//!     .radius(25.0).unwrap()
//!     .build().unwrap();
//!
//! let planet = IcospherePlanet::generate(config).unwrap();
//! println!("Generated {} triangles", planet.triangle_count());
//!
//! // Query the surface without touching the mesh
//! let terrain = planet.sample_terrain_type(Vec3::new(0.3, 0.9, 0.1));
//! println!("Terrain at query direction: {:?}", terrain);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) nearest-vertex and visibility
//!   lookups using a KD-tree
//! - `parallel` (default): rayon-parallel height synthesis
//! - `serde`: serialization support for configuration

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod height;
pub mod mesh;
pub mod lod;
pub mod planet;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{PlanetError, Result};
pub use config::{
    ChunkConfig, FocusRegion, NoiseConfig, OceanConfig, PlanetConfig, PlanetConfigBuilder,
    PlanetDetail, TerrainThresholds, MAX_SUBDIVISION_LEVELS,
};
pub use height::HeightField;
pub use lod::{
    filter_triangles, point_visibility, triangle_visibility, DistanceLod, Frustum, LodState,
    VisibilityGate, VisibilityTest,
};
pub use mesh::{
    BasicColorMapper, ColorMapper, CustomColorMapper, GenerationReport, MeshChunk, TerrainColor,
    TerrainType,
};
pub use planet::{IcospherePlanet, PlanetSurface};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
