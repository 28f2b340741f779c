//! Planet configuration and builder
//!
//! This module provides configuration types for deterministic icosphere planet
//! generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec3;

use crate::error::{PlanetError, Result};

/// Hard cap on subdivision depth
///
/// Triangle count grows as `20 * 4^levels`; level 10 already produces
/// ~21 million triangles, which is past what any consumer can render.
pub const MAX_SUBDIVISION_LEVELS: u32 = 10;

/// Mesh detail presets mapping to icosphere subdivision depth
///
/// Each preset maps to a subdivision level; vertex count after `n` levels is
/// `10 * 4^n + 2` and triangle count is `20 * 4^n`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetDetail {
    /// 4 levels: 2,562 vertices, 5,120 triangles
    Low,
    /// 5 levels: 10,242 vertices, 20,480 triangles
    Medium,
    /// 6 levels: 40,962 vertices, 81,920 triangles (default)
    High,
    /// 7 levels: 163,842 vertices, 327,680 triangles
    Ultra,
    /// Custom subdivision depth
    Custom {
        /// Number of subdivision levels (0 = bare icosahedron)
        levels: u32,
    },
}

impl PlanetDetail {
    /// Get the subdivision depth for this preset
    pub fn subdivision_levels(self) -> u32 {
        match self {
            PlanetDetail::Low => 4,
            PlanetDetail::Medium => 5,
            PlanetDetail::High => 6,
            PlanetDetail::Ultra => 7,
            PlanetDetail::Custom { levels } => levels,
        }
    }

    /// Get a human-readable name for this preset
    pub fn name(self) -> &'static str {
        match self {
            PlanetDetail::Low => "Low",
            PlanetDetail::Medium => "Medium",
            PlanetDetail::High => "High",
            PlanetDetail::Ultra => "Ultra",
            PlanetDetail::Custom { .. } => "Custom",
        }
    }
}

impl Default for PlanetDetail {
    fn default() -> Self {
        PlanetDetail::High
    }
}

/// Parameters of the layered noise height field
///
/// Frequencies are in cycles per unit-sphere direction; amplitudes are in the
/// same world units as the planet radius. The continent field forms the base
/// elevation; ridged mountains are added on top where the mask permits and
/// only over land.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    /// Base frequency of the continent field (lower = larger continents)
    pub continent_frequency: f32,
    /// Octave count of the continent field
    pub continent_octaves: usize,
    /// Amplitude decay per octave
    pub persistence: f32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Peak-to-sea amplitude of the continent field, in world units
    pub continent_amplitude: f32,
    /// Base frequency of the ridged mountain field
    pub mountain_frequency: f32,
    /// Octave count of the ridged mountain field
    pub mountain_octaves: usize,
    /// Height contribution of fully-masked mountain ridges, in world units
    pub mountain_amplitude: f32,
    /// Frequency of the mountain mask field
    pub mask_frequency: f32,
    /// Exponent applied to the mask; higher values carve mountains into
    /// fewer, sharper regions
    pub mask_power: f32,
    /// Frequency of the domain-warp field
    pub warp_frequency: f32,
    /// Strength of the domain warp (0 disables warping)
    pub warp_strength: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            continent_frequency: 1.2,
            continent_octaves: 5,
            persistence: 0.5,
            lacunarity: 2.0,
            continent_amplitude: 0.5,
            mountain_frequency: 3.0,
            mountain_octaves: 4,
            mountain_amplitude: 0.8,
            mask_frequency: 1.5,
            mask_power: 2.5,
            warp_frequency: 0.8,
            warp_strength: 0.35,
        }
    }
}

impl NoiseConfig {
    /// Validate noise parameters
    ///
    /// Rejects zero octave counts, non-positive frequencies, out-of-range
    /// persistence, and negative amplitudes. Invalid values are errors, not
    /// silently clamped into "working" output.
    pub fn validate(&self) -> Result<()> {
        if self.continent_octaves == 0 || self.mountain_octaves == 0 {
            return Err(PlanetError::InvalidConfig(
                "octave count must be >= 1".to_string(),
            ));
        }
        if self.continent_frequency <= 0.0
            || self.mountain_frequency <= 0.0
            || self.mask_frequency <= 0.0
            || self.warp_frequency <= 0.0
        {
            return Err(PlanetError::InvalidConfig(
                "noise frequencies must be positive".to_string(),
            ));
        }
        if self.persistence <= 0.0 || self.persistence > 1.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "persistence must be in (0, 1] (got {})",
                self.persistence
            )));
        }
        if self.lacunarity < 1.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "lacunarity must be >= 1 (got {})",
                self.lacunarity
            )));
        }
        if self.continent_amplitude < 0.0
            || self.mountain_amplitude < 0.0
            || self.warp_strength < 0.0
        {
            return Err(PlanetError::InvalidConfig(
                "amplitudes and warp strength must be >= 0".to_string(),
            ));
        }
        if self.mask_power <= 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "mask power must be positive (got {})",
                self.mask_power
            )));
        }
        Ok(())
    }
}

/// Elevation thresholds separating water, land, and mountain
///
/// Classification bands are `[-inf, water_level)` water,
/// `[water_level, mountain_level)` land, `[mountain_level, +inf)` mountain.
/// The two levels must stay ordered; unordered thresholds are rejected at
/// the configuration boundary because classification would be undefined.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainThresholds {
    /// Elevation below which terrain is water
    pub water_level: f32,
    /// Elevation at or above which terrain is mountain
    pub mountain_level: f32,
}

impl TerrainThresholds {
    /// Create thresholds, rejecting `water_level >= mountain_level`
    pub fn new(water_level: f32, mountain_level: f32) -> Result<Self> {
        if water_level >= mountain_level {
            return Err(PlanetError::InvalidConfig(format!(
                "water level ({}) must be below mountain level ({})",
                water_level, mountain_level
            )));
        }
        Ok(Self {
            water_level,
            mountain_level,
        })
    }
}

impl Default for TerrainThresholds {
    fn default() -> Self {
        Self {
            water_level: 0.05,
            mountain_level: 0.35,
        }
    }
}

/// Ocean post-processing behavior
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OceanConfig {
    /// Hard-flatten sub-sea terrain to exactly the water level; when false,
    /// sub-sea terrain is progressively blended toward the water level
    pub use_flat_oceans: bool,
    /// Keep land elevations unchanged; when false, the water level is
    /// subtracted from land so it starts at zero (legacy mode)
    pub preserve_base_shape: bool,
    /// Blend strength for progressive flattening, in `[0, 1]`
    pub flattening_strength: f32,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            use_flat_oceans: true,
            preserve_base_shape: true,
            flattening_strength: 1.0,
        }
    }
}

/// Mesh chunking limits
///
/// `max_vertices_per_chunk` respects hardware index-buffer limits (65,535
/// for 16-bit indices, minus slack). `max_chunks` bounds total output;
/// exceeding it truncates remaining geometry with a reported count.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum vertices held by a single chunk
    pub max_vertices_per_chunk: usize,
    /// Maximum number of chunks emitted per generation
    pub max_chunks: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_vertices_per_chunk: 65_000,
            max_chunks: 255,
        }
    }
}

/// Region of increased subdivision density
///
/// The whole sphere is subdivided to the configured base depth first; then
/// only triangles whose centroid direction lies within `angular_radius` of
/// `direction` are subdivided further, up to `focus_levels`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusRegion {
    /// Unit direction at the center of the focus zone
    pub direction: Vec3,
    /// Angular radius of the zone in radians (great-circle distance)
    pub angular_radius: f32,
    /// Total subdivision depth inside the zone
    pub focus_levels: u32,
}

impl FocusRegion {
    /// Create a focus region, normalizing the direction
    ///
    /// # Errors
    ///
    /// Rejects zero-length directions and angular radii outside `(0, PI]`.
    pub fn new(direction: Vec3, angular_radius: f32, focus_levels: u32) -> Result<Self> {
        let direction = direction
            .try_normalize()
            .ok_or_else(|| PlanetError::InvalidConfig("focus direction must be non-zero".to_string()))?;
        if angular_radius <= 0.0 || angular_radius > std::f32::consts::PI {
            return Err(PlanetError::InvalidConfig(format!(
                "focus angular radius must be in (0, PI] (got {})",
                angular_radius
            )));
        }
        if focus_levels > MAX_SUBDIVISION_LEVELS {
            return Err(PlanetError::InvalidConfig(format!(
                "focus levels must be <= {} (got {})",
                MAX_SUBDIVISION_LEVELS, focus_levels
            )));
        }
        Ok(Self {
            direction,
            angular_radius,
            focus_levels,
        })
    }
}

/// Configuration for deterministic icosphere planet generation
///
/// The same configuration always produces the identical planet: vertex
/// positions, heights, classification, and chunk layout are all derived from
/// the seeds and parameters here. Only the configuration needs persisting;
/// geometry is regenerated from it when loading.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetConfig {
    /// Random seed for planet generation
    pub seed: u32,

    /// Seed for the height field (separate from `seed`)
    ///
    /// Allows the same mesh topology with a different elevation layout.
    pub height_seed: u32,

    /// Mesh detail preset (determines subdivision depth)
    pub detail: PlanetDetail,

    /// Sphere radius in world units
    pub radius: f32,

    /// Optional zone of increased subdivision density
    pub focus: Option<FocusRegion>,

    /// Height field noise parameters
    pub noise: NoiseConfig,

    /// Ocean flattening behavior
    pub ocean: OceanConfig,

    /// Water/mountain classification thresholds
    pub thresholds: TerrainThresholds,

    /// Chunking limits
    pub chunks: ChunkConfig,
}

impl PlanetConfig {
    /// Get the base subdivision depth for this configuration
    #[inline]
    pub fn subdivision_levels(&self) -> u32 {
        self.detail.subdivision_levels()
    }

    /// Return a copy of this configuration at a different subdivision depth
    ///
    /// This is how LOD-driven regeneration works: the selector produces a new
    /// immutable configuration and the caller runs a fresh generation pass,
    /// rather than mutating live buffers. A focus region whose depth would
    /// fall below the new base depth is clamped up to it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `levels` exceeds [`MAX_SUBDIVISION_LEVELS`].
    pub fn with_subdivision_levels(&self, levels: u32) -> Result<Self> {
        if levels > MAX_SUBDIVISION_LEVELS {
            return Err(PlanetError::InvalidConfig(format!(
                "subdivision levels must be <= {} (got {})",
                MAX_SUBDIVISION_LEVELS, levels
            )));
        }
        let mut config = *self;
        config.detail = PlanetDetail::Custom { levels };
        if let Some(focus) = &mut config.focus {
            focus.focus_levels = focus.focus_levels.max(levels);
        }
        Ok(config)
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        PlanetConfigBuilder::new().build().unwrap()
    }
}

/// Builder for creating [`PlanetConfig`] with validation
///
/// # Example
///
/// ```rust
/// use icosphere_planet::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .detail(PlanetDetail::Medium).unwrap()
///     .radius(25.0).unwrap()
///     .thresholds(0.0, 0.3).unwrap()
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PlanetConfigBuilder {
    seed: Option<u32>,
    height_seed: Option<u32>,
    detail: PlanetDetail,
    radius: f32,
    focus: Option<FocusRegion>,
    noise: NoiseConfig,
    ocean: OceanConfig,
    thresholds: TerrainThresholds,
    chunks: ChunkConfig,
}

impl PlanetConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random (generated from thread_rng)
    /// - height_seed: same as seed
    /// - detail: High (6 levels)
    /// - radius: 10.0
    /// - no focus region, default noise/ocean/thresholds/chunking
    pub fn new() -> Self {
        Self {
            seed: None,
            height_seed: None,
            detail: PlanetDetail::default(),
            radius: 10.0,
            focus: None,
            noise: NoiseConfig::default(),
            ocean: OceanConfig::default(),
            thresholds: TerrainThresholds::default(),
            chunks: ChunkConfig::default(),
        }
    }

    /// Set the random seed for planet generation
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set a separate height field seed
    ///
    /// If not set, the height seed matches the planet seed.
    pub fn height_seed(mut self, seed: u32) -> Self {
        self.height_seed = Some(seed);
        self
    }

    /// Set the mesh detail preset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a custom depth exceeds
    /// [`MAX_SUBDIVISION_LEVELS`].
    pub fn detail(mut self, detail: PlanetDetail) -> Result<Self> {
        if detail.subdivision_levels() > MAX_SUBDIVISION_LEVELS {
            return Err(PlanetError::InvalidConfig(format!(
                "subdivision levels must be <= {} (got {})",
                MAX_SUBDIVISION_LEVELS,
                detail.subdivision_levels()
            )));
        }
        self.detail = detail;
        Ok(self)
    }

    /// Set the sphere radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius is not positive.
    pub fn radius(mut self, radius: f32) -> Result<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(PlanetError::InvalidConfig(format!(
                "radius must be positive (got {})",
                radius
            )));
        }
        self.radius = radius;
        Ok(self)
    }

    /// Set a focus region for selective subdivision
    ///
    /// The focus depth is checked against the base depth at `build()`, since
    /// the detail preset may be set afterwards.
    pub fn focus(mut self, focus: FocusRegion) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Set the height field noise parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for zero octaves, non-positive frequencies, or
    /// out-of-range persistence/lacunarity.
    pub fn noise(mut self, noise: NoiseConfig) -> Result<Self> {
        noise.validate()?;
        self.noise = noise;
        Ok(self)
    }

    /// Set the ocean flattening behavior
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the flattening strength is outside `[0, 1]`.
    pub fn ocean(mut self, ocean: OceanConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&ocean.flattening_strength) {
            return Err(PlanetError::InvalidConfig(format!(
                "ocean flattening strength must be in [0, 1] (got {})",
                ocean.flattening_strength
            )));
        }
        self.ocean = ocean;
        Ok(self)
    }

    /// Set the water/mountain classification thresholds
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `water_level >= mountain_level`.
    pub fn thresholds(mut self, water_level: f32, mountain_level: f32) -> Result<Self> {
        self.thresholds = TerrainThresholds::new(water_level, mountain_level)?;
        Ok(self)
    }

    /// Set chunking limits
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_vertices_per_chunk < 3` (a chunk must
    /// hold at least one triangle) or `max_chunks == 0`.
    pub fn chunk_limits(mut self, max_vertices_per_chunk: usize, max_chunks: usize) -> Result<Self> {
        if max_vertices_per_chunk < 3 {
            return Err(PlanetError::InvalidConfig(format!(
                "max vertices per chunk must be >= 3 (got {})",
                max_vertices_per_chunk
            )));
        }
        if max_chunks == 0 {
            return Err(PlanetError::InvalidConfig(
                "max chunks must be >= 1".to_string(),
            ));
        }
        self.chunks = ChunkConfig {
            max_vertices_per_chunk,
            max_chunks,
        };
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a focus region is present with fewer levels
    /// than the base subdivision depth (the background cannot be denser than
    /// the focus zone).
    pub fn build(self) -> Result<PlanetConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);
        let height_seed = self.height_seed.unwrap_or(seed);

        if let Some(focus) = &self.focus {
            if focus.focus_levels < self.detail.subdivision_levels() {
                return Err(PlanetError::InvalidConfig(format!(
                    "focus levels ({}) must be >= base subdivision levels ({})",
                    focus.focus_levels,
                    self.detail.subdivision_levels()
                )));
            }
        }

        Ok(PlanetConfig {
            seed,
            height_seed,
            detail: self.detail,
            radius: self.radius,
            focus: self.focus,
            noise: self.noise,
            ocean: self.ocean,
            thresholds: self.thresholds,
            chunks: self.chunks,
        })
    }
}

impl Default for PlanetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
