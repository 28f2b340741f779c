//! IcospherePlanet main structure

use glam::Vec3;

use crate::config::{PlanetConfig, TerrainThresholds, MAX_SUBDIVISION_LEVELS};
use crate::error::{PlanetError, Result};
use crate::geometry::{build_icosahedron, subdivide, subdivide_focused, PointCache};
use crate::height::ocean::normalize_height;
use crate::height::HeightField;
use crate::mesh::{build_chunks, GenerationReport, MeshChunk, TerrainType};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Capability marker for anything that can answer planet-surface queries
///
/// Collaborators (placement, collision, forest scattering) resolve this
/// capability at construction time instead of inspecting tags or names at
/// query time. All queries are pure functions of direction and do not
/// require re-running the mesh pipeline.
pub trait PlanetSurface {
    /// Final (ocean-normalized) elevation at a direction
    fn sample_height(&self, direction: Vec3) -> f32;

    /// Terrain class at a direction
    fn sample_terrain_type(&self, direction: Vec3) -> TerrainType;

    /// The water level against which surface heights are classified
    ///
    /// May differ from the configured threshold (legacy rebase mode shifts
    /// it); collaborators replicating land/water decisions must use this.
    fn effective_water_level(&self) -> f32;

    /// The mountain level against which surface heights are classified
    fn effective_mountain_level(&self) -> f32;
}

/// A fully generated icosphere planet
///
/// Holds the canonical vertex set (unit directions plus final elevations),
/// the renderable chunks, and the height field the surface was built from.
/// Regeneration replaces the whole structure; nothing here is mutated in
/// place.
///
/// # Examples
///
/// ```
/// use icosphere_planet::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .detail(PlanetDetail::Custom { levels: 3 }).unwrap()
///     .build()
///     .unwrap();
///
/// let planet = IcospherePlanet::generate(config).unwrap();
/// println!(
///     "{} vertices in {} chunks",
///     planet.vertex_count(),
///     planet.chunks().len()
/// );
/// ```
#[derive(Clone)]
pub struct IcospherePlanet {
    /// Configuration used to generate this planet
    config: PlanetConfig,

    /// Height field the surface was sampled from
    height_field: HeightField,

    /// Canonical unit directions, one per vertex
    directions: Vec<Vec3>,

    /// Final elevation per vertex, ocean-normalized
    elevations: Vec<f32>,

    /// Global triangle list, as produced by subdivision
    triangles: Vec<[u32; 3]>,

    /// Renderable chunks
    chunks: Vec<MeshChunk>,

    /// Partitioning outcome
    report: GenerationReport,

    /// Nearest-vertex lookup over world positions
    #[cfg(feature = "spatial-index")]
    vertex_index: SpatialIndex,
}

impl IcospherePlanet {
    /// Run a full generation pass
    ///
    /// Stages run strictly in order: icosahedron, subdivision, height
    /// synthesis, ocean normalization, classification and chunking. Height
    /// synthesis is the only parallel stage (each point is independent and
    /// the point set is read-only by then); with the `parallel` feature it
    /// fans out across the rayon pool.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for out-of-range parameters (the builder
    /// catches these earlier, but configurations can be hand-built) and
    /// `GenerationFailed` if no geometry was produced.
    pub fn generate(config: PlanetConfig) -> Result<Self> {
        validate(&config)?;

        let mut cache = PointCache::new();
        let faces = build_icosahedron(&mut cache);
        let triangles = match &config.focus {
            Some(focus) => {
                subdivide_focused(&mut cache, faces, config.subdivision_levels(), focus)
            }
            None => subdivide(&mut cache, faces, config.subdivision_levels()),
        };
        let directions = cache.into_points();

        if directions.is_empty() || triangles.is_empty() {
            return Err(PlanetError::GenerationFailed(
                "no geometry produced".to_string(),
            ));
        }

        let height_field = HeightField::new(config.height_seed, &config.noise);

        #[cfg(feature = "parallel")]
        let raw_heights: Vec<f32> = directions
            .par_iter()
            .map(|&direction| height_field.sample(direction))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let raw_heights: Vec<f32> = directions
            .iter()
            .map(|&direction| height_field.sample(direction))
            .collect();

        let water_level = config.thresholds.water_level;
        let elevations: Vec<f32> = raw_heights
            .into_iter()
            .map(|height| normalize_height(height, water_level, &config.ocean))
            .collect();

        let (chunks, report) = build_chunks(
            &directions,
            &elevations,
            &triangles,
            config.radius,
            &effective_thresholds(&config),
            &config.chunks,
        );

        #[cfg(feature = "spatial-index")]
        let vertex_index = {
            let positions: Vec<Vec3> = directions
                .iter()
                .zip(&elevations)
                .map(|(direction, elevation)| *direction * (config.radius + elevation))
                .collect();
            SpatialIndex::new(&positions)
        };

        Ok(Self {
            config,
            height_field,
            directions,
            elevations,
            triangles,
            chunks,
            report,
            #[cfg(feature = "spatial-index")]
            vertex_index,
        })
    }

    /// Get the configuration used to generate this planet
    #[inline]
    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    /// Get the sphere radius
    #[inline]
    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    /// Get the height field backing this planet's surface
    #[inline]
    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    /// Number of canonical vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.directions.len()
    }

    /// Number of triangles produced by subdivision
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Canonical unit directions, one per vertex
    #[inline]
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Final elevation per vertex
    #[inline]
    pub fn elevations(&self) -> &[f32] {
        &self.elevations
    }

    /// Global triangle list over the canonical vertex set
    ///
    /// Visibility LOD filters this list; the chunked output re-bases it into
    /// per-chunk index buffers.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Renderable chunks
    #[inline]
    pub fn chunks(&self) -> &[MeshChunk] {
        &self.chunks
    }

    /// Partitioning outcome, including any dropped-triangle counts
    #[inline]
    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// World position of a canonical vertex
    pub fn vertex_position(&self, index: usize) -> Vec3 {
        self.directions[index] * (self.config.radius + self.elevations[index])
    }

    /// Find the canonical vertex nearest to a world position
    ///
    /// Backed by the k-d tree; this is how raycast hits and placement probes
    /// map onto the generated surface.
    #[cfg(feature = "spatial-index")]
    pub fn find_nearest_vertex(&self, position: Vec3) -> usize {
        self.vertex_index.find_nearest(position)
    }
}

impl PlanetSurface for IcospherePlanet {
    fn sample_height(&self, direction: Vec3) -> f32 {
        let direction = direction.try_normalize().unwrap_or(Vec3::X);
        normalize_height(
            self.height_field.sample(direction),
            self.config.thresholds.water_level,
            &self.config.ocean,
        )
    }

    fn sample_terrain_type(&self, direction: Vec3) -> TerrainType {
        TerrainType::classify(
            self.sample_height(direction),
            &effective_thresholds(&self.config),
        )
    }

    fn effective_water_level(&self) -> f32 {
        effective_thresholds(&self.config).water_level
    }

    fn effective_mountain_level(&self) -> f32 {
        effective_thresholds(&self.config).mountain_level
    }
}

/// Thresholds in the space of final elevations
///
/// Legacy rebase mode shifts every elevation down by the water level, so the
/// classification bands shift with it.
fn effective_thresholds(config: &PlanetConfig) -> TerrainThresholds {
    if config.ocean.preserve_base_shape {
        config.thresholds
    } else {
        TerrainThresholds {
            water_level: 0.0,
            mountain_level: config.thresholds.mountain_level - config.thresholds.water_level,
        }
    }
}

/// Re-validate cross-field invariants of a possibly hand-built configuration
fn validate(config: &PlanetConfig) -> Result<()> {
    if config.radius <= 0.0 || !config.radius.is_finite() {
        return Err(PlanetError::InvalidConfig(format!(
            "radius must be positive (got {})",
            config.radius
        )));
    }
    if config.subdivision_levels() > MAX_SUBDIVISION_LEVELS {
        return Err(PlanetError::InvalidConfig(format!(
            "subdivision levels must be <= {} (got {})",
            MAX_SUBDIVISION_LEVELS,
            config.subdivision_levels()
        )));
    }
    if config.thresholds.water_level >= config.thresholds.mountain_level {
        return Err(PlanetError::InvalidConfig(format!(
            "water level ({}) must be below mountain level ({})",
            config.thresholds.water_level, config.thresholds.mountain_level
        )));
    }
    if !(0.0..=1.0).contains(&config.ocean.flattening_strength) {
        return Err(PlanetError::InvalidConfig(format!(
            "ocean flattening strength must be in [0, 1] (got {})",
            config.ocean.flattening_strength
        )));
    }
    if config.chunks.max_vertices_per_chunk < 3 || config.chunks.max_chunks == 0 {
        return Err(PlanetError::InvalidConfig(
            "chunk limits must allow at least one triangle".to_string(),
        ));
    }
    if let Some(focus) = &config.focus {
        if focus.focus_levels < config.subdivision_levels() {
            return Err(PlanetError::InvalidConfig(format!(
                "focus levels ({}) must be >= base subdivision levels ({})",
                focus.focus_levels,
                config.subdivision_levels()
            )));
        }
        if focus.angular_radius <= 0.0 || focus.angular_radius > std::f32::consts::PI {
            return Err(PlanetError::InvalidConfig(format!(
                "focus angular radius must be in (0, PI] (got {})",
                focus.angular_radius
            )));
        }
        if (focus.direction.length() - 1.0).abs() > 1e-3 {
            return Err(PlanetError::InvalidConfig(
                "focus direction must be a unit vector".to_string(),
            ));
        }
    }
    config.noise.validate()
}
