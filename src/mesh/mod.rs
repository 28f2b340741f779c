//! Terrain classification and chunked mesh emission
//!
//! Buckets triangles into water/land/mountain index lists by averaged vertex
//! elevation, splits the vertex set into bounded-size chunks, and fixes
//! triangle winding so face normals point away from the sphere center.

mod colors;

pub use colors::{BasicColorMapper, ColorMapper, CustomColorMapper, TerrainColor};

use glam::Vec3;

use crate::config::{ChunkConfig, TerrainThresholds};

/// Surface classification of a point or triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainType {
    /// At or below the water level
    Water,
    /// Between the water and mountain levels
    #[default]
    Land,
    /// At or above the mountain level
    Mountain,
}

impl TerrainType {
    /// Classify a normalized elevation against the thresholds
    ///
    /// The water band is closed at the top (`height <= water_level`) so that
    /// hard-flattened oceans, which sit exactly at the water level, classify
    /// as water.
    pub fn classify(height: f32, thresholds: &TerrainThresholds) -> Self {
        if height <= thresholds.water_level {
            TerrainType::Water
        } else if height >= thresholds.mountain_level {
            TerrainType::Mountain
        } else {
            TerrainType::Land
        }
    }

    /// Check if this terrain is water
    pub fn is_water(&self) -> bool {
        matches!(self, TerrainType::Water)
    }

    /// Check if this terrain is walkable land (including mountains)
    pub fn is_land(&self) -> bool {
        !self.is_water()
    }
}

/// A bounded slice of the generated planet mesh
///
/// Holds a contiguous run of vertices (at most the configured chunk size)
/// with one index buffer per terrain class, all indexing into this chunk's
/// own vertex range. Engine-agnostic: positions are world-space
/// (`direction * (radius + elevation)`), normals are the unit sphere
/// directions, and elevations are the final ocean-normalized heights.
///
/// Chunks are never mutated after generation, only replaced wholesale.
#[derive(Debug, Clone, Default)]
pub struct MeshChunk {
    /// World-space vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Unit direction from sphere center per vertex
    pub normals: Vec<[f32; 3]>,
    /// Final elevation per vertex
    pub elevations: Vec<f32>,
    /// Indices of water triangles (local to this chunk)
    pub water_indices: Vec<u32>,
    /// Indices of land triangles (local to this chunk)
    pub land_indices: Vec<u32>,
    /// Indices of mountain triangles (local to this chunk)
    pub mountain_indices: Vec<u32>,
}

impl MeshChunk {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles across all terrain classes
    pub fn triangle_count(&self) -> usize {
        (self.water_indices.len() + self.land_indices.len() + self.mountain_indices.len()) / 3
    }

    /// Index buffer for one terrain class
    pub fn indices(&self, terrain: TerrainType) -> &[u32] {
        match terrain {
            TerrainType::Water => &self.water_indices,
            TerrainType::Land => &self.land_indices,
            TerrainType::Mountain => &self.mountain_indices,
        }
    }

    /// Check if this chunk holds no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Outcome summary of one partitioning pass
///
/// Partitioning degrades rather than fails: geometry that cannot be emitted
/// is counted here, never dropped silently. Callers seeing nonzero drop
/// counts can raise the chunk limits or accept the truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Vertices produced by subdivision
    pub total_vertices: usize,
    /// Triangles produced by subdivision
    pub total_triangles: usize,
    /// Triangles that made it into a chunk
    pub emitted_triangles: usize,
    /// Triangles spanning two or more chunks, not emitted
    pub cross_chunk_triangles: usize,
    /// Triangles lost to the `max_chunks` cap, not emitted
    pub truncated_triangles: usize,
    /// Chunks emitted
    pub chunk_count: usize,
}

impl GenerationReport {
    /// True when every input triangle was emitted
    pub fn is_complete(&self) -> bool {
        self.cross_chunk_triangles == 0 && self.truncated_triangles == 0
    }
}

/// Partition displaced geometry into classified, bounded chunks
///
/// Vertices are sliced into contiguous runs of at most
/// `max_vertices_per_chunk`. A triangle is assigned to the chunk containing
/// all three of its vertices; triangles straddling a chunk boundary are
/// counted in the report instead of emitted (sizing chunks to hold the whole
/// mesh avoids this entirely). Triangle winding is fixed here, after height
/// displacement, since outward-ness depends on final positions.
pub fn build_chunks(
    directions: &[Vec3],
    elevations: &[f32],
    triangles: &[[u32; 3]],
    radius: f32,
    thresholds: &TerrainThresholds,
    chunk_config: &ChunkConfig,
) -> (Vec<MeshChunk>, GenerationReport) {
    debug_assert_eq!(directions.len(), elevations.len());

    let max_vertices = chunk_config.max_vertices_per_chunk;
    let wanted_chunks = directions.len().div_ceil(max_vertices);
    let chunk_count = wanted_chunks.min(chunk_config.max_chunks);
    let vertex_limit = chunk_count * max_vertices;

    let positions: Vec<Vec3> = directions
        .iter()
        .zip(elevations)
        .map(|(dir, elevation)| *dir * (radius + elevation))
        .collect();

    let mut chunks: Vec<MeshChunk> = (0..chunk_count)
        .map(|c| {
            let start = c * max_vertices;
            let end = ((c + 1) * max_vertices).min(directions.len());
            MeshChunk {
                positions: positions[start..end].iter().map(|p| p.to_array()).collect(),
                normals: directions[start..end].iter().map(|d| d.to_array()).collect(),
                elevations: elevations[start..end].to_vec(),
                ..Default::default()
            }
        })
        .collect();

    let mut report = GenerationReport {
        total_vertices: directions.len(),
        total_triangles: triangles.len(),
        chunk_count,
        ..Default::default()
    };

    for &[a, b, c] in triangles {
        let (a, b, c) = (a as usize, b as usize, c as usize);

        if a >= vertex_limit || b >= vertex_limit || c >= vertex_limit {
            report.truncated_triangles += 1;
            continue;
        }

        let chunk_index = a / max_vertices;
        if b / max_vertices != chunk_index || c / max_vertices != chunk_index {
            report.cross_chunk_triangles += 1;
            continue;
        }

        let average = (elevations[a] + elevations[b] + elevations[c]) / 3.0;
        let terrain = TerrainType::classify(average, thresholds);

        let [i0, i1, i2] = orient_outward([a, b, c], &positions);
        let base = chunk_index * max_vertices;
        let local = [
            (i0 - base) as u32,
            (i1 - base) as u32,
            (i2 - base) as u32,
        ];

        let chunk = &mut chunks[chunk_index];
        let bucket = match terrain {
            TerrainType::Water => &mut chunk.water_indices,
            TerrainType::Land => &mut chunk.land_indices,
            TerrainType::Mountain => &mut chunk.mountain_indices,
        };
        bucket.extend_from_slice(&local);
        report.emitted_triangles += 1;
    }

    if report.cross_chunk_triangles > 0 {
        log::warn!(
            "{} triangles span chunk boundaries and were not emitted",
            report.cross_chunk_triangles
        );
    }
    if report.truncated_triangles > 0 {
        log::warn!(
            "chunk limit {} reached: {} triangles truncated",
            chunk_config.max_chunks,
            report.truncated_triangles
        );
    }

    (chunks, report)
}

/// Flip a triangle whose face normal points toward the sphere center
///
/// Outward-ness is judged at the triangle's displaced centroid, so the check
/// must run after all height displacement.
fn orient_outward(triangle: [usize; 3], positions: &[Vec3]) -> [usize; 3] {
    let [a, b, c] = triangle;
    let (v0, v1, v2) = (positions[a], positions[b], positions[c]);
    let normal = (v1 - v0).cross(v2 - v0);
    let centroid = (v0 + v1 + v2) / 3.0;

    if normal.dot(centroid) < 0.0 {
        [a, c, b]
    } else {
        [a, b, c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{build_icosahedron, subdivide, PointCache};

    fn icosphere(levels: u32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
        let mut cache = PointCache::new();
        let faces = build_icosahedron(&mut cache);
        let faces = subdivide(&mut cache, faces, levels);
        (cache.into_points(), faces)
    }

    fn default_thresholds() -> TerrainThresholds {
        TerrainThresholds {
            water_level: 0.05,
            mountain_level: 0.35,
        }
    }

    #[test]
    fn test_classification_bands() {
        let thresholds = default_thresholds();
        assert_eq!(TerrainType::classify(-1.0, &thresholds), TerrainType::Water);
        assert_eq!(TerrainType::classify(0.05, &thresholds), TerrainType::Water);
        assert_eq!(TerrainType::classify(0.06, &thresholds), TerrainType::Land);
        assert_eq!(TerrainType::classify(0.34, &thresholds), TerrainType::Land);
        assert_eq!(TerrainType::classify(0.35, &thresholds), TerrainType::Mountain);
        assert_eq!(TerrainType::classify(2.0, &thresholds), TerrainType::Mountain);
    }

    #[test]
    fn test_terrain_helpers() {
        assert!(TerrainType::Water.is_water());
        assert!(!TerrainType::Water.is_land());
        assert!(TerrainType::Land.is_land());
        assert!(TerrainType::Mountain.is_land());
    }

    #[test]
    fn test_single_chunk_holds_everything() {
        let (directions, triangles) = icosphere(2);
        let elevations = vec![0.2; directions.len()];
        let config = ChunkConfig::default();

        let (chunks, report) = build_chunks(
            &directions,
            &elevations,
            &triangles,
            10.0,
            &default_thresholds(),
            &config,
        );

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].vertex_count(), 162);
        assert_eq!(report.emitted_triangles, 320);
        assert!(report.is_complete());
    }

    #[test]
    fn test_chunk_vertex_slicing() {
        // 250 vertices with a cap of 100 split into exactly 100/100/50
        let directions: Vec<Vec3> = (0..250)
            .map(|i| {
                let t = i as f32 * 0.025;
                Vec3::new(t.cos(), (i as f32 * 0.013).sin(), t.sin()).normalize()
            })
            .collect();
        let elevations = vec![0.0; 250];

        let config = ChunkConfig {
            max_vertices_per_chunk: 100,
            max_chunks: 255,
        };
        let (chunks, report) = build_chunks(
            &directions,
            &elevations,
            &[],
            10.0,
            &default_thresholds(),
            &config,
        );

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].vertex_count(), 100);
        assert_eq!(chunks[1].vertex_count(), 100);
        assert_eq!(chunks[2].vertex_count(), 50);
        assert_eq!(report.chunk_count, 3);
    }

    #[test]
    fn test_every_triangle_in_exactly_one_bucket() {
        let (directions, triangles) = icosphere(2);
        // Mix of water, land, and mountain by latitude band
        let elevations: Vec<f32> = directions.iter().map(|d| d.y * 0.5).collect();

        let (chunks, report) = build_chunks(
            &directions,
            &elevations,
            &triangles,
            10.0,
            &default_thresholds(),
            &ChunkConfig::default(),
        );

        let bucketed: usize = chunks
            .iter()
            .map(|c| {
                c.water_indices.len() + c.land_indices.len() + c.mountain_indices.len()
            })
            .sum::<usize>()
            / 3;
        assert_eq!(bucketed, report.emitted_triangles);
        assert_eq!(bucketed, triangles.len());

        let water: usize = chunks.iter().map(|c| c.water_indices.len() / 3).sum();
        let mountain: usize = chunks.iter().map(|c| c.mountain_indices.len() / 3).sum();
        assert!(water > 0, "expected some water triangles");
        assert!(mountain > 0, "expected some mountain triangles");
    }

    #[test]
    fn test_winding_points_outward() {
        let (directions, triangles) = icosphere(2);
        let elevations: Vec<f32> = directions.iter().map(|d| (d.x * 3.0).sin() * 0.4).collect();
        let radius = 10.0;

        let (chunks, _) = build_chunks(
            &directions,
            &elevations,
            &triangles,
            radius,
            &default_thresholds(),
            &ChunkConfig::default(),
        );

        for chunk in &chunks {
            for terrain in [TerrainType::Water, TerrainType::Land, TerrainType::Mountain] {
                for tri in chunk.indices(terrain).chunks(3) {
                    let p = |i: u32| Vec3::from(chunk.positions[i as usize]);
                    let (v0, v1, v2) = (p(tri[0]), p(tri[1]), p(tri[2]));
                    let normal = (v1 - v0).cross(v2 - v0);
                    let centroid = (v0 + v1 + v2) / 3.0;
                    assert!(normal.dot(centroid) >= 0.0, "inward-facing triangle");
                }
            }
        }
    }

    #[test]
    fn test_cross_chunk_triangles_reported() {
        let (directions, triangles) = icosphere(1);
        let elevations = vec![0.2; directions.len()];

        // 42 vertices with a cap of 30 forces two chunks; the icosphere's
        // connectivity guarantees boundary-spanning triangles.
        let config = ChunkConfig {
            max_vertices_per_chunk: 30,
            max_chunks: 255,
        };
        let (chunks, report) = build_chunks(
            &directions,
            &elevations,
            &triangles,
            10.0,
            &default_thresholds(),
            &config,
        );

        assert_eq!(chunks.len(), 2);
        assert!(report.cross_chunk_triangles > 0);
        assert_eq!(
            report.emitted_triangles + report.cross_chunk_triangles,
            report.total_triangles
        );
        assert!(!report.is_complete());
    }

    #[test]
    fn test_max_chunks_truncation_reported() {
        let (directions, triangles) = icosphere(1);
        let elevations = vec![0.2; directions.len()];

        let config = ChunkConfig {
            max_vertices_per_chunk: 30,
            max_chunks: 1,
        };
        let (chunks, report) = build_chunks(
            &directions,
            &elevations,
            &triangles,
            10.0,
            &default_thresholds(),
            &config,
        );

        assert_eq!(chunks.len(), 1);
        assert!(report.truncated_triangles > 0);
        assert_eq!(
            report.emitted_triangles + report.cross_chunk_triangles + report.truncated_triangles,
            report.total_triangles
        );
    }

    #[test]
    fn test_world_positions_scale_with_elevation() {
        let directions = vec![Vec3::X, Vec3::Y];
        let elevations = vec![0.5, -0.25];
        let radius = 10.0;

        let (chunks, _) = build_chunks(
            &directions,
            &elevations,
            &[],
            radius,
            &default_thresholds(),
            &ChunkConfig::default(),
        );

        let p0 = Vec3::from(chunks[0].positions[0]);
        let p1 = Vec3::from(chunks[0].positions[1]);
        assert!((p0.length() - 10.5).abs() < 1e-4);
        assert!((p1.length() - 9.75).abs() < 1e-4);
    }

    #[test]
    fn test_orient_outward_flips_inward_triangle() {
        let positions = vec![
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
            Vec3::new(10.0, 0.0, 1.0),
        ];

        let kept = orient_outward([0, 1, 2], &positions);
        let flipped = orient_outward([0, 2, 1], &positions);
        // Both orders resolve to the same outward-facing winding
        assert_eq!(kept, flipped);

        let (v0, v1, v2) = (
            positions[kept[0]],
            positions[kept[1]],
            positions[kept[2]],
        );
        let normal = (v1 - v0).cross(v2 - v0);
        let centroid = (v0 + v1 + v2) / 3.0;
        assert!(normal.dot(centroid) >= 0.0);
    }
}
