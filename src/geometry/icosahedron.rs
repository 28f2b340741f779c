//! Regular icosahedron on the unit sphere

use glam::Vec3;

use super::cache::PointCache;

/// Golden ratio φ = (1 + √5) / 2
const PHI: f32 = 1.618_034;

/// Build the 12 vertices and 20 faces of a regular icosahedron
///
/// Vertices are the cyclic permutations of `(0, ±1, ±φ)`, registered through
/// the cache so subsequent subdivision dedups against them, and normalized
/// onto the unit sphere by the cache itself. Purely deterministic; the cache
/// is expected to be empty so the returned faces index points 0..11.
pub fn build_icosahedron(cache: &mut PointCache) -> Vec<[u32; 3]> {
    debug_assert!(cache.is_empty());

    let vertices = [
        Vec3::new(-1.0, PHI, 0.0),
        Vec3::new(1.0, PHI, 0.0),
        Vec3::new(-1.0, -PHI, 0.0),
        Vec3::new(1.0, -PHI, 0.0),
        Vec3::new(0.0, -1.0, PHI),
        Vec3::new(0.0, 1.0, PHI),
        Vec3::new(0.0, -1.0, -PHI),
        Vec3::new(0.0, 1.0, -PHI),
        Vec3::new(PHI, 0.0, -1.0),
        Vec3::new(PHI, 0.0, 1.0),
        Vec3::new(-PHI, 0.0, -1.0),
        Vec3::new(-PHI, 0.0, 1.0),
    ];

    for v in vertices {
        cache.get_or_insert(v);
    }

    vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_face_counts() {
        let mut cache = PointCache::new();
        let faces = build_icosahedron(&mut cache);
        assert_eq!(cache.len(), 12);
        assert_eq!(faces.len(), 20);
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let mut cache = PointCache::new();
        build_icosahedron(&mut cache);
        for point in cache.points() {
            assert!(
                (point.length() - 1.0).abs() < 1e-5,
                "vertex off unit sphere: {:?}",
                point
            );
        }
    }

    #[test]
    fn test_faces_reference_valid_vertices() {
        let mut cache = PointCache::new();
        let faces = build_icosahedron(&mut cache);
        for face in &faces {
            for &idx in face {
                assert!((idx as usize) < cache.len());
            }
        }
    }

    #[test]
    fn test_each_vertex_used_five_times() {
        // Every icosahedron vertex belongs to exactly 5 faces
        let mut cache = PointCache::new();
        let faces = build_icosahedron(&mut cache);

        let mut usage = [0usize; 12];
        for face in &faces {
            for &idx in face {
                usage[idx as usize] += 1;
            }
        }
        assert!(usage.iter().all(|&count| count == 5));
    }

    #[test]
    fn test_deterministic() {
        let mut cache_a = PointCache::new();
        let faces_a = build_icosahedron(&mut cache_a);
        let mut cache_b = PointCache::new();
        let faces_b = build_icosahedron(&mut cache_b);

        assert_eq!(faces_a, faces_b);
        assert_eq!(cache_a.points(), cache_b.points());
    }
}
