//! Recursive edge-midpoint subdivision
//!
//! Each level replaces every triangle `(A, B, C)` with four children built
//! from the cached, renormalized edge midpoints. Midpoints go through the
//! [`PointCache`], which is the sole seam-avoidance mechanism: two triangles
//! sharing an edge resolve that edge's midpoint to the same vertex index.

use glam::Vec3;

use super::cache::PointCache;
use crate::config::FocusRegion;

/// Subdivide every triangle `levels` times
///
/// `levels = 0` returns the input unchanged. After `n` levels on a closed
/// icosphere the cache holds `10 * 4^n + 2` points and the mesh
/// `20 * 4^n` triangles.
pub fn subdivide(
    cache: &mut PointCache,
    triangles: Vec<[u32; 3]>,
    levels: u32,
) -> Vec<[u32; 3]> {
    let mut triangles = triangles;
    for _ in 0..levels {
        triangles = split_level(cache, &triangles, |_| true);
    }
    triangles
}

/// Subdivide uniformly, then keep refining only inside a focus zone
///
/// The whole sphere is first subdivided to `background_levels`; each further
/// level up to `focus.focus_levels` splits only triangles whose centroid
/// direction lies within the focus region's angular radius. Triangles
/// outside pass through unchanged.
///
/// The resulting mesh density is non-uniform, and triangles straddling the
/// zone boundary meet finer neighbors at unshared midpoints. These
/// T-junctions are an accepted artifact of selective subdivision; no
/// stitching pass runs.
pub fn subdivide_focused(
    cache: &mut PointCache,
    triangles: Vec<[u32; 3]>,
    background_levels: u32,
    focus: &FocusRegion,
) -> Vec<[u32; 3]> {
    let mut triangles = subdivide(cache, triangles, background_levels);

    let cos_radius = focus.angular_radius.cos();
    for _ in background_levels..focus.focus_levels {
        triangles = split_level(cache, &triangles, |centroid| {
            // Great-circle distance test via the cosine, avoiding acos per tri
            centroid.normalize_or_zero().dot(focus.direction) >= cos_radius
        });
    }
    triangles
}

/// Run one subdivision level over all triangles passing `should_split`
fn split_level<F>(
    cache: &mut PointCache,
    triangles: &[[u32; 3]],
    should_split: F,
) -> Vec<[u32; 3]>
where
    F: Fn(Vec3) -> bool,
{
    let mut output = Vec::with_capacity(triangles.len() * 4);

    for &[a, b, c] in triangles {
        let pa = cache.point(a);
        let pb = cache.point(b);
        let pc = cache.point(c);

        if !should_split((pa + pb + pc) / 3.0) {
            output.push([a, b, c]);
            continue;
        }

        let mab = cache.get_or_insert((pa + pb) * 0.5);
        let mbc = cache.get_or_insert((pb + pc) * 0.5);
        let mca = cache.get_or_insert((pc + pa) * 0.5);

        output.push([a, mab, mca]);
        output.push([mab, b, mbc]);
        output.push([mca, mbc, c]);
        output.push([mab, mbc, mca]);
    }

    output
}
