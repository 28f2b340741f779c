//! Spatial indexing for nearest-point lookups
//!
//! Backs two queries: mapping an arbitrary position (raycast hit, placement
//! probe) to the nearest mesh vertex, and propagating sampled visibility to
//! unsampled points during visibility LOD. Both need nearest-neighbor in
//! O(log n); the naive linear scan is quadratic over the whole mesh.
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use glam::Vec3;
#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;

/// Immutable k-d tree over a fixed point set
///
/// Built once per generation (or per visibility recompute) and queried
/// read-only afterwards, matching the all-or-nothing regeneration model.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build an index from a point set
    ///
    /// Indices returned by queries refer to positions in this slice.
    pub fn new(points: &[Vec3]) -> Self {
        let entries: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&entries),
        }
    }

    /// Find the index of the point nearest to a position
    pub fn find_nearest(&self, position: Vec3) -> usize {
        let query = position.to_array();
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as usize
    }
}
