//! Point canonicalization for seam-free subdivision
//!
//! Two triangles sharing an edge must resolve that edge's midpoint to the
//! same vertex, or the mesh grows seams of near-duplicate points. The cache
//! maps quantized unit-sphere coordinates to vertex indices so every lookup
//! of the same direction returns the same index, regardless of which
//! triangle asked first.

use std::collections::HashMap;

use glam::Vec3;

/// Coordinate tolerance for treating two directions as the same point
pub const POINT_EPSILON: f32 = 1e-4;

/// Direction substituted for degenerate (near-zero) inputs
///
/// A zero vector cannot be normalized; antipodal midpoint cancellation is the
/// one way subdivision can produce one. Substituting a fixed direction keeps
/// the pipeline NaN-free.
const FALLBACK_DIRECTION: Vec3 = Vec3::X;

/// Deduplicating store of unit-sphere points
///
/// Scoped to a single generation pass: built fresh for every regeneration and
/// read-only once height synthesis starts. Insertion is deterministic and
/// order-independent — the same set of directions yields the same index for
/// each direction no matter the insertion order of *distinct* directions
/// relative to their duplicates.
#[derive(Debug, Clone, Default)]
pub struct PointCache {
    points: Vec<Vec3>,
    lookup: HashMap<[i32; 3], u32>,
}

impl PointCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with room for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// Normalize a candidate direction and return its canonical index
    ///
    /// An existing point within [`POINT_EPSILON`] of the candidate is reused;
    /// otherwise the candidate is inserted. Degenerate candidates (length too
    /// small to normalize) resolve to a stable fallback direction instead of
    /// propagating NaN.
    pub fn get_or_insert(&mut self, candidate: Vec3) -> u32 {
        let direction = candidate.try_normalize().unwrap_or(FALLBACK_DIRECTION);
        let key = quantize(direction);

        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }

        let index = self.points.len() as u32;
        self.points.push(direction);
        self.lookup.insert(key, index);
        index
    }

    /// Number of canonical points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points have been inserted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get a point by index
    #[inline]
    pub fn point(&self, index: u32) -> Vec3 {
        self.points[index as usize]
    }

    /// All canonical points, in insertion order
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Consume the cache, keeping only the point list
    pub fn into_points(self) -> Vec<Vec3> {
        self.points
    }
}

/// Quantize a direction onto the lookup grid
///
/// Midpoints of the same edge are computed from the same operands and land on
/// identical coordinates; quantization additionally absorbs sub-epsilon
/// float drift between equivalent computations.
#[inline]
fn quantize(direction: Vec3) -> [i32; 3] {
    let inv = 1.0 / POINT_EPSILON;
    [
        (direction.x * inv).round() as i32,
        (direction.y * inv).round() as i32,
        (direction.z * inv).round() as i32,
    ]
}
