//! Level-of-detail selection
//!
//! Two independent strategies, either of which may run:
//!
//! - **Distance LOD** picks a subdivision depth from camera distance and
//!   produces a new [`PlanetConfig`](crate::PlanetConfig) for a fresh
//!   generation pass. It never mutates live geometry; regeneration is
//!   all-or-nothing.
//! - **Visibility LOD** masks triangles by a frustum or view-cone test over
//!   a sampled subset of points, propagating visibility to unsampled points
//!   through the nearest sampled neighbor.
//!
//! Recomputation is gated by a frame interval and camera movement/rotation
//! thresholds so neither strategy thrashes at a boundary.

use glam::{Mat4, Vec3, Vec4};

use crate::config::{PlanetConfig, MAX_SUBDIVISION_LEVELS};
use crate::error::{PlanetError, Result};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Distance-based subdivision depth selector
///
/// Targets the full base depth up close, half at mid range, a quarter far
/// out (floored at 1). A new depth is only reported when it differs from the
/// current one AND the camera has moved further than
/// `lod_distance * hysteresis_fraction` since the last switch, which keeps a
/// camera hovering at a band edge from regenerating every frame.
#[derive(Debug, Clone)]
pub struct DistanceLod {
    base_levels: u32,
    lod_distance: f32,
    hysteresis_fraction: f32,
    current_levels: u32,
    last_distance: f32,
}

impl DistanceLod {
    /// Create a selector starting at the base depth
    ///
    /// # Errors
    ///
    /// Rejects a zero base depth, a depth over [`MAX_SUBDIVISION_LEVELS`],
    /// a non-positive LOD distance, and a hysteresis fraction outside
    /// `[0, 1)`.
    pub fn new(base_levels: u32, lod_distance: f32, hysteresis_fraction: f32) -> Result<Self> {
        if base_levels == 0 || base_levels > MAX_SUBDIVISION_LEVELS {
            return Err(PlanetError::InvalidConfig(format!(
                "base levels must be in 1..={} (got {})",
                MAX_SUBDIVISION_LEVELS, base_levels
            )));
        }
        if lod_distance <= 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "LOD distance must be positive (got {})",
                lod_distance
            )));
        }
        if !(0.0..1.0).contains(&hysteresis_fraction) {
            return Err(PlanetError::InvalidConfig(format!(
                "hysteresis fraction must be in [0, 1) (got {})",
                hysteresis_fraction
            )));
        }
        Ok(Self {
            base_levels,
            lod_distance,
            hysteresis_fraction,
            current_levels: base_levels,
            last_distance: 0.0,
        })
    }

    /// Subdivision depth appropriate for a camera distance
    pub fn target_levels(&self, distance: f32) -> u32 {
        let target = if distance <= self.lod_distance {
            self.base_levels
        } else if distance <= 2.0 * self.lod_distance {
            self.base_levels / 2
        } else {
            self.base_levels / 4
        };
        target.max(1)
    }

    /// Feed a camera distance; returns the new depth when a switch is due
    ///
    /// `None` means keep the current mesh: either the target depth matches
    /// the built one, or the camera has not moved past the hysteresis band.
    pub fn update(&mut self, distance: f32) -> Option<u32> {
        let target = self.target_levels(distance);
        if target == self.current_levels {
            return None;
        }
        if (distance - self.last_distance).abs() <= self.lod_distance * self.hysteresis_fraction {
            return None;
        }

        self.current_levels = target;
        self.last_distance = distance;
        Some(target)
    }

    /// Feed a camera distance; returns a reconfigured [`PlanetConfig`] when
    /// a regeneration is due
    ///
    /// The returned configuration is a copy of `config` at the new depth;
    /// the caller decides when to run the fresh generation pass.
    pub fn reconfigure(&mut self, config: &PlanetConfig, distance: f32) -> Option<PlanetConfig> {
        self.update(distance)
            .and_then(|levels| config.with_subdivision_levels(levels).ok())
    }

    /// The depth of the currently built mesh
    #[inline]
    pub fn current_levels(&self) -> u32 {
        self.current_levels
    }
}

/// Six-plane view frustum
///
/// Planes are extracted from a combined `projection * view` matrix
/// (Gribb-Hartmann), assuming glam's `[0, 1]` clip-space depth. A point is
/// inside iff its signed distance to every plane is non-negative.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix
    pub fn from_view_projection(view_projection: Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        Self {
            planes: [
                r3 + r0, // left
                r3 - r0, // right
                r3 + r1, // bottom
                r3 - r1, // top
                r2,      // near
                r3 - r2, // far
            ],
        }
    }

    /// Test whether a world-space point lies inside the frustum
    pub fn contains(&self, point: Vec3) -> bool {
        let homogeneous = point.extend(1.0);
        self.planes.iter().all(|plane| plane.dot(homogeneous) >= 0.0)
    }
}

/// Point-visibility test for visibility LOD
#[derive(Debug, Clone, Copy)]
pub enum VisibilityTest {
    /// Six-plane frustum containment
    Frustum(Frustum),
    /// Angular cone around the camera forward vector
    Cone {
        /// Camera position
        origin: Vec3,
        /// Unit camera forward direction
        forward: Vec3,
        /// Cone half-angle in radians
        half_angle: f32,
    },
}

impl VisibilityTest {
    /// Test a world-space point
    pub fn is_visible(&self, point: Vec3) -> bool {
        match self {
            VisibilityTest::Frustum(frustum) => frustum.contains(point),
            VisibilityTest::Cone {
                origin,
                forward,
                half_angle,
            } => match (point - *origin).try_normalize() {
                Some(to_point) => to_point.dot(*forward) >= half_angle.cos(),
                // A point at the camera origin is trivially visible
                None => true,
            },
        }
    }
}

/// Classify point visibility over a sampled subset
///
/// Only every `1 / sample_rate`-th point is tested; the rest inherit the
/// nearest sampled point's result. With the `spatial-index` feature the
/// nearest-sample lookup goes through a k-d tree; without it a linear scan
/// over the samples is used. A `sample_rate >= 1` tests every point exactly.
pub fn point_visibility(
    positions: &[Vec3],
    test: &VisibilityTest,
    sample_rate: f32,
) -> Vec<bool> {
    if positions.is_empty() {
        return Vec::new();
    }

    let stride = if sample_rate >= 1.0 {
        1
    } else {
        ((1.0 / sample_rate.max(1e-4)).round() as usize).max(1)
    };

    if stride == 1 {
        return positions.iter().map(|&p| test.is_visible(p)).collect();
    }

    let sampled_indices: Vec<usize> = (0..positions.len()).step_by(stride).collect();
    let sampled_positions: Vec<Vec3> = sampled_indices.iter().map(|&i| positions[i]).collect();
    let sampled_flags: Vec<bool> = sampled_positions
        .iter()
        .map(|&p| test.is_visible(p))
        .collect();

    #[cfg(feature = "spatial-index")]
    let nearest_sample = {
        let index = SpatialIndex::new(&sampled_positions);
        move |p: Vec3| index.find_nearest(p)
    };

    #[cfg(not(feature = "spatial-index"))]
    let nearest_sample = |p: Vec3| {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (i, &sample) in sampled_positions.iter().enumerate() {
            let distance = p.distance_squared(sample);
            if distance < best_distance {
                best_distance = distance;
                best = i;
            }
        }
        best
    };

    positions
        .iter()
        .map(|&p| sampled_flags[nearest_sample(p)])
        .collect()
}

/// Mark triangles visible when any of their vertices is visible
pub fn triangle_visibility(triangles: &[[u32; 3]], point_visible: &[bool]) -> Vec<bool> {
    triangles
        .iter()
        .map(|tri| tri.iter().any(|&v| point_visible[v as usize]))
        .collect()
}

/// Drop or thin hidden triangles
///
/// Visible triangles always pass. Hidden triangles are omitted when
/// `back_lod_levels` is `None`; with `Some(k)` every `4^k`-th hidden
/// triangle is kept, matching the 4x-per-level growth of subdivision
/// (`Some(0)` keeps everything).
pub fn filter_triangles(
    triangles: &[[u32; 3]],
    triangle_visible: &[bool],
    back_lod_levels: Option<u32>,
) -> Vec<[u32; 3]> {
    let keep_every = back_lod_levels.map(|levels| 4usize.pow(levels));

    let mut hidden_seen = 0usize;
    triangles
        .iter()
        .zip(triangle_visible)
        .filter_map(|(&tri, &visible)| {
            if visible {
                return Some(tri);
            }
            let keep_every = keep_every?;
            let keep = hidden_seen % keep_every == 0;
            hidden_seen += 1;
            keep.then_some(tri)
        })
        .collect()
}

/// Recompute phase of the visibility selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LodState {
    /// No recompute in flight
    #[default]
    Idle,
    /// A visibility recompute is running; further requests are suppressed
    Recomputing,
}

/// Gate for visibility recomputation frequency
///
/// A recompute is granted only when the configured number of frames has
/// elapsed since the last one AND the camera has moved or rotated past the
/// thresholds. The caller reports completion via
/// [`finish_recompute`](VisibilityGate::finish_recompute).
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    interval_frames: u32,
    movement_threshold: f32,
    rotation_threshold: f32,
    state: LodState,
    frames_since_recompute: u32,
    last_position: Option<Vec3>,
    last_forward: Option<Vec3>,
}

impl VisibilityGate {
    /// Create a gate
    ///
    /// `movement_threshold` is a world-space distance; `rotation_threshold`
    /// is the angle in radians the camera forward must swing.
    pub fn new(interval_frames: u32, movement_threshold: f32, rotation_threshold: f32) -> Self {
        Self {
            interval_frames,
            movement_threshold,
            rotation_threshold,
            state: LodState::Idle,
            frames_since_recompute: 0,
            last_position: None,
            last_forward: None,
        }
    }

    /// Current phase
    #[inline]
    pub fn state(&self) -> LodState {
        self.state
    }

    /// Advance one frame; true when a visibility recompute should run now
    pub fn should_recompute(&mut self, camera_position: Vec3, camera_forward: Vec3) -> bool {
        self.frames_since_recompute = self.frames_since_recompute.saturating_add(1);

        if self.state == LodState::Recomputing {
            return false;
        }
        if self.frames_since_recompute < self.interval_frames {
            return false;
        }

        let moved = match self.last_position {
            None => true,
            Some(last) => last.distance(camera_position) > self.movement_threshold,
        };
        let rotated = match self.last_forward {
            None => true,
            Some(last) => {
                let cos_angle = last.dot(camera_forward.normalize_or_zero()).clamp(-1.0, 1.0);
                cos_angle.acos() > self.rotation_threshold
            }
        };

        if !(moved || rotated) {
            return false;
        }

        self.state = LodState::Recomputing;
        self.frames_since_recompute = 0;
        self.last_position = Some(camera_position);
        self.last_forward = Some(camera_forward.normalize_or_zero());
        true
    }

    /// Report that the recompute finished, returning the gate to idle
    pub fn finish_recompute(&mut self) {
        self.state = LodState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlanetConfigBuilder, PlanetDetail};

    #[test]
    fn test_distance_bands() {
        let lod = DistanceLod::new(8, 100.0, 0.1).unwrap();
        assert_eq!(lod.target_levels(50.0), 8);
        assert_eq!(lod.target_levels(100.0), 8);
        assert_eq!(lod.target_levels(150.0), 4);
        assert_eq!(lod.target_levels(200.0), 4);
        assert_eq!(lod.target_levels(500.0), 2);
    }

    #[test]
    fn test_target_floors_at_one() {
        let lod = DistanceLod::new(1, 100.0, 0.1).unwrap();
        assert_eq!(lod.target_levels(50.0), 1);
        assert_eq!(lod.target_levels(1000.0), 1);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(DistanceLod::new(0, 100.0, 0.1).is_err());
        assert!(DistanceLod::new(11, 100.0, 0.1).is_err());
        assert!(DistanceLod::new(6, 0.0, 0.1).is_err());
        assert!(DistanceLod::new(6, 100.0, 1.0).is_err());
    }

    #[test]
    fn test_update_triggers_on_band_change() {
        let mut lod = DistanceLod::new(8, 100.0, 0.1).unwrap();
        // Within the near band: no change
        assert_eq!(lod.update(50.0), None);
        // Cross into the mid band
        assert_eq!(lod.update(150.0), Some(4));
        assert_eq!(lod.current_levels(), 4);
        // Stay in the mid band
        assert_eq!(lod.update(160.0), None);
    }

    #[test]
    fn test_hysteresis_suppresses_boundary_flicker() {
        let mut lod = DistanceLod::new(8, 100.0, 0.2).unwrap();
        // Switch right past the band edge
        assert_eq!(lod.update(101.0), Some(4));

        // Wobbling back across the edge moves only 2 units, well under the
        // lod_distance * hysteresis = 20 unit band; no switch.
        assert_eq!(lod.update(99.0), None);
        assert_eq!(lod.update(101.5), None);

        // A decisive move back in does switch.
        assert_eq!(lod.update(60.0), Some(8));
    }

    #[test]
    fn test_reconfigure_produces_new_config() {
        let config = PlanetConfigBuilder::new()
            .seed(1)
            .detail(PlanetDetail::Custom { levels: 8 })
            .unwrap()
            .build()
            .unwrap();

        let mut lod = DistanceLod::new(8, 100.0, 0.1).unwrap();
        let reduced = lod.reconfigure(&config, 300.0).unwrap();
        assert_eq!(reduced.subdivision_levels(), 2);
        assert_eq!(reduced.seed, config.seed);
        // Original untouched
        assert_eq!(config.subdivision_levels(), 8);
    }

    fn looking_down_negative_z() -> Frustum {
        let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        Frustum::from_view_projection(projection * view)
    }

    #[test]
    fn test_frustum_contains() {
        let frustum = looking_down_negative_z();

        assert!(frustum.contains(Vec3::new(0.0, 0.0, -5.0)));
        assert!(frustum.contains(Vec3::new(1.0, 1.0, -5.0)));
        // Behind the camera
        assert!(!frustum.contains(Vec3::new(0.0, 0.0, 5.0)));
        // Outside the 90 degree field of view
        assert!(!frustum.contains(Vec3::new(50.0, 0.0, -1.0)));
        // Beyond the far plane
        assert!(!frustum.contains(Vec3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn test_cone_visibility() {
        let test = VisibilityTest::Cone {
            origin: Vec3::ZERO,
            forward: Vec3::X,
            half_angle: 0.5,
        };

        assert!(test.is_visible(Vec3::new(10.0, 0.0, 0.0)));
        assert!(test.is_visible(Vec3::new(10.0, 1.0, 0.0)));
        assert!(!test.is_visible(Vec3::new(-10.0, 0.0, 0.0)));
        assert!(!test.is_visible(Vec3::new(0.0, 10.0, 0.0)));
    }

    #[test]
    fn test_point_visibility_full_sampling() {
        let positions = vec![
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
        ];
        let test = VisibilityTest::Cone {
            origin: Vec3::ZERO,
            forward: Vec3::X,
            half_angle: 0.5,
        };

        let visible = point_visibility(&positions, &test, 1.0);
        assert_eq!(visible, vec![true, false, true]);
    }

    #[test]
    fn test_point_visibility_propagation() {
        // A dense cluster in front and one behind; sampled visibility must
        // propagate to the unsampled cluster members.
        let mut positions = Vec::new();
        for i in 0..200 {
            let jitter = i as f32 * 0.001;
            positions.push(Vec3::new(10.0 + jitter, jitter, 0.0));
        }
        for i in 0..200 {
            let jitter = i as f32 * 0.001;
            positions.push(Vec3::new(-10.0 - jitter, jitter, 0.0));
        }

        let test = VisibilityTest::Cone {
            origin: Vec3::ZERO,
            forward: Vec3::X,
            half_angle: 0.8,
        };

        let visible = point_visibility(&positions, &test, 0.02);
        assert!(visible[..200].iter().all(|&v| v));
        assert!(visible[200..].iter().all(|&v| !v));
    }

    #[test]
    fn test_triangle_visibility_any_vertex() {
        let point_visible = vec![true, false, false, false];
        let triangles = vec![[0, 1, 2], [1, 2, 3]];

        let visible = triangle_visibility(&triangles, &point_visible);
        assert_eq!(visible, vec![true, false]);
    }

    #[test]
    fn test_filter_triangles_omit_hidden() {
        let triangles = vec![[0, 1, 2], [3, 4, 5], [6, 7, 8]];
        let visible = vec![true, false, true];

        let kept = filter_triangles(&triangles, &visible, None);
        assert_eq!(kept, vec![[0, 1, 2], [6, 7, 8]]);
    }

    #[test]
    fn test_filter_triangles_back_density() {
        let triangles: Vec<[u32; 3]> = (0..16).map(|i| [i, i + 1, i + 2]).collect();
        let visible = vec![false; 16];

        // Some(0) keeps all hidden triangles
        assert_eq!(filter_triangles(&triangles, &visible, Some(0)).len(), 16);
        // Some(1) keeps every 4th
        assert_eq!(filter_triangles(&triangles, &visible, Some(1)).len(), 4);
        // Some(2) keeps every 16th
        assert_eq!(filter_triangles(&triangles, &visible, Some(2)).len(), 1);
    }

    #[test]
    fn test_gate_interval() {
        let mut gate = VisibilityGate::new(3, 0.5, 0.1);

        // First eligible frame triggers (no history)
        assert!(!gate.should_recompute(Vec3::ZERO, Vec3::X));
        assert!(!gate.should_recompute(Vec3::ZERO, Vec3::X));
        assert!(gate.should_recompute(Vec3::ZERO, Vec3::X));
        assert_eq!(gate.state(), LodState::Recomputing);

        // While recomputing, nothing triggers
        assert!(!gate.should_recompute(Vec3::new(100.0, 0.0, 0.0), Vec3::X));
        gate.finish_recompute();
        assert_eq!(gate.state(), LodState::Idle);
    }

    #[test]
    fn test_gate_requires_camera_change() {
        let mut gate = VisibilityGate::new(1, 0.5, 0.1);

        assert!(gate.should_recompute(Vec3::ZERO, Vec3::X));
        gate.finish_recompute();

        // Stationary camera: no recompute
        assert!(!gate.should_recompute(Vec3::ZERO, Vec3::X));
        assert!(!gate.should_recompute(Vec3::new(0.1, 0.0, 0.0), Vec3::X));

        // Sufficient movement triggers
        assert!(gate.should_recompute(Vec3::new(1.0, 0.0, 0.0), Vec3::X));
        gate.finish_recompute();

        // Sufficient rotation triggers
        assert!(gate.should_recompute(Vec3::new(1.0, 0.0, 0.0), Vec3::Y));
    }
}
