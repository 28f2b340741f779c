//! Ocean flattening
//!
//! Post-processes raw elevations so sub-sea terrain reads as a water surface
//! instead of inverted mountains. Land is a pass-through unless the legacy
//! rebase mode is active.

use crate::config::OceanConfig;

/// Normalize a raw elevation against the water level
///
/// Sub-sea terrain is either hard-flattened to exactly `water_level` or
/// progressively blended toward it by
/// `lerp(h, water_level, clamp01((water_level - h) / water_level) * strength)`.
/// The blend factor degenerates for a non-positive water level, in which
/// case flattening falls back to hard.
///
/// With `preserve_base_shape` off the water level is subtracted from the
/// flattened result across the board, so land starts at zero and flattened
/// ocean sits at zero with it (legacy rebase mode).
///
/// Monotonic-safe: a sub-sea input never comes out above `water_level`, and
/// the mapping never reorders land relative to flattened ocean.
pub fn normalize_height(raw: f32, water_level: f32, ocean: &OceanConfig) -> f32 {
    let flattened = if raw <= water_level {
        if ocean.use_flat_oceans || water_level <= 0.0 {
            water_level
        } else {
            let t = ((water_level - raw) / water_level).clamp(0.0, 1.0) * ocean.flattening_strength;
            raw + (water_level - raw) * t
        }
    } else {
        raw
    };

    if ocean.preserve_base_shape {
        flattened
    } else {
        flattened - water_level
    }
}
