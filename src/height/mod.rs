//! Layered noise height synthesis
//!
//! A [`HeightField`] is a pure function from unit-sphere direction to
//! elevation: fractal continents, ridged mountains carved by a mask field,
//! and optional domain warping of the sampling coordinate. It is built once
//! per generation from the seed and noise parameters and is independent of
//! mesh topology, so collaborators can query elevation at arbitrary
//! directions without re-running the mesh pipeline.

pub mod noise;
pub mod ocean;

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::NoiseConfig;
use noise::{fade, fbm, generate_offsets, ridged_fbm};

/// Octave count of the domain-warp channels
const WARP_OCTAVES: usize = 3;

/// Seeded, parameterized elevation field over the unit sphere
///
/// Given the same seed and parameters, `sample` is bit-for-bit reproducible
/// for any direction, independent of subdivision order or chunk boundaries.
#[derive(Debug, Clone)]
pub struct HeightField {
    seed: u32,
    config: NoiseConfig,
    continent_offsets: Vec<Vec3>,
    mountain_offsets: Vec<Vec3>,
    mask_offsets: Vec<Vec3>,
    warp_offsets: [Vec<Vec3>; 3],
}

impl HeightField {
    /// Build a height field from a seed and noise parameters
    ///
    /// Every channel's per-octave sampling offsets are drawn from a single
    /// ChaCha stream seeded here, in a fixed order. Reseeding therefore
    /// regenerates the continent, mountain, mask, and warp offsets together;
    /// there is no way to regenerate one channel out of sync with the rest.
    pub fn new(seed: u32, config: &NoiseConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);

        let continent_offsets = generate_offsets(&mut rng, config.continent_octaves);
        let mountain_offsets = generate_offsets(&mut rng, config.mountain_octaves);
        let mask_offsets = generate_offsets(&mut rng, config.continent_octaves);
        let warp_offsets = [
            generate_offsets(&mut rng, WARP_OCTAVES),
            generate_offsets(&mut rng, WARP_OCTAVES),
            generate_offsets(&mut rng, WARP_OCTAVES),
        ];

        Self {
            seed,
            config: *config,
            continent_offsets,
            mountain_offsets,
            mask_offsets,
            warp_offsets,
        }
    }

    /// Raw elevation at a unit direction, before ocean normalization
    ///
    /// Continents set the base level; ridged mountains are added scaled by
    /// the mask field and by how far above sea the continent field already
    /// is, so ridges never rise out of open ocean.
    pub fn sample(&self, direction: Vec3) -> f32 {
        let cfg = &self.config;
        let dir = self.warp(direction);

        let raw = fbm(
            dir * cfg.continent_frequency,
            self.seed,
            &self.continent_offsets,
            cfg.persistence,
            cfg.lacunarity,
        );
        // Remap to [0,1], ease, recenter to [-1,1], scale
        let eased = fade(((raw + 1.0) * 0.5).clamp(0.0, 1.0));
        let land = (eased * 2.0 - 1.0) * cfg.continent_amplitude;

        let mask_raw = fbm(
            dir * cfg.mask_frequency,
            self.seed,
            &self.mask_offsets,
            cfg.persistence,
            cfg.lacunarity,
        );
        let mask = (((mask_raw + 1.0) * 0.5).clamp(0.0, 1.0)).powf(cfg.mask_power);

        let ridged = ridged_fbm(
            dir * cfg.mountain_frequency,
            self.seed,
            &self.mountain_offsets,
            cfg.persistence,
            cfg.lacunarity,
        );

        let land_weight = if cfg.continent_amplitude > 0.0 {
            (land / cfg.continent_amplitude).clamp(0.0, 1.0)
        } else {
            0.0
        };

        land + ridged * cfg.mountain_amplitude * land_weight * mask
    }

    /// Perturb the sampling direction by a 3-channel fractal noise vector
    ///
    /// Each axis uses its own offset set to decorrelate the channels. The
    /// warped direction is renormalized back onto the unit sphere.
    fn warp(&self, direction: Vec3) -> Vec3 {
        let cfg = &self.config;
        if cfg.warp_strength == 0.0 {
            return direction;
        }

        let p = direction * cfg.warp_frequency;
        let offset = Vec3::new(
            fbm(p, self.seed, &self.warp_offsets[0], cfg.persistence, cfg.lacunarity),
            fbm(p, self.seed, &self.warp_offsets[1], cfg.persistence, cfg.lacunarity),
            fbm(p, self.seed, &self.warp_offsets[2], cfg.persistence, cfg.lacunarity),
        );

        (direction + offset * cfg.warp_strength)
            .try_normalize()
            .unwrap_or(direction)
    }

    /// The seed this field was built from
    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The noise parameters this field was built from
    #[inline]
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_directions() -> Vec<Vec3> {
        vec![
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            Vec3::NEG_X,
            Vec3::new(0.577, 0.577, 0.577).normalize(),
            Vec3::new(-0.3, 0.8, -0.52).normalize(),
        ]
    }

    #[test]
    fn test_sample_determinism() {
        let config = NoiseConfig::default();
        let field_a = HeightField::new(42, &config);
        let field_b = HeightField::new(42, &config);

        for dir in test_directions() {
            // Bit-for-bit equality, not approximate
            assert_eq!(field_a.sample(dir), field_b.sample(dir));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = NoiseConfig::default();
        let field_a = HeightField::new(42, &config);
        let field_b = HeightField::new(999, &config);

        let differing = test_directions()
            .into_iter()
            .filter(|&d| field_a.sample(d) != field_b.sample(d))
            .count();
        assert!(differing > 0, "seed has no effect on the field");
    }

    #[test]
    fn test_zero_amplitudes_flatten_sphere() {
        let config = NoiseConfig {
            continent_amplitude: 0.0,
            mountain_amplitude: 0.0,
            ..Default::default()
        };
        let field = HeightField::new(7, &config);

        for dir in test_directions() {
            assert_eq!(field.sample(dir), 0.0);
        }
    }

    #[test]
    fn test_height_bounded_by_amplitudes() {
        let config = NoiseConfig::default();
        let field = HeightField::new(3, &config);
        let bound = config.continent_amplitude + config.mountain_amplitude;

        for dir in test_directions() {
            let h = field.sample(dir);
            assert!(h.abs() <= bound + 1e-4, "height {} exceeds bound {}", h, bound);
        }
    }

    #[test]
    fn test_warp_disabled_matches_unwarped_direction() {
        let config = NoiseConfig {
            warp_strength: 0.0,
            ..Default::default()
        };
        let field = HeightField::new(5, &config);
        assert_eq!(field.warp(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_warp_stays_on_unit_sphere() {
        let config = NoiseConfig::default();
        let field = HeightField::new(5, &config);

        for dir in test_directions() {
            let warped = field.warp(dir);
            assert!((warped.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_pure_function_of_direction() {
        // Sampling order must not matter: interleaved and sequential
        // evaluation agree exactly.
        let config = NoiseConfig::default();
        let field = HeightField::new(11, &config);

        let dirs = test_directions();
        let sequential: Vec<f32> = dirs.iter().map(|&d| field.sample(d)).collect();
        let reversed: Vec<f32> = dirs.iter().rev().map(|&d| field.sample(d)).collect();

        for (i, &h) in sequential.iter().enumerate() {
            assert_eq!(h, reversed[dirs.len() - 1 - i]);
        }
    }
}
