//! Seeded 3D gradient noise
//!
//! Standard Ken Perlin permutation-table noise with seed-mixed corner
//! hashing, plus the fractal accumulators (fbm, ridged fbm) the height field
//! is built from. Every octave samples at a per-octave offset generated once
//! from the seed, so the field is continuous across regenerations and shows
//! no alignment artifacts at high frequencies.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

// Standard 256-element permutation table from Ken Perlin's reference
// implementation. Must remain unchanged to keep generation deterministic.
const PERM: [u32; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Range of per-octave sampling offsets, generated from the seed
const OFFSET_RANGE: f32 = 256.0;

/// Hash function: combines permutation table lookups with seed
#[inline]
fn hash(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let seed_hash = (seed.wrapping_mul(1103515245).wrapping_add(12345)) >> 16;
    let ix = ((x as u32) ^ seed_hash) & 255;
    let iy = ((y as u32) ^ (seed_hash >> 8)) & 255;
    let iz = ((z as u32) ^ (seed_hash >> 16)) & 255;
    let a = PERM[ix as usize];
    let b = PERM[((a + iy) & 255) as usize];
    PERM[((b + iz) & 255) as usize]
}

/// Gradient dot product from hash value (12 edge vectors of a cube)
#[inline]
fn gradient(hash_value: u32, x: f32, y: f32, z: f32) -> f32 {
    let h = hash_value & 15;

    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        z
    } else {
        x
    };

    let sign_u = if (h & 1) == 0 { -u } else { u };
    let sign_v = if (h & 2) == 0 { -v } else { v };

    sign_u + sign_v
}

/// Quintic smoothstep `6t⁵ - 15t⁴ + 10t³`
///
/// C2-continuous and monotonic on `[0, 1]`; also used as the continent
/// easing curve by the height field.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Sample 3D gradient noise at a position
///
/// # Returns
/// Value in `[-1, 1]`
fn perlin_3d(pos: Vec3, seed: u32) -> f32 {
    let x0 = pos.x.floor() as i32;
    let y0 = pos.y.floor() as i32;
    let z0 = pos.z.floor() as i32;
    let x1 = x0 + 1;
    let y1 = y0 + 1;
    let z1 = z0 + 1;

    // Relative position within the cube
    let xf = pos.x - pos.x.floor();
    let yf = pos.y - pos.y.floor();
    let zf = pos.z - pos.z.floor();

    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    let aaa = hash(x0, y0, z0, seed);
    let aba = hash(x0, y1, z0, seed);
    let aab = hash(x0, y0, z1, seed);
    let abb = hash(x0, y1, z1, seed);
    let baa = hash(x1, y0, z0, seed);
    let bba = hash(x1, y1, z0, seed);
    let bab = hash(x1, y0, z1, seed);
    let bbb = hash(x1, y1, z1, seed);

    let g_aaa = gradient(aaa, xf, yf, zf);
    let g_baa = gradient(baa, xf - 1.0, yf, zf);
    let g_aba = gradient(aba, xf, yf - 1.0, zf);
    let g_bba = gradient(bba, xf - 1.0, yf - 1.0, zf);
    let g_aab = gradient(aab, xf, yf, zf - 1.0);
    let g_bab = gradient(bab, xf - 1.0, yf, zf - 1.0);
    let g_abb = gradient(abb, xf, yf - 1.0, zf - 1.0);
    let g_bbb = gradient(bbb, xf - 1.0, yf - 1.0, zf - 1.0);

    let x00 = lerp(g_aaa, g_baa, u);
    let x10 = lerp(g_aba, g_bba, u);
    let x01 = lerp(g_aab, g_bab, u);
    let x11 = lerp(g_abb, g_bbb, u);
    let y0_val = lerp(x00, x10, v);
    let y1_val = lerp(x01, x11, v);

    lerp(y0_val, y1_val, w)
}

/// Generate per-octave sampling offsets from a shared RNG
///
/// All noise channels draw their offsets from the same seeded RNG in a fixed
/// order, so reseeding regenerates every channel's offsets together.
pub fn generate_offsets(rng: &mut ChaCha8Rng, octaves: usize) -> Vec<Vec3> {
    (0..octaves)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE),
                rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE),
                rng.gen_range(-OFFSET_RANGE..OFFSET_RANGE),
            )
        })
        .collect()
}

/// Fractal Brownian motion over offset octaves
///
/// Accumulates one noise sample per offset at doubling frequency and
/// decaying amplitude, then divides by the accumulated amplitude.
///
/// # Returns
/// Value in `[-1, 1]`
pub fn fbm(position: Vec3, seed: u32, offsets: &[Vec3], persistence: f32, lacunarity: f32) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for offset in offsets {
        total += perlin_3d(position * frequency + *offset, seed) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value == 0.0 {
        return 0.0;
    }
    total / max_value
}

/// Ridged fractal noise for mountain silhouettes
///
/// Per octave the base sample `n` in `[-1, 1]` becomes `(1 - |n|)²`, which
/// peaks sharply along the zero-crossings of the underlying field. The
/// normalized accumulation is remapped to `[-1, 1]` with negatives clamped
/// to zero.
///
/// # Returns
/// Value in `[0, 1]`
pub fn ridged_fbm(
    position: Vec3,
    seed: u32,
    offsets: &[Vec3],
    persistence: f32,
    lacunarity: f32,
) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for offset in offsets {
        let n = perlin_3d(position * frequency + *offset, seed);
        let ridge = 1.0 - n.abs();
        total += ridge * ridge * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value == 0.0 {
        return 0.0;
    }
    (total / max_value * 2.0 - 1.0).max(0.0)
}
