//! Surface sampling without the mesh pipeline
//!
//! Run with: `cargo run --example sample_terrain`
//!
//! Shows how placement collaborators (tree scattering, spawn points) query
//! elevation and terrain class at arbitrary directions through the
//! `PlanetSurface` capability.

use icosphere_planet::*;

fn main() {
    println!("Terrain Sampling Demo\n");

    let config = PlanetConfigBuilder::new()
        .seed(42)
        .detail(PlanetDetail::Custom { levels: 3 })
        .unwrap()
        .build()
        .unwrap();

    let planet = IcospherePlanet::generate(config).unwrap();
    let surface: &dyn PlanetSurface = &planet;

    println!("Sampling terrain at various directions:");
    println!("{:-<60}", "");

    let directions = [
        (Vec3::new(0.0, 1.0, 0.0), "North pole"),
        (Vec3::new(0.0, -1.0, 0.0), "South pole"),
        (Vec3::new(1.0, 0.0, 0.0), "Equator (0 deg)"),
        (Vec3::new(0.0, 0.0, 1.0), "Equator (90 deg)"),
        (Vec3::new(0.707, 0.707, 0.0), "Mid-latitude"),
        (Vec3::new(0.5, 0.5, 0.5), "Random point"),
    ];

    for (direction, label) in directions {
        let height = surface.sample_height(direction);
        let terrain = surface.sample_terrain_type(direction);
        println!("{:18} -> {:+.4}  {:?}", label, height, terrain);
    }

    println!("\n{:-<60}", "");
    println!("Counting terrain classes over a sample sweep:");
    println!("{:-<60}", "");

    let mut counts = std::collections::HashMap::new();
    let samples = 1000;

    for i in 0..samples {
        // Evenly distributed directions via golden-angle spiral
        let theta = 2.0 * std::f32::consts::PI * (i as f32 * 0.618_034).fract();
        let cos_phi = 1.0 - 2.0 * (i as f32 + 0.5) / samples as f32;
        let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();

        let direction = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
        *counts.entry(surface.sample_terrain_type(direction)).or_insert(0) += 1;
    }

    for terrain in [TerrainType::Water, TerrainType::Land, TerrainType::Mountain] {
        let count = counts.get(&terrain).copied().unwrap_or(0);
        println!(
            "{:10} {:5} ({:.1}%)",
            format!("{:?}", terrain),
            count,
            count as f32 / samples as f32 * 100.0
        );
    }

    println!("\nEffective water level:    {:+.4}", surface.effective_water_level());
    println!("Effective mountain level: {:+.4}", surface.effective_mountain_level());
}
