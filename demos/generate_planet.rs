//! Full planet generation walkthrough
//!
//! Run with: `cargo run --example generate_planet`

use icosphere_planet::*;

fn main() {
    println!("Icosphere Planet Generation Demo\n");

    let config = PlanetConfigBuilder::new()
        .seed(42)
        .detail(PlanetDetail::Medium)
        .unwrap()
        .radius(25.0)
        .unwrap()
        .thresholds(0.05, 0.35)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  seed:       {}", config.seed);
    println!("  detail:     {} ({} levels)", config.detail.name(), config.subdivision_levels());
    println!("  radius:     {}", config.radius);
    println!();

    let planet = IcospherePlanet::generate(config).unwrap();

    println!("Generated planet:");
    println!("  vertices:   {}", planet.vertex_count());
    println!("  triangles:  {}", planet.triangle_count());
    println!("  chunks:     {}", planet.chunks().len());
    println!();

    let report = planet.report();
    println!("Report:");
    println!("  emitted triangles:     {}", report.emitted_triangles);
    println!("  cross-chunk triangles: {}", report.cross_chunk_triangles);
    println!("  truncated triangles:   {}", report.truncated_triangles);
    println!("  complete:              {}", report.is_complete());
    println!();

    // Per-class triangle distribution
    let mut water = 0;
    let mut land = 0;
    let mut mountain = 0;
    for chunk in planet.chunks() {
        water += chunk.water_indices.len() / 3;
        land += chunk.land_indices.len() / 3;
        mountain += chunk.mountain_indices.len() / 3;
    }

    let total = (water + land + mountain) as f32;
    println!("Surface distribution:");
    println!("  water:    {:6} ({:.1}%)", water, water as f32 / total * 100.0);
    println!("  land:     {:6} ({:.1}%)", land, land as f32 / total * 100.0);
    println!("  mountain: {:6} ({:.1}%)", mountain, mountain as f32 / total * 100.0);
    println!();

    // Distance LOD walkthrough: a receding camera coarsens the mesh
    let mut lod = DistanceLod::new(planet.config().subdivision_levels(), 100.0, 0.1).unwrap();
    println!("Distance LOD (lod_distance = 100):");
    for distance in [50.0, 150.0, 400.0] {
        match lod.reconfigure(planet.config(), distance) {
            Some(new_config) => println!(
                "  distance {:5}: regenerate at {} levels",
                distance,
                new_config.subdivision_levels()
            ),
            None => println!("  distance {:5}: keep current mesh", distance),
        }
    }
}
