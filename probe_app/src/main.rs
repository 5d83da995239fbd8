//! Headless zone probe
//!
//! Builds a procedural test zone, then reproduces the readout a debug
//! viewer shows each frame: best Z and liquid state at swept positions,
//! line-of-sight spot checks, and a query throughput measurement.
//!
//! Usage: `RUST_LOG=info zone_probe [settings.toml|settings.ron]`

mod zone_gen;

use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use zone_engine::foundation::time::Stopwatch;
use zone_engine::prelude::*;

const SWEEP_STEPS: u32 = 8;
const THROUGHPUT_QUERIES: u32 = 100_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    zone_engine::foundation::logging::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => EngineSettings::load_from_file(&path)?,
        None => EngineSettings::default(),
    };

    let zone_gen::GeneratedZone { store, volumes } = zone_gen::generate()?;
    info!(
        "generated zone: {} triangles ({} collidable), {} liquid volumes",
        store.triangle_count(),
        store.collidable_count(),
        volumes.len()
    );

    let build = Stopwatch::start_new();
    let zone = ZoneQuery::new(store, volumes, &settings);
    info!("query structures built in {:?}", build.elapsed());

    match zone.bounds() {
        Some(bounds) => info!(
            "zone bounds: ({:.1}, {:.1}, {:.1}) .. ({:.1}, {:.1}, {:.1})",
            bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
        ),
        None => warn!("zone has no geometry"),
    }

    sweep_readout(&zone);
    line_of_sight_checks(&zone);
    throughput(&zone);

    Ok(())
}

/// The viewer-style readout: best Z and liquid state across a probe grid
fn sweep_readout(zone: &ZoneQuery) {
    let step = zone_gen::ZONE_SIZE / SWEEP_STEPS as f32;
    for gy in 0..SWEEP_STEPS {
        for gx in 0..SWEEP_STEPS {
            let x = (gx as f32 + 0.5) * step;
            let y = (gy as f32 + 0.5) * step;
            let probe = Vec3::new(x, y, 50.0);

            let best = zone.best_z_below(probe);
            let best_text = best.map_or_else(
                || "none".to_string(),
                |hit| format!("{:.2}", hit.z),
            );

            // Test submersion just above the ground, where pools sit
            let wade = Vec3::new(x, y, best.map_or(0.0, |hit| hit.z) + 0.1);
            let liquid_text = zone
                .liquid_at(wade)
                .map_or_else(|| "dry".to_string(), |kind| kind.to_string());

            info!("probe ({x:5.1}, {y:5.1}): best z {best_text}, {liquid_text}");
        }
    }
}

fn line_of_sight_checks(zone: &ZoneQuery) {
    let cases = [
        // Through the wall at x = 32
        (Vec3::new(20.0, 16.0, 6.0), Vec3::new(44.0, 16.0, 6.0)),
        // Over the wall's top edge
        (Vec3::new(20.0, 16.0, 20.0), Vec3::new(44.0, 16.0, 20.0)),
        // Alongside the wall, never crossing it
        (Vec3::new(20.0, 40.0, 6.0), Vec3::new(44.0, 40.0, 6.0)),
    ];

    for (a, b) in cases {
        info!(
            "line of sight ({:.0},{:.0},{:.0}) -> ({:.0},{:.0},{:.0}): {}",
            a.x,
            a.y,
            a.z,
            b.x,
            b.y,
            b.z,
            if zone.line_of_sight(a, b) { "clear" } else { "blocked" }
        );
    }
}

fn throughput(zone: &ZoneQuery) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut found = 0u32;

    let watch = Stopwatch::start_new();
    for _ in 0..THROUGHPUT_QUERIES {
        let x = rng.gen_range(0.0..zone_gen::ZONE_SIZE);
        let y = rng.gen_range(0.0..zone_gen::ZONE_SIZE);
        if zone.best_z_below(Vec3::new(x, y, 50.0)).is_some() {
            found += 1;
        }
    }
    let elapsed = watch.elapsed();

    let per_second = f64::from(THROUGHPUT_QUERIES) / elapsed.as_secs_f64();
    info!(
        "{THROUGHPUT_QUERIES} best-z queries in {elapsed:?} ({per_second:.0}/s), {found} hit a surface"
    );
}
