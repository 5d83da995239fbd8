//! Procedural test zone construction
//!
//! Builds an in-memory zone shaped like the content a real loader hands
//! over: a rolling collidable heightfield, a collidable wall, some
//! non-collidable decoration, and a couple of liquid volumes.

use zone_engine::prelude::*;

/// Side length of the generated terrain square
pub const ZONE_SIZE: f32 = 64.0;

/// Terrain grid resolution (cells per side)
const GRID_CELLS: u32 = 32;

/// Everything a zone loader would hand to the query engine
pub struct GeneratedZone {
    /// The triangle store, both sets populated
    pub store: GeometryStore,
    /// Water pool and lava pocket
    pub volumes: LiquidVolumeSet,
}

/// Terrain height at a horizontal position
pub fn terrain_height(x: f32, y: f32) -> f32 {
    3.0 * (x * 0.2).sin() * (y * 0.15).cos()
}

/// Build the demo zone
pub fn generate() -> Result<GeneratedZone, GeometryError> {
    let mut vertices = Vec::new();
    let mut collidable = Vec::new();
    let mut non_collidable = Vec::new();

    // Rolling heightfield across [0, ZONE_SIZE] on both axes
    let step = ZONE_SIZE / GRID_CELLS as f32;
    let stride = GRID_CELLS + 1;
    for gy in 0..=GRID_CELLS {
        for gx in 0..=GRID_CELLS {
            let x = gx as f32 * step;
            let y = gy as f32 * step;
            vertices.push(Vec3::new(x, y, terrain_height(x, y)));
        }
    }
    for gy in 0..GRID_CELLS {
        for gx in 0..GRID_CELLS {
            let a = gy * stride + gx;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            collidable.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    // A wall bisecting the zone, for line-of-sight checks
    let base = vertices.len() as u32;
    vertices.extend_from_slice(&[
        Vec3::new(32.0, 8.0, -4.0),
        Vec3::new(32.0, 24.0, -4.0),
        Vec3::new(32.0, 24.0, 12.0),
        Vec3::new(32.0, 8.0, 12.0),
    ]);
    collidable.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);

    // Non-collidable banner floating over the middle of the zone
    let base = vertices.len() as u32;
    vertices.extend_from_slice(&[
        Vec3::new(28.0, 30.0, 10.0),
        Vec3::new(36.0, 30.0, 10.0),
        Vec3::new(32.0, 34.0, 14.0),
    ]);
    non_collidable.extend_from_slice(&[base, base + 1, base + 2]);

    let store = GeometryStore::from_parts(vertices, &collidable, &non_collidable)?;

    // A square pool in one corner and a triangular lava pocket
    let volumes = LiquidVolumeSet::new(vec![
        LiquidVolume::boxed(
            LiquidKind::Water,
            Aabb::new(Vec3::new(4.0, 4.0, -4.0), Vec3::new(16.0, 16.0, 1.0)),
        ),
        LiquidVolume::prism(
            LiquidKind::Lava,
            vec![
                Vec2::new(44.0, 44.0),
                Vec2::new(58.0, 46.0),
                Vec2::new(50.0, 58.0),
            ],
            -5.0,
            0.5,
        ),
    ]);

    Ok(GeneratedZone { store, volumes })
}
