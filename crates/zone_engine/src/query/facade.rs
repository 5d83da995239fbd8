//! One query object per loaded zone
//!
//! The facade composes the terrain and water engines behind the only
//! surface server movement code and viewers depend on. It holds nothing
//! but the immutable structures built at load, so a zone can be wrapped in
//! an `Arc` and queried from every worker thread without locks.

use std::sync::Arc;

use crate::config::EngineSettings;
use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, GeometryStore, TriangleSets};
use crate::query::zone::{SurfaceHit, ZoneQueryEngine};
use crate::water::{LiquidKind, LiquidVolumeSet, WaterQueryEngine};

/// Spatial queries for one loaded zone
pub struct ZoneQuery {
    terrain: ZoneQueryEngine,
    water: WaterQueryEngine,
}

impl ZoneQuery {
    /// Build the per-zone query structures from freshly loaded data
    ///
    /// This is the one-time construction step; it must finish before the
    /// zone is published to readers. Empty geometry and an empty volume
    /// set are both valid inputs.
    pub fn new(
        store: GeometryStore,
        volumes: LiquidVolumeSet,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            terrain: ZoneQueryEngine::new(Arc::new(store), settings),
            water: WaterQueryEngine::new(volumes),
        }
    }

    /// Highest collidable surface at or below the point
    ///
    /// The movement-tick entry point: `point.z` is the caller's height
    /// hint, normally the entity's current position.
    pub fn best_z_below(&self, point: Vec3) -> Option<SurfaceHit> {
        self.terrain.best_z_below(point, TriangleSets::COLLIDABLE)
    }

    /// Collidable surface nearest to the point along its vertical column
    pub fn closest_z(&self, point: Vec3) -> Option<SurfaceHit> {
        self.terrain.closest_z(point, TriangleSets::COLLIDABLE)
    }

    /// The liquid kind at the point, if it is submerged
    pub fn liquid_at(&self, point: Vec3) -> Option<LiquidKind> {
        self.water.liquid_at(point)
    }

    /// Whether the point is inside any liquid volume
    pub fn is_in_liquid(&self, point: Vec3) -> bool {
        self.water.is_in_liquid(point)
    }

    /// Whether the segment between the points clears all collidable
    /// geometry
    pub fn line_of_sight(&self, a: Vec3, b: Vec3) -> bool {
        self.terrain.line_of_sight(a, b, TriangleSets::COLLIDABLE)
    }

    /// Bounding box of the zone's vertices, or None for an empty zone
    pub fn bounds(&self) -> Option<Aabb> {
        self.terrain.bounds()
    }

    /// The terrain engine, for callers that need set-filtered queries
    pub fn terrain(&self) -> &ZoneQueryEngine {
        &self.terrain
    }

    /// The water engine
    pub fn water(&self) -> &WaterQueryEngine {
        &self.water
    }
}
