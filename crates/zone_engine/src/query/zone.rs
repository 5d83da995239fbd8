//! Terrain height and line-of-sight queries
//!
//! Every query casts through the BVH and finishes with exact
//! Möller-Trumbore tests against the surviving candidates. "Nothing found"
//! is a first-class `None`/`true` result, never an error: a column through
//! a gap in a non-manifold mesh simply has no surface.

use std::sync::Arc;

use crate::config::EngineSettings;
use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, GeometryStore, Ray, TriangleSets};
use crate::spatial::Bvh;

/// A surface found below (or nearest to) a query point
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// Height of the surface at the query column
    pub z: f32,
    /// Surface normal of the hit triangle (right-hand rule, so orientation
    /// follows the triangle's winding)
    pub normal: Vec3,
    /// Index of the hit triangle in the zone's [`GeometryStore`]
    pub triangle: u32,
}

/// Height and obstruction queries over one zone's triangle mesh
///
/// Construction happens once at zone load; afterwards the engine is
/// immutable and any number of threads may query it concurrently.
pub struct ZoneQueryEngine {
    store: Arc<GeometryStore>,
    index: Option<Bvh>,
    settings: EngineSettings,
}

impl ZoneQueryEngine {
    /// Build the engine (and its spatial index) over a loaded store
    ///
    /// A store with no usable triangles is a valid zone state: the index is
    /// simply absent and every query answers its empty result.
    pub fn new(store: Arc<GeometryStore>, settings: &EngineSettings) -> Self {
        let index = Bvh::build(&store, &settings.bvh_config());
        Self {
            store,
            index,
            settings: settings.clone(),
        }
    }

    /// The geometry this engine queries
    pub fn store(&self) -> &GeometryStore {
        &self.store
    }

    /// Bounding box of the zone's vertices, or None for an empty zone
    pub fn bounds(&self) -> Option<Aabb> {
        self.store.bounds()
    }

    /// Highest surface at or below `point` in the sets selected by `mask`
    ///
    /// Casts straight down from the given height. Among triangles sharing
    /// an edge at identical Z the winner is undefined; callers get a
    /// correct height either way and must not rely on which triangle is
    /// reported. Returns `None` when no selected triangle spans the column
    /// at or below the point.
    pub fn best_z_below(&self, point: Vec3, mask: u32) -> Option<SurfaceHit> {
        let index = self.index.as_ref()?;

        // Start a hair above the query height so a surface exactly at the
        // point's own Z still registers (t = 0 hits are numerically shaky).
        let origin = Vec3::new(point.x, point.y, point.z + self.settings.surface_epsilon);
        let ray = Ray::downward(origin);
        let max_t = origin.z - index.bounds().min.z + 1.0;

        let mut best: Option<SurfaceHit> = None;
        for candidate in index.query_ray(&ray, max_t) {
            let i = candidate as usize;
            if !TriangleSets::matches(self.store.set_of(i), mask) {
                continue;
            }
            let triangle = self.store.triangle(i);
            if let Some((t, _, _)) = triangle.intersect_ray(&ray) {
                let z = origin.z - t;
                if best.map_or(true, |hit| z > hit.z) {
                    best = Some(SurfaceHit {
                        z,
                        normal: triangle.normal(),
                        triangle: candidate,
                    });
                }
            }
        }
        best
    }

    /// Surface nearest to `point` along its vertical column, above or below
    ///
    /// Used to re-seat an entity that has slipped out of the mesh: unlike
    /// [`Self::best_z_below`] this also considers surfaces overhead.
    pub fn closest_z(&self, point: Vec3, mask: u32) -> Option<SurfaceHit> {
        let index = self.index.as_ref()?;

        let mut best: Option<SurfaceHit> = None;
        let mut best_distance = f32::INFINITY;
        // The column ray starts above everything; its origin height turns
        // a hit's t back into a Z value.
        let top = index.bounds().max.z + 1.0;
        let ray = Ray::downward(Vec3::new(point.x, point.y, top));

        for candidate in index.query_column(point.x, point.y) {
            let i = candidate as usize;
            if !TriangleSets::matches(self.store.set_of(i), mask) {
                continue;
            }
            let triangle = self.store.triangle(i);
            if let Some((t, _, _)) = triangle.intersect_ray(&ray) {
                let z = top - t;
                let distance = (z - point.z).abs();
                if distance < best_distance {
                    best_distance = distance;
                    best = Some(SurfaceHit {
                        z,
                        normal: triangle.normal(),
                        triangle: candidate,
                    });
                }
            }
        }
        best
    }

    /// Whether the straight segment between `a` and `b` is unobstructed by
    /// triangles in the sets selected by `mask`
    ///
    /// Hits within an epsilon of either endpoint are treated as
    /// self-intersection and ignored. The first confirmed blocker ends the
    /// query; purely geometric obstruction makes the test symmetric under
    /// endpoint swap.
    pub fn line_of_sight(&self, a: Vec3, b: Vec3, mask: u32) -> bool {
        let Some(index) = self.index.as_ref() else {
            return true;
        };

        let delta = b - a;
        let distance = delta.magnitude();
        if distance <= self.settings.endpoint_epsilon * 2.0 {
            return true;
        }

        let ray = Ray::new(a, delta);
        let far = distance - self.settings.endpoint_epsilon;
        for candidate in index.query_ray(&ray, far) {
            let i = candidate as usize;
            if !TriangleSets::matches(self.store.set_of(i), mask) {
                continue;
            }
            if let Some((t, _, _)) = self.store.triangle(i).intersect_ray(&ray) {
                if t > self.settings.endpoint_epsilon && t < far {
                    return false;
                }
            }
        }
        true
    }
}
