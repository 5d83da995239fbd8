//! # Zone Engine
//!
//! A spatial query engine for static zone geometry.
//!
//! ## Features
//!
//! - **Best-Z Queries**: Highest walkable surface at or below a point
//! - **Liquid Containment**: Tagged water/lava volume tests
//! - **Line of Sight**: Segment-vs-mesh obstruction raycasts
//! - **BVH Index**: Built once at zone load, lock-free concurrent reads
//!
//! ## Quick Start
//!
//! ```rust
//! use zone_engine::prelude::*;
//!
//! fn main() -> Result<(), GeometryError> {
//!     // A single floor triangle at Z = 10, collidable.
//!     let vertices = vec![
//!         Vec3::new(0.0, 0.0, 10.0),
//!         Vec3::new(20.0, 0.0, 10.0),
//!         Vec3::new(0.0, 20.0, 10.0),
//!     ];
//!     let store = GeometryStore::from_parts(vertices, &[0, 1, 2], &[])?;
//!     let volumes = LiquidVolumeSet::new(Vec::new());
//!
//!     let zone = ZoneQuery::new(store, volumes, &EngineSettings::default());
//!     let hit = zone.best_z_below(Vec3::new(2.0, 2.0, 50.0));
//!     assert!(hit.is_some());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod query;
pub mod spatial;
pub mod water;

pub use config::{Config, ConfigError, EngineSettings};
pub use geometry::{GeometryError, GeometryStore, TriangleSets};
pub use query::{SurfaceHit, ZoneQuery, ZoneQueryEngine};
pub use water::{LiquidKind, LiquidRegion, LiquidVolume, LiquidVolumeSet, WaterQueryEngine};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineSettings},
        foundation::math::{Vec2, Vec3},
        geometry::{Aabb, GeometryError, GeometryStore, Ray, Triangle, TriangleSets},
        query::{SurfaceHit, ZoneQuery, ZoneQueryEngine},
        spatial::{Bvh, BvhConfig},
        water::{LiquidKind, LiquidRegion, LiquidVolume, LiquidVolumeSet, WaterQueryEngine},
    };
}
