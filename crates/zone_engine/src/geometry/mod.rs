//! Zone geometry: primitives and the immutable triangle store
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, triangles, axis-aligned boxes and their
//!   intersection tests
//! - [`store`] - The per-zone vertex/index arrays with set tagging
//!
//! Everything here is created once at zone load and read-only afterwards.

pub mod primitives;
pub mod store;

// Re-export commonly used types
pub use primitives::{Aabb, Ray, Triangle};
pub use store::{GeometryError, GeometryStore, TriangleSets};
