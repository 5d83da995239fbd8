//! Spatial partitioning for the static zone mesh
//!
//! A bounding-volume hierarchy built once over the triangle store lets a
//! ray query or a vertical column touch a logarithmic number of nodes
//! instead of every triangle. The structure is immutable after
//! construction; concurrent queries need no synchronization.

pub mod bvh;

// Re-export commonly used types
pub use bvh::{Bvh, BvhConfig, RayCandidates};
