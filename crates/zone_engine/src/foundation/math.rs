//! Math utilities and types
//!
//! Provides the fundamental math types used by the query engines.
//!
//! # Coordinate convention
//!
//! The engine is **Z-up**: X and Y span the horizontal plane and Z is
//! vertical. "Below" always means smaller Z. Display clients that prefer a
//! Y-up convention swap axes on their side of the boundary; nothing in this
//! crate does.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type (horizontal plane)
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Unit vector pointing straight down the vertical axis
pub fn down() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Project a point onto the horizontal plane
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.y)
}
