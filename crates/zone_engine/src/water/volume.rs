//! Liquid volume primitives
//!
//! A liquid volume is a tagged region of space: an axis-aligned box or a
//! horizontal polygon footprint extruded over a vertical range. Volumes are
//! tested independently of the collision mesh.

use crate::foundation::math::{horizontal, Vec2, Vec3};
use crate::geometry::Aabb;

/// The kind of liquid a volume holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidKind {
    /// Ordinary water
    Water,
    /// Lava
    Lava,
    /// Deep water that entities sink in
    VWater,
    /// Slime
    Slime,
    /// Walkable ice sheet
    Ice,
    /// Water under an ice sheet
    IceWater,
}

impl std::fmt::Display for LiquidKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Water => "water",
            Self::Lava => "lava",
            Self::VWater => "vwater",
            Self::Slime => "slime",
            Self::Ice => "ice",
            Self::IceWater => "icewater",
        };
        write!(f, "{name}")
    }
}

/// The geometric region a liquid volume occupies
#[derive(Debug, Clone)]
pub enum LiquidRegion {
    /// An axis-aligned box
    Box(Aabb),

    /// A convex horizontal polygon extruded over a vertical range
    Prism {
        /// Polygon corners in the horizontal plane, in winding order
        footprint: Vec<Vec2>,
        /// Bottom of the volume
        min_z: f32,
        /// Top (surface) of the volume
        max_z: f32,
    },
}

/// A tagged region of liquid
#[derive(Debug, Clone)]
pub struct LiquidVolume {
    /// What fills this region
    pub kind: LiquidKind,
    /// Where the region is
    pub region: LiquidRegion,
}

impl LiquidVolume {
    /// Create a box-shaped volume
    pub fn boxed(kind: LiquidKind, bounds: Aabb) -> Self {
        Self {
            kind,
            region: LiquidRegion::Box(bounds),
        }
    }

    /// Create an extruded-polygon volume
    pub fn prism(kind: LiquidKind, footprint: Vec<Vec2>, min_z: f32, max_z: f32) -> Self {
        Self {
            kind,
            region: LiquidRegion::Prism {
                footprint,
                min_z,
                max_z,
            },
        }
    }

    /// Whether the point lies inside this volume
    ///
    /// The vertical range is closed on both ends: a point exactly at the
    /// liquid surface counts as submerged.
    pub fn contains(&self, point: Vec3) -> bool {
        match &self.region {
            LiquidRegion::Box(bounds) => bounds.contains_point(point),
            LiquidRegion::Prism {
                footprint,
                min_z,
                max_z,
            } => {
                point.z >= *min_z
                    && point.z <= *max_z
                    && point_in_polygon(horizontal(point), footprint)
            }
        }
    }

    /// Horizontal extent of the volume, as (min, max) corners
    pub fn xy_bounds(&self) -> (Vec2, Vec2) {
        match &self.region {
            LiquidRegion::Box(bounds) => (
                Vec2::new(bounds.min.x, bounds.min.y),
                Vec2::new(bounds.max.x, bounds.max.y),
            ),
            LiquidRegion::Prism { footprint, .. } => {
                let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
                let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
                for corner in footprint {
                    min.x = min.x.min(corner.x);
                    min.y = min.y.min(corner.y);
                    max.x = max.x.max(corner.x);
                    max.y = max.y.max(corner.y);
                }
                (min, max)
            }
        }
    }
}

/// Crossing-number point-in-polygon test in the horizontal plane
///
/// Casts a ray toward +X and counts edge crossings; odd means inside.
fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_box() -> LiquidVolume {
        LiquidVolume::boxed(
            LiquidKind::Water,
            Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 5.0)),
        )
    }

    #[test]
    fn test_box_contains() {
        let volume = water_box();
        assert!(volume.contains(Vec3::new(5.0, 5.0, 2.0)));
        assert!(!volume.contains(Vec3::new(5.0, 5.0, 6.0)));
        assert!(!volume.contains(Vec3::new(11.0, 5.0, 2.0)));
    }

    #[test]
    fn test_box_surface_is_submerged() {
        // Closed vertical range on both ends
        let volume = water_box();
        assert!(volume.contains(Vec3::new(5.0, 5.0, 5.0)));
        assert!(volume.contains(Vec3::new(5.0, 5.0, 0.0)));
    }

    #[test]
    fn test_prism_contains() {
        // Triangular pond footprint
        let volume = LiquidVolume::prism(
            LiquidKind::Lava,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 10.0),
            ],
            -2.0,
            3.0,
        );

        assert!(volume.contains(Vec3::new(2.0, 2.0, 0.0)));
        // Inside the footprint's bounding box but outside the polygon
        assert!(!volume.contains(Vec3::new(9.0, 9.0, 0.0)));
        // Outside the vertical range
        assert!(!volume.contains(Vec3::new(2.0, 2.0, 4.0)));
    }

    #[test]
    fn test_prism_with_too_few_corners() {
        let volume = LiquidVolume::prism(
            LiquidKind::Water,
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
            0.0,
            1.0,
        );
        assert!(!volume.contains(Vec3::new(5.0, 0.0, 0.5)));
    }

    #[test]
    fn test_xy_bounds() {
        let (min, max) = water_box().xy_bounds();
        assert_eq!(min, Vec2::new(0.0, 0.0));
        assert_eq!(max, Vec2::new(10.0, 10.0));

        let prism = LiquidVolume::prism(
            LiquidKind::Water,
            vec![
                Vec2::new(-5.0, 1.0),
                Vec2::new(3.0, -2.0),
                Vec2::new(4.0, 6.0),
            ],
            0.0,
            1.0,
        );
        let (min, max) = prism.xy_bounds();
        assert_eq!(min, Vec2::new(-5.0, -2.0));
        assert_eq!(max, Vec2::new(4.0, 6.0));
    }

    #[test]
    fn test_liquid_kind_display() {
        assert_eq!(LiquidKind::Lava.to_string(), "lava");
        assert_eq!(LiquidKind::IceWater.to_string(), "icewater");
    }
}
