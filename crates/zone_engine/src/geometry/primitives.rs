//! Primitive geometric types and intersection algorithms
//!
//! Provides the ray, triangle, and axis-aligned box primitives the query
//! engines are built from, with efficient intersection testing.

use crate::foundation::math::{down, Vec3};

/// A ray for raycasting queries
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized by [`Ray::new`])
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized, so intersection distances along the ray
    /// are in world units.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Creates a ray pointing straight down from the given point
    pub fn downward(origin: Vec3) -> Self {
        Self {
            origin,
            direction: down(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A triangle in world space
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Returns true if the triangle has (near) zero area
    ///
    /// Degenerate triangles produce an unusable normal and are skipped when
    /// the spatial index is built.
    pub fn is_degenerate(&self) -> bool {
        const EPSILON: f32 = 1e-12;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).magnitude_squared() < EPSILON
    }

    /// The axis-aligned bounding box of the triangle
    pub fn aabb(&self) -> Aabb {
        let min = Vec3::new(
            self.v0.x.min(self.v1.x).min(self.v2.x),
            self.v0.y.min(self.v1.y).min(self.v2.y),
            self.v0.z.min(self.v1.z).min(self.v2.z),
        );
        let max = Vec3::new(
            self.v0.x.max(self.v1.x).max(self.v2.x),
            self.v0.y.max(self.v1.y).max(self.v2.y),
            self.v0.z.max(self.v1.z).max(self.v2.z),
        );
        Aabb::new(min, max)
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    /// Returns (t, u, v) barycentric coordinates if hit, None otherwise
    ///
    /// This is one of the fastest ray-triangle intersection algorithms.
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        const EPSILON: f32 = 0.000001; // Very small value for numerical stability

        // Calculate edges from v0
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        // Calculate determinant
        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle?
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);

        // Hit outside triangle on u axis?
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);

        // Hit outside triangle on v axis?
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        // Calculate t (distance along ray)
        let t = f * edge2.dot(&q);

        // Accept any non-negative distance, including a hit exactly at the origin
        if t >= 0.0 {
            Some((t, u, v))
        } else {
            None // Behind ray origin
        }
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The empty box: grows to the first point merged into it
    pub fn empty() -> Self {
        Self {
            min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow this box to enclose a point
    pub fn grow_point(&mut self, point: Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grow this box to enclose another box
    pub fn grow(&mut self, other: &Aabb) {
        self.grow_point(other.min);
        self.grow_point(other.max);
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Test ray intersection with this AABB using the slab method
    /// Returns the distance to the entry point if the ray intersects, None otherwise
    /// Based on "An Efficient and Robust Ray-Box Intersection Algorithm"
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = Vec3::new(
            if ray_dir.x != 0.0 { 1.0 / ray_dir.x } else { f32::INFINITY },
            if ray_dir.y != 0.0 { 1.0 / ray_dir.y } else { f32::INFINITY },
            if ray_dir.z != 0.0 { 1.0 / ray_dir.z } else { f32::INFINITY },
        );

        let t1 = (self.min.x - ray_origin.x) * inv_dir.x;
        let t2 = (self.max.x - ray_origin.x) * inv_dir.x;
        let t3 = (self.min.y - ray_origin.y) * inv_dir.y;
        let t4 = (self.max.y - ray_origin.y) * inv_dir.y;
        let t5 = (self.min.z - ray_origin.z) * inv_dir.z;
        let t6 = (self.max.z - ray_origin.z) * inv_dir.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // Ray intersects if tmax >= tmin and tmax >= 0
        if tmax >= tmin && tmax >= 0.0 {
            // Entry point distance, or 0 if the origin is inside the box
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_triangle(z: f32) -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, z),
            Vec3::new(10.0, 0.0, z),
            Vec3::new(0.0, 10.0, z),
        )
    }

    #[test]
    fn test_ray_hits_floor_triangle() {
        let tri = floor_triangle(5.0);
        let ray = Ray::downward(Vec3::new(2.0, 2.0, 20.0));

        let (t, u, v) = tri.intersect_ray(&ray).expect("ray should hit");
        assert_relative_eq!(t, 15.0, epsilon = 1e-4);
        assert!(u >= 0.0 && v >= 0.0 && u + v <= 1.0);
        assert_relative_eq!(ray.point_at(t).z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_misses_outside_triangle() {
        let tri = floor_triangle(5.0);
        // Above the quad's empty half: u + v > 1 there
        let ray = Ray::downward(Vec3::new(9.0, 9.0, 20.0));
        assert!(tri.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_parallel_to_triangle() {
        let tri = floor_triangle(5.0);
        let ray = Ray::new(Vec3::new(-5.0, 5.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
        // Coplanar ray: determinant vanishes
        assert!(tri.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_origin_on_triangle_plane() {
        let tri = floor_triangle(5.0);
        let ray = Ray::downward(Vec3::new(2.0, 2.0, 5.0));

        let (t, _, _) = tri.intersect_ray(&ray).expect("t = 0 hit should count");
        assert_relative_eq!(t, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_triangle_behind_origin_is_rejected() {
        let tri = floor_triangle(5.0);
        let ray = Ray::downward(Vec3::new(2.0, 2.0, 1.0));
        assert!(tri.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let sliver = Triangle::new(p, p, Vec3::new(4.0, 5.0, 6.0));
        assert!(sliver.is_degenerate());
        assert!(!floor_triangle(0.0).is_degenerate());
    }

    #[test]
    fn test_triangle_normal_points_up() {
        let n = floor_triangle(3.0).normal();
        assert_relative_eq!(n.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_aabb_ray_hit_and_miss() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let t = aabb
            .intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .expect("ray should enter the box");
        assert_relative_eq!(t, 4.0, epsilon = 1e-5);

        assert!(aabb
            .intersect_ray(Vec3::new(5.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn test_aabb_ray_origin_inside() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let t = aabb
            .intersect_ray(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0))
            .expect("origin inside always hits");
        assert_relative_eq!(t, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_aabb_grow() {
        let mut aabb = Aabb::empty();
        aabb.grow(&floor_triangle(2.0).aabb());
        aabb.grow_point(Vec3::new(-3.0, 1.0, 7.0));

        assert!(aabb.contains_point(Vec3::new(0.0, 0.0, 2.0)));
        assert_relative_eq!(aabb.min.x, -3.0);
        assert_relative_eq!(aabb.max.z, 7.0);
    }
}
