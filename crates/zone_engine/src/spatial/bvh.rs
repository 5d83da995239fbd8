//! Bounding-volume hierarchy over the zone's triangle soup
//!
//! The hierarchy is built once at zone load and never mutated, which is what
//! allows lock-free concurrent reads from every query site. Construction is
//! deterministic for a given triangle ordering: the split heuristic breaks
//! ties by centroid coordinate and then by original triangle index, so two
//! builds of the same zone always produce the same tree.
//!
//! Both construction and traversal use explicit stacks rather than
//! recursion, so stack depth stays bounded for pathological meshes.

use log::{debug, warn};

use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, GeometryStore, Ray};

/// Configuration for BVH construction
#[derive(Debug, Clone)]
pub struct BvhConfig {
    /// Maximum triangles per leaf before a node is split
    pub max_leaf_triangles: usize,

    /// Maximum tree depth; a range that reaches it becomes a leaf as-is
    pub max_depth: u32,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            max_leaf_triangles: 8,
            max_depth: 32,
        }
    }
}

/// Single node in the flattened hierarchy
///
/// A leaf holds `count > 0` and `left_first` indexes its first triangle
/// reference; an internal node holds `count == 0` and `left_first` indexes
/// its left child, with the right child immediately after it.
#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    left_first: u32,
    count: u32,
}

impl BvhNode {
    fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

// Working entry during construction; one per indexed triangle.
struct TriInfo {
    index: u32,
    centroid: Vec3,
    bounds: Aabb,
}

struct BuildTask {
    start: usize,
    end: usize,
    node: usize,
    depth: u32,
}

/// Static bounding-volume hierarchy over one zone's triangles
///
/// Invariant: every node's box fully contains the boxes of all of its
/// descendants, so a subtree whose box a ray misses can be pruned whole.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    tri_refs: Vec<u32>,
    depth: u32,
}

impl Bvh {
    /// Build the hierarchy over every non-degenerate triangle in the store
    ///
    /// Returns `None` when the store contributes no usable triangles; the
    /// caller represents "no collision mesh" as that state and keeps
    /// answering queries with the empty result.
    pub fn build(store: &GeometryStore, config: &BvhConfig) -> Option<Self> {
        let mut tris = Vec::with_capacity(store.triangle_count());
        let mut skipped = 0usize;
        for i in 0..store.triangle_count() {
            let triangle = store.triangle(i);
            if triangle.is_degenerate() {
                skipped += 1;
                continue;
            }
            tris.push(TriInfo {
                index: i as u32,
                centroid: triangle.centroid(),
                bounds: triangle.aabb(),
            });
        }

        if skipped > 0 {
            warn!("bvh build: skipped {skipped} degenerate triangles");
        }
        if tris.is_empty() {
            return None;
        }

        // A zero leaf budget would split single-triangle ranges forever
        let max_leaf = config.max_leaf_triangles.max(1);

        let mut nodes = Vec::with_capacity(tris.len() * 2);
        nodes.push(BvhNode {
            bounds: Aabb::empty(),
            left_first: 0,
            count: 0,
        });

        let mut max_depth_seen = 0;
        let mut stack = vec![BuildTask {
            start: 0,
            end: tris.len(),
            node: 0,
            depth: 0,
        }];

        while let Some(task) = stack.pop() {
            let range = &mut tris[task.start..task.end];
            max_depth_seen = max_depth_seen.max(task.depth);

            let mut bounds = Aabb::empty();
            for tri in range.iter() {
                bounds.grow(&tri.bounds);
            }
            nodes[task.node].bounds = bounds;

            if range.len() <= max_leaf || task.depth >= config.max_depth {
                nodes[task.node].left_first = task.start as u32;
                nodes[task.node].count = range.len() as u32;
                continue;
            }

            // Median split on the longest axis of the centroid bounds,
            // ties broken by centroid coordinate then original index so the
            // build is reproducible.
            let mut centroid_bounds = Aabb::empty();
            for tri in range.iter() {
                centroid_bounds.grow_point(tri.centroid);
            }
            let size = centroid_bounds.max - centroid_bounds.min;
            let axis = if size.x >= size.y && size.x >= size.z {
                0
            } else if size.y >= size.z {
                1
            } else {
                2
            };

            range.sort_unstable_by(|a, b| {
                a.centroid[axis]
                    .total_cmp(&b.centroid[axis])
                    .then(a.index.cmp(&b.index))
            });

            let mid = task.start + range.len() / 2;

            let left = nodes.len();
            nodes.push(BvhNode {
                bounds: Aabb::empty(),
                left_first: 0,
                count: 0,
            });
            nodes.push(BvhNode {
                bounds: Aabb::empty(),
                left_first: 0,
                count: 0,
            });
            nodes[task.node].left_first = left as u32;

            stack.push(BuildTask {
                start: task.start,
                end: mid,
                node: left,
                depth: task.depth + 1,
            });
            stack.push(BuildTask {
                start: mid,
                end: task.end,
                node: left + 1,
                depth: task.depth + 1,
            });
        }

        debug!(
            "bvh build: {} triangles, {} nodes, depth {}",
            tris.len(),
            nodes.len(),
            max_depth_seen
        );

        Some(Self {
            nodes,
            tri_refs: tris.into_iter().map(|t| t.index).collect(),
            depth: max_depth_seen,
        })
    }

    /// Bounding box of the whole indexed mesh
    pub fn bounds(&self) -> Aabb {
        self.nodes[0].bounds
    }

    /// Number of triangles referenced by the hierarchy
    pub fn triangle_count(&self) -> usize {
        self.tri_refs.len()
    }

    /// Number of nodes in the hierarchy
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level of the hierarchy
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Lazily yield candidate triangles whose bounding boxes the ray enters
    /// within `max_t`, nearest box first
    ///
    /// Candidates still require an exact ray-triangle test; the traversal
    /// only prunes. Each call starts a fresh traversal.
    pub fn query_ray(&self, ray: &Ray, max_t: f32) -> RayCandidates<'_> {
        let mut stack = Vec::with_capacity(self.depth as usize + 1);
        if self
            .nodes[0]
            .bounds
            .intersect_ray(ray.origin, ray.direction)
            .is_some_and(|t| t <= max_t)
        {
            stack.push(0u32);
        }
        RayCandidates {
            bvh: self,
            ray: *ray,
            max_t,
            stack,
            leaf: 0..0,
        }
    }

    /// Candidates along the full vertical column through `(x, y)`
    ///
    /// Equivalent to a downward ray cast from just above the indexed
    /// geometry, reaching the bottom of it.
    pub fn query_column(&self, x: f32, y: f32) -> RayCandidates<'_> {
        let bounds = self.bounds();
        let origin = Vec3::new(x, y, bounds.max.z + 1.0);
        let ray = Ray::downward(origin);
        // Far enough to pass below everything in the index
        let max_t = (bounds.max.z - bounds.min.z) + 2.0;
        self.query_ray(&ray, max_t)
    }
}

/// Lazy front-to-back candidate traversal started by [`Bvh::query_ray`]
///
/// Yields original triangle indices into the [`GeometryStore`] the
/// hierarchy was built over. Finite and non-restartable.
pub struct RayCandidates<'a> {
    bvh: &'a Bvh,
    ray: Ray,
    max_t: f32,
    stack: Vec<u32>,
    leaf: std::ops::Range<usize>,
}

impl Iterator for RayCandidates<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if let Some(i) = self.leaf.next() {
                return Some(self.bvh.tri_refs[i]);
            }

            let node = &self.bvh.nodes[self.stack.pop()? as usize];
            if node.is_leaf() {
                let start = node.left_first as usize;
                self.leaf = start..start + node.count as usize;
                continue;
            }

            // Push the farther child first so the nearer one is visited
            // next; children whose box the ray misses are pruned here.
            let left = node.left_first as usize;
            let entry = |n: &BvhNode| {
                n.bounds
                    .intersect_ray(self.ray.origin, self.ray.direction)
                    .filter(|&t| t <= self.max_t)
            };
            let hit_left = entry(&self.bvh.nodes[left]);
            let hit_right = entry(&self.bvh.nodes[left + 1]);

            match (hit_left, hit_right) {
                (Some(tl), Some(tr)) => {
                    if tl <= tr {
                        self.stack.push(left as u32 + 1);
                        self.stack.push(left as u32);
                    } else {
                        self.stack.push(left as u32);
                        self.stack.push(left as u32 + 1);
                    }
                }
                (Some(_), None) => self.stack.push(left as u32),
                (None, Some(_)) => self.stack.push(left as u32 + 1),
                (None, None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat triangulated grid at z = 0 spanning [0, n] x [0, n]
    fn grid_store(n: u32) -> GeometryStore {
        let mut vertices = Vec::new();
        for y in 0..=n {
            for x in 0..=n {
                vertices.push(Vec3::new(x as f32, y as f32, 0.0));
            }
        }
        let stride = n + 1;
        let mut indices = Vec::new();
        for y in 0..n {
            for x in 0..n {
                let a = y * stride + x;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }
        GeometryStore::from_parts(vertices, &indices, &[]).unwrap()
    }

    #[test]
    fn test_build_empty_store() {
        assert!(Bvh::build(&GeometryStore::empty(), &BvhConfig::default()).is_none());
    }

    #[test]
    fn test_build_skips_degenerate_triangles() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        let vertices = vec![
            p,
            p,
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let store = GeometryStore::from_parts(vertices, &[0, 1, 2, 3, 4, 5], &[]).unwrap();

        let bvh = Bvh::build(&store, &BvhConfig::default()).unwrap();
        assert_eq!(bvh.triangle_count(), 1);

        // All-degenerate geometry indexes nothing
        let p2 = Vec3::new(4.0, 4.0, 4.0);
        let store = GeometryStore::from_parts(vec![p2, p2, p2], &[0, 1, 2], &[]).unwrap();
        assert!(Bvh::build(&store, &BvhConfig::default()).is_none());
    }

    #[test]
    fn test_bounds_enclose_mesh() {
        let bvh = Bvh::build(&grid_store(8), &BvhConfig::default()).unwrap();
        let bounds = bvh.bounds();
        assert!(bounds.contains_point(Vec3::new(0.0, 0.0, 0.0)));
        assert!(bounds.contains_point(Vec3::new(8.0, 8.0, 0.0)));
    }

    #[test]
    fn test_column_query_prunes() {
        let store = grid_store(16);
        let bvh = Bvh::build(&store, &BvhConfig::default()).unwrap();

        let candidates: Vec<u32> = bvh.query_column(3.25, 3.25).collect();
        assert!(!candidates.is_empty());
        // Pruning must discard the overwhelming majority of a 512-triangle grid
        assert!(candidates.len() < store.triangle_count() / 4);
    }

    #[test]
    fn test_column_query_hits_right_cell() {
        let store = grid_store(4);
        let bvh = Bvh::build(&store, &BvhConfig::default()).unwrap();

        let ray = Ray::downward(Vec3::new(2.5, 2.5, 10.0));
        let hit = bvh
            .query_ray(&ray, 20.0)
            .any(|i| store.triangle(i as usize).intersect_ray(&ray).is_some());
        assert!(hit);
    }

    #[test]
    fn test_ray_query_miss_outside_bounds() {
        let bvh = Bvh::build(&grid_store(4), &BvhConfig::default()).unwrap();
        let ray = Ray::downward(Vec3::new(50.0, 50.0, 10.0));
        assert_eq!(bvh.query_ray(&ray, 100.0).count(), 0);
    }

    #[test]
    fn test_max_t_bounds_traversal() {
        let bvh = Bvh::build(&grid_store(4), &BvhConfig::default()).unwrap();
        // The mesh sits at z = 0; a ray stopped 2 units short never reaches it
        let ray = Ray::downward(Vec3::new(2.0, 2.0, 10.0));
        assert_eq!(bvh.query_ray(&ray, 8.0).count(), 0);
    }

    #[test]
    fn test_build_is_deterministic() {
        let store = grid_store(8);
        let config = BvhConfig::default();
        let a = Bvh::build(&store, &config).unwrap();
        let b = Bvh::build(&store, &config).unwrap();

        assert_eq!(a.node_count(), b.node_count());
        assert_eq!(a.tri_refs, b.tri_refs);

        let ray = Ray::downward(Vec3::new(4.1, 3.7, 5.0));
        let ca: Vec<u32> = a.query_ray(&ray, 10.0).collect();
        let cb: Vec<u32> = b.query_ray(&ray, 10.0).collect();
        assert_eq!(ca, cb);
    }

    #[test]
    fn test_depth_cap_produces_fat_leaves() {
        let config = BvhConfig {
            max_leaf_triangles: 1,
            max_depth: 2,
        };
        let store = grid_store(8);
        let bvh = Bvh::build(&store, &config).unwrap();
        assert!(bvh.depth() <= 2);
        // Every triangle is still reachable through some leaf
        assert_eq!(bvh.triangle_count(), store.triangle_count());
    }
}
