//! Immutable zone geometry storage
//!
//! Holds the vertex and triangle-index arrays for a loaded zone, split into
//! the collidable and non-collidable (visual-only) sets. The store is
//! populated once by the zone loader and never mutated; every query engine
//! borrows it read-only.

use log::debug;
use thiserror::Error;

use super::primitives::{Aabb, Triangle};
use crate::foundation::math::Vec3;

/// Triangle set membership masks for query filtering
///
/// Based on the collision-layer masking scheme: each triangle carries one
/// set bit, and queries pass a mask of the sets they want to consult.
pub struct TriangleSets;

impl TriangleSets {
    /// No triangle set
    pub const NONE: u32 = 0;

    /// Triangles that block movement and participate in height and
    /// line-of-sight queries
    pub const COLLIDABLE: u32 = 1 << 0;

    /// Visual-only triangles; consulted only when a query asks for them
    /// (e.g. a viewer picking ray)
    pub const NON_COLLIDABLE: u32 = 1 << 1;

    /// All triangle sets
    pub const ALL: u32 = Self::COLLIDABLE | Self::NON_COLLIDABLE;

    /// Check whether a triangle's set bit passes a query mask
    pub fn matches(set: u32, mask: u32) -> bool {
        set & mask != 0
    }
}

/// Errors raised while assembling a [`GeometryStore`]
///
/// These are load-boundary precondition violations. They fail loudly at
/// zone load; nothing here can occur on the query path.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// An index list's length is not a multiple of three
    #[error("index list length {0} is not a multiple of 3")]
    PartialTriangle(usize),

    /// A triangle index referenced a vertex that does not exist
    #[error("vertex index {index} out of bounds ({vertex_count} vertices)")]
    IndexOutOfBounds {
        /// The offending index
        index: u32,
        /// Number of vertices in the store
        vertex_count: usize,
    },
}

/// Immutable vertex and triangle arrays for one zone
#[derive(Debug, Clone)]
pub struct GeometryStore {
    vertices: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
    sets: Vec<u32>,
    collidable_count: usize,
    bounds: Option<Aabb>,
}

impl GeometryStore {
    /// Build a store from a vertex array and two index lists, one per set
    ///
    /// Index lists are flat `[a, b, c, a, b, c, ...]` triples, the shape the
    /// zone loader hands over. Fails if a list length is not a multiple of
    /// three or any index is out of bounds.
    pub fn from_parts(
        vertices: Vec<Vec3>,
        collidable_indices: &[u32],
        non_collidable_indices: &[u32],
    ) -> Result<Self, GeometryError> {
        let triangle_count = (collidable_indices.len() + non_collidable_indices.len()) / 3;
        let mut indices = Vec::with_capacity(triangle_count);
        let mut sets = Vec::with_capacity(triangle_count);

        for (list, set) in [
            (collidable_indices, TriangleSets::COLLIDABLE),
            (non_collidable_indices, TriangleSets::NON_COLLIDABLE),
        ] {
            if list.len() % 3 != 0 {
                return Err(GeometryError::PartialTriangle(list.len()));
            }
            for chunk in list.chunks_exact(3) {
                for &index in chunk {
                    if index as usize >= vertices.len() {
                        return Err(GeometryError::IndexOutOfBounds {
                            index,
                            vertex_count: vertices.len(),
                        });
                    }
                }
                indices.push([chunk[0], chunk[1], chunk[2]]);
                sets.push(set);
            }
        }

        let collidable_count = collidable_indices.len() / 3;

        let mut bounds = Aabb::empty();
        for vertex in &vertices {
            bounds.grow_point(*vertex);
        }
        let bounds = if vertices.is_empty() { None } else { Some(bounds) };

        debug!(
            "geometry store: {} vertices, {} collidable / {} non-collidable triangles",
            vertices.len(),
            collidable_count,
            indices.len() - collidable_count
        );

        Ok(Self {
            vertices,
            indices,
            sets,
            collidable_count,
            bounds,
        })
    }

    /// A store with no geometry at all
    ///
    /// Zones without a collision mesh still construct; every height or
    /// line-of-sight query over an empty store answers "no surface".
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            sets: Vec::new(),
            collidable_count: 0,
            bounds: None,
        }
    }

    /// Total triangle count across both sets
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of collidable triangles
    pub fn collidable_count(&self) -> usize {
        self.collidable_count
    }

    /// True if the store holds no triangles
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Materialize triangle `i` from the index array
    ///
    /// # Panics
    /// Panics if `i` is out of bounds; triangle indices originate from this
    /// store's own index array, so an out-of-range `i` is a caller bug.
    pub fn triangle(&self, i: usize) -> Triangle {
        let [a, b, c] = self.indices[i];
        Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    /// The set bit of triangle `i`
    pub fn set_of(&self, i: usize) -> u32 {
        self.sets[i]
    }

    /// Bounding box over every vertex, or None for an empty store
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_vertices() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(10.0, 0.0, 1.0),
            Vec3::new(10.0, 10.0, 1.0),
            Vec3::new(0.0, 10.0, 1.0),
        ]
    }

    #[test]
    fn test_from_parts_splits_sets() {
        let store =
            GeometryStore::from_parts(quad_vertices(), &[0, 1, 2], &[0, 2, 3]).unwrap();

        assert_eq!(store.triangle_count(), 2);
        assert_eq!(store.collidable_count(), 1);
        assert_eq!(store.set_of(0), TriangleSets::COLLIDABLE);
        assert_eq!(store.set_of(1), TriangleSets::NON_COLLIDABLE);
    }

    #[test]
    fn test_partial_triangle_rejected() {
        let err = GeometryStore::from_parts(quad_vertices(), &[0, 1], &[]).unwrap_err();
        assert!(matches!(err, GeometryError::PartialTriangle(2)));
    }

    #[test]
    fn test_index_out_of_bounds_rejected() {
        let err = GeometryStore::from_parts(quad_vertices(), &[0, 1, 9], &[]).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::IndexOutOfBounds { index: 9, vertex_count: 4 }
        ));
    }

    #[test]
    fn test_bounds_cover_all_vertices() {
        let store = GeometryStore::from_parts(quad_vertices(), &[0, 1, 2], &[]).unwrap();
        let bounds = store.bounds().unwrap();
        assert_relative_eq!(bounds.min.x, 0.0);
        assert_relative_eq!(bounds.max.x, 10.0);
        assert_relative_eq!(bounds.max.z, 1.0);
    }

    #[test]
    fn test_empty_store() {
        let store = GeometryStore::empty();
        assert!(store.is_empty());
        assert!(store.bounds().is_none());
    }

    #[test]
    fn test_set_mask_matching() {
        assert!(TriangleSets::matches(
            TriangleSets::COLLIDABLE,
            TriangleSets::ALL
        ));
        assert!(!TriangleSets::matches(
            TriangleSets::NON_COLLIDABLE,
            TriangleSets::COLLIDABLE
        ));
    }
}
