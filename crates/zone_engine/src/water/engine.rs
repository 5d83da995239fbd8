//! Liquid containment queries
//!
//! Volume counts per zone are small, so the engine pairs a coarse
//! horizontal grid for pruning with exact containment tests inside a cell,
//! the same broad-then-narrow split the collision queries use.

use log::debug;

use super::volume::{LiquidKind, LiquidVolume};
use crate::foundation::math::{Vec2, Vec3};

/// Grid resolution along each horizontal axis
const GRID_DIM: usize = 16;

/// The immutable set of liquid volumes loaded for one zone
#[derive(Debug, Clone, Default)]
pub struct LiquidVolumeSet {
    volumes: Vec<LiquidVolume>,
}

impl LiquidVolumeSet {
    /// Wrap a loaded volume list
    ///
    /// Load order is significant: when volumes overlap, the earliest one
    /// containing a point wins.
    pub fn new(volumes: Vec<LiquidVolume>) -> Self {
        Self { volumes }
    }

    /// Number of volumes in the set
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// True if the set holds no volumes
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Iterate the volumes in load order
    pub fn iter(&self) -> std::slice::Iter<'_, LiquidVolume> {
        self.volumes.iter()
    }
}

// Coarse horizontal grid mapping cells to the volumes overlapping them.
#[derive(Debug, Clone)]
struct VolumeGrid {
    origin: Vec2,
    cell_size: Vec2,
    cells: Vec<Vec<u32>>,
}

impl VolumeGrid {
    fn build(volumes: &[LiquidVolume]) -> Option<Self> {
        if volumes.is_empty() {
            return None;
        }

        let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for volume in volumes {
            let (lo, hi) = volume.xy_bounds();
            min.x = min.x.min(lo.x);
            min.y = min.y.min(lo.y);
            max.x = max.x.max(hi.x);
            max.y = max.y.max(hi.y);
        }

        let span = max - min;
        let cell_size = Vec2::new(
            (span.x / GRID_DIM as f32).max(f32::EPSILON),
            (span.y / GRID_DIM as f32).max(f32::EPSILON),
        );

        let mut cells = vec![Vec::new(); GRID_DIM * GRID_DIM];
        // Volumes are walked in load order, so every cell list stays sorted
        // by volume index and the overlap policy falls out of iteration.
        for (index, volume) in volumes.iter().enumerate() {
            let (lo, hi) = volume.xy_bounds();
            let x0 = Self::cell_coord(lo.x, min.x, cell_size.x);
            let x1 = Self::cell_coord(hi.x, min.x, cell_size.x);
            let y0 = Self::cell_coord(lo.y, min.y, cell_size.y);
            let y1 = Self::cell_coord(hi.y, min.y, cell_size.y);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    cells[y * GRID_DIM + x].push(index as u32);
                }
            }
        }

        Some(Self {
            origin: min,
            cell_size,
            cells,
        })
    }

    fn cell_coord(value: f32, origin: f32, cell_size: f32) -> usize {
        let coord = ((value - origin) / cell_size).floor();
        (coord.max(0.0) as usize).min(GRID_DIM - 1)
    }

    fn candidates(&self, x: f32, y: f32) -> &[u32] {
        let fx = (x - self.origin.x) / self.cell_size.x;
        let fy = (y - self.origin.y) / self.cell_size.y;
        // Points exactly on the far grid boundary still land in the last
        // cell; volumes are closed at their max faces.
        if fx < 0.0 || fy < 0.0 || fx > GRID_DIM as f32 || fy > GRID_DIM as f32 {
            return &[];
        }
        let cx = (fx as usize).min(GRID_DIM - 1);
        let cy = (fy as usize).min(GRID_DIM - 1);
        &self.cells[cy * GRID_DIM + cx]
    }
}

/// Answers "is this point submerged, and in what" for one zone
///
/// Immutable after construction; queries are lock-free and safe to issue
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct WaterQueryEngine {
    set: LiquidVolumeSet,
    grid: Option<VolumeGrid>,
}

impl WaterQueryEngine {
    /// Build the engine over a loaded volume set
    ///
    /// An empty set is a valid zone state (a dry zone); the engine answers
    /// "not in liquid" everywhere.
    pub fn new(set: LiquidVolumeSet) -> Self {
        let grid = VolumeGrid::build(&set.volumes);
        debug!("water engine: {} volumes", set.len());
        Self { set, grid }
    }

    /// The kind of liquid at the point, if any
    ///
    /// Overlapping volumes resolve deterministically: the first matching
    /// volume in load order wins.
    pub fn liquid_at(&self, point: Vec3) -> Option<LiquidKind> {
        let grid = self.grid.as_ref()?;
        for &index in grid.candidates(point.x, point.y) {
            let volume = &self.set.volumes[index as usize];
            if volume.contains(point) {
                return Some(volume.kind);
            }
        }
        None
    }

    /// Whether the point is inside any liquid volume
    pub fn is_in_liquid(&self, point: Vec3) -> bool {
        self.liquid_at(point).is_some()
    }

    /// The volume set this engine answers for
    pub fn volumes(&self) -> &LiquidVolumeSet {
        &self.set
    }
}
