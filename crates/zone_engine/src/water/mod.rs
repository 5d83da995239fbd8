//! Liquid volumes and containment queries
//!
//! # Module Organization
//!
//! - [`volume`] - Tagged liquid regions and their containment predicates
//! - [`engine`] - The per-zone containment query engine

pub mod engine;
pub mod volume;

// Re-export commonly used types
pub use engine::{LiquidVolumeSet, WaterQueryEngine};
pub use volume::{LiquidKind, LiquidRegion, LiquidVolume};
