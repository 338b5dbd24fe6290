//! Remapping mesh UVs into atlas cells.

mod remap;

pub use remap::{remap, needs_clamping, CellRegion, UvRemap};
