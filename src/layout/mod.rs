//! Uniform-cell grid layout planning.
//!
//! Every entry gets a congruent square cell, so compositing is a plain blit per
//! entry and UV remapping is the same affine transform for every cell.

mod planner;

pub use planner::{plan, GridLayout, MAX_GRID_ASPECT, MIN_CELL_SIZE};
