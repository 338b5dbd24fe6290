//! Shared types used throughout the library.

mod color;

pub use color::{multiply_rgb, quantize_color, Rgba, FLAT_NORMAL, OPAQUE_WHITE};

/// A texture coordinate pair as stored on a mesh.
pub type Uv = [f32; 2];

/// Position of a cell in the atlas grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct CellPosition {
    pub row: u32,
    pub col: u32,
}

impl CellPosition {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}
