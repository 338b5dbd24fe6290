//! UV remapping into a grid cell.
//!
//! Atlas UVs use the same orientation as the pixel buffer: `v` grows with the
//! row index, so row 0 sits at the top of the image.

use crate::layout::GridLayout;
use crate::types::{CellPosition, Uv};
use glam::Vec2;
use serde::Serialize;

/// Sub-rectangle of the atlas, in UV space, covered by one cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellRegion {
    /// U coordinate of the left edge.
    pub u_min: f32,
    /// V coordinate of the top edge.
    pub v_min: f32,
    /// Width of the region in UV space.
    pub width: f32,
    /// Height of the region in UV space.
    pub height: f32,
}

impl CellRegion {
    /// Region of a cell's content, excluding its padding ring.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    pub fn of(cell: CellPosition, layout: &GridLayout) -> Self {
        let (x, y) = layout.content_origin(cell);
        let atlas_width = layout.atlas_width() as f32;
        let atlas_height = layout.atlas_height() as f32;
        Self {
            u_min: x as f32 / atlas_width,
            v_min: y as f32 / atlas_height,
            width: layout.cell_size as f32 / atlas_width,
            height: layout.cell_size as f32 / atlas_height,
        }
    }

    pub fn u_max(&self) -> f32 {
        self.u_min + self.width
    }

    pub fn v_max(&self) -> f32 {
        self.v_min + self.height
    }

    /// Transform a local UV coordinate (0-1) to atlas coordinate.
    pub fn transform_uv(&self, uv: Uv) -> Uv {
        let mapped = Vec2::new(self.u_min, self.v_min) + Vec2::from(uv) * Vec2::new(self.width, self.height);
        mapped.into()
    }

    /// Check whether an atlas coordinate lies inside the region, edges included.
    pub fn contains(&self, uv: Uv) -> bool {
        (self.u_min..=self.u_max()).contains(&uv[0]) && (self.v_min..=self.v_max()).contains(&uv[1])
    }
}

/// Remapped UVs for one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct UvRemap {
    /// New UVs, one per input vertex, in the same order.
    pub uvs: Vec<Uv>,
    /// Whether the mesh had out-of-range UVs and was clamped.
    pub clamped: bool,
}

/// Check whether any coordinate lies outside `[0, 1]`.
pub fn needs_clamping(uvs: &[Uv]) -> bool {
    uvs.iter()
        .any(|&[u, v]| !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v))
}

/// Remap a mesh's UVs into the content region of `cell`.
///
/// If any coordinate is outside `[0, 1]` (a tiling mesh), every coordinate is
/// clamped first so the whole mesh stays inside its own cell.
///
/// # Panics
///
/// Panics if the cell is outside the grid.
pub fn remap(uvs: &[Uv], cell: CellPosition, layout: &GridLayout) -> UvRemap {
    let region = CellRegion::of(cell, layout);
    let clamped = needs_clamping(uvs);

    let uvs = uvs
        .iter()
        .map(|&uv| {
            let uv = if clamped {
                Vec2::from(uv).clamp(Vec2::ZERO, Vec2::ONE).into()
            } else {
                uv
            };
            region.transform_uv(uv)
        })
        .collect();

    UvRemap { uvs, clamped }
}
