//! Grid search for the cell size and row/column count of an atlas.

use crate::error::{AtlasError, Result};
use crate::types::CellPosition;
use serde::Serialize;

/// Smallest cell edge the planner will shrink entries to.
pub const MIN_CELL_SIZE: u32 = 16;

/// Widest allowed grid, in columns per row. Grids are never taller than wide.
pub const MAX_GRID_ASPECT: u32 = 2;

/// Geometry of a uniform-cell atlas.
///
/// Computed once per generation and shared by the compositor and the UV
/// remapper so both agree on where every cell lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub rows: u32,
    pub columns: u32,
    /// Edge length of a cell's content, excluding padding. Always a power of two.
    pub cell_size: u32,
    /// Pixels of margin on each side of a cell's content.
    pub padding: u32,
}

impl GridLayout {
    /// Distance in pixels between the origins of two neighbouring cells.
    pub fn cell_pitch(&self) -> u32 {
        self.cell_size + 2 * self.padding
    }

    pub fn atlas_width(&self) -> u32 {
        self.columns * self.cell_pitch()
    }

    pub fn atlas_height(&self) -> u32 {
        self.rows * self.cell_pitch()
    }

    /// Number of cells in the grid.
    pub fn capacity(&self) -> usize {
        (self.rows * self.columns) as usize
    }

    /// Grid position of the entry at `index` in the unique-entry list.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    pub fn cell_of(&self, index: usize) -> CellPosition {
        assert!(
            index < self.capacity(),
            "entry {} is outside the {}x{} grid",
            index,
            self.columns,
            self.rows
        );
        let columns = self.columns as usize;
        CellPosition::new((index / columns) as u32, (index % columns) as u32)
    }

    /// Pixel offset of the top-left corner of a cell's content.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    pub fn content_origin(&self, cell: CellPosition) -> (u32, u32) {
        assert!(
            cell.row < self.rows && cell.col < self.columns,
            "cell ({}, {}) is outside the {}x{} grid",
            cell.row,
            cell.col,
            self.columns,
            self.rows
        );
        (
            cell.col * self.cell_pitch() + self.padding,
            cell.row * self.cell_pitch() + self.padding,
        )
    }
}

/// Best grid found at one cell size.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    columns: u32,
    rows: u32,
    waste: u32,
}

/// Plan the grid for entries of the given native sizes.
///
/// Cell sizes are tried from the smallest power of two covering the largest
/// source down to [`MIN_CELL_SIZE`]; the first size with any fitting grid wins.
/// Within a size, the grid with the fewest unused cells wins, ties going to the
/// fewest columns.
///
/// # Panics
///
/// Panics if `native_sizes` is empty. Callers short-circuit empty input.
pub fn plan(native_sizes: &[(u32, u32)], max_dimension: u32, padding: u32) -> Result<GridLayout> {
    assert!(!native_sizes.is_empty(), "cannot plan a layout for zero entries");

    let entry_count = native_sizes.len() as u32;
    let largest = native_sizes
        .iter()
        .map(|&(w, h)| w.max(h))
        .max()
        .unwrap_or(1);
    let start = largest.max(MIN_CELL_SIZE).next_power_of_two();

    let mut cell_size = start;
    while cell_size >= MIN_CELL_SIZE {
        if let Some(found) = best_grid(entry_count, cell_size, max_dimension, padding) {
            log::debug!(
                "Planned {}x{} grid of {}px cells for {} entries (waste {})",
                found.columns,
                found.rows,
                cell_size,
                entry_count,
                found.waste
            );
            return Ok(GridLayout {
                rows: found.rows,
                columns: found.columns,
                cell_size,
                padding,
            });
        }
        cell_size /= 2;
    }

    Err(AtlasError::LayoutInfeasible {
        entry_count: native_sizes.len(),
        max_dimension,
        min_cell_size: MIN_CELL_SIZE,
    })
}

/// Find the least wasteful grid at a fixed cell size, if any fits.
fn best_grid(entry_count: u32, cell_size: u32, max_dimension: u32, padding: u32) -> Option<Candidate> {
    let pitch = cell_size as u64 + 2 * padding as u64;
    let mut best: Option<Candidate> = None;

    for columns in 1..=entry_count {
        let rows = entry_count.div_ceil(columns);
        if rows > columns || columns > rows * MAX_GRID_ASPECT {
            continue;
        }
        if columns as u64 * pitch > max_dimension as u64 || rows as u64 * pitch > max_dimension as u64 {
            continue;
        }

        let waste = rows * columns - entry_count;
        if best.map_or(true, |b| waste < b.waste) {
            best = Some(Candidate { columns, rows, waste });
        }
        if waste == 0 {
            break;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(count: usize, size: u32) -> Vec<(u32, u32)> {
        vec![(size, size); count]
    }

    /// Brute-force minimum waste over every grid the planner may consider.
    fn min_waste(entry_count: u32, layout: &GridLayout, max_dimension: u32) -> u32 {
        (1..=entry_count)
            .filter_map(|columns| {
                let rows = entry_count.div_ceil(columns);
                let fits = columns * layout.cell_pitch() <= max_dimension
                    && rows * layout.cell_pitch() <= max_dimension;
                let shaped = rows <= columns && columns <= rows * MAX_GRID_ASPECT;
                (fits && shaped).then(|| rows * columns - entry_count)
            })
            .min()
            .unwrap()
    }

    #[test]
    fn test_four_equal_textures_perfect_fit() {
        let layout = plan(&sizes(4, 64), 512, 2).unwrap();
        assert_eq!((layout.columns, layout.rows, layout.cell_size), (2, 2, 64));
        assert_eq!((layout.atlas_width(), layout.atlas_height()), (136, 136));
    }

    #[test]
    fn test_five_textures_forced_waste() {
        let layout = plan(&sizes(5, 64), 4096, 0).unwrap();
        assert_eq!((layout.columns, layout.rows, layout.cell_size), (3, 2, 64));
        assert_eq!(layout.capacity() - 5, 1);
    }

    #[test]
    fn test_single_entry() {
        let layout = plan(&[(100, 30)], 1024, 1).unwrap();
        assert_eq!((layout.columns, layout.rows, layout.cell_size), (1, 1, 128));
        assert_eq!(layout.atlas_width(), 130);
    }

    #[test]
    fn test_tiny_sources_use_minimum_cell() {
        let layout = plan(&[(1, 1), (4, 4)], 256, 0).unwrap();
        assert_eq!(layout.cell_size, MIN_CELL_SIZE);
        assert_eq!((layout.columns, layout.rows), (2, 1));
    }

    #[test]
    fn test_cell_size_shrinks_to_fit() {
        // Four 256px sources can't sit side by side in 256, but 128px cells can.
        let layout = plan(&sizes(4, 256), 256, 0).unwrap();
        assert_eq!((layout.columns, layout.rows, layout.cell_size), (2, 2, 128));
    }

    #[test]
    fn test_largest_source_sets_starting_size() {
        let layout = plan(&[(16, 16), (300, 20), (32, 32)], 4096, 0).unwrap();
        assert_eq!(layout.cell_size, 512);
    }

    #[test]
    fn test_infeasible_layout() {
        // 17x17 cells of 16px exceed 256 on both axes.
        let err = plan(&sizes(17 * 17, 16), 256, 0).unwrap_err();
        match err {
            AtlasError::LayoutInfeasible {
                entry_count,
                max_dimension,
                min_cell_size,
            } => {
                assert_eq!(entry_count, 289);
                assert_eq!(max_dimension, 256);
                assert_eq!(min_cell_size, 16);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_padding_can_make_layout_infeasible() {
        assert!(plan(&sizes(1, 16), 16, 0).is_ok());
        assert!(plan(&sizes(1, 16), 16, 1).is_err());
    }

    #[test]
    fn test_layout_invariants_hold() {
        for max_dimension in [256, 512, 1024, 2048, 4096] {
            for padding in [0, 1, 4] {
                for count in 1..=60u32 {
                    let Ok(layout) = plan(&sizes(count as usize, 128), max_dimension, padding) else {
                        continue;
                    };
                    assert!(layout.capacity() >= count as usize);
                    assert!(layout.atlas_width() <= max_dimension);
                    assert!(layout.atlas_height() <= max_dimension);
                    assert!(layout.cell_size.is_power_of_two());
                    assert!(layout.cell_size >= MIN_CELL_SIZE);
                    assert_eq!(
                        layout.rows * layout.columns - count,
                        min_waste(count, &layout, max_dimension),
                        "count {count}, max {max_dimension}, padding {padding}"
                    );

                    // A larger cell size must not have fit.
                    if layout.cell_size < 128 {
                        let larger = best_grid(count, layout.cell_size * 2, max_dimension, padding);
                        assert!(larger.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        let input = [(64, 32), (128, 128), (16, 16), (200, 90), (64, 64)];
        let first = plan(&input, 512, 2).unwrap();
        for _ in 0..10 {
            assert_eq!(plan(&input, 512, 2).unwrap(), first);
        }
    }

    #[test]
    fn test_cell_of_follows_row_major_order() {
        let layout = GridLayout {
            rows: 2,
            columns: 3,
            cell_size: 64,
            padding: 2,
        };
        assert_eq!(layout.cell_of(0), CellPosition::new(0, 0));
        assert_eq!(layout.cell_of(2), CellPosition::new(0, 2));
        assert_eq!(layout.cell_of(4), CellPosition::new(1, 1));
        assert_eq!(layout.content_origin(CellPosition::new(1, 2)), (138, 70));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_cell_of_outside_grid_panics() {
        let layout = GridLayout {
            rows: 1,
            columns: 2,
            cell_size: 16,
            padding: 0,
        };
        layout.cell_of(2);
    }
}
