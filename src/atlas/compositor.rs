//! Resampling entries and blitting them into their grid cells.
//!
//! Cells never overlap, so the atlas is split into horizontal bands of one grid
//! row each and bands are written independently. With `parallel` set, both the
//! per-entry resampling and the per-band blits run on the rayon pool.

use super::{AtlasImage, AtlasRole};
use crate::dedupe::TextureEntry;
use crate::error::Result;
use crate::layout::GridLayout;
use crate::texture::{resample, TextureData};
use crate::types::multiply_rgb;
use rayon::prelude::*;
use std::time::Instant;

/// Build the diffuse atlas: tinted, perceptually resampled entries on white.
pub fn compose_diffuse(entries: &[TextureEntry], layout: &GridLayout, parallel: bool) -> Result<AtlasImage> {
    compose(entries, layout, AtlasRole::Diffuse, parallel)
}

/// Build the normal atlas: linearly resampled normal maps on flat normals.
pub fn compose_normal(entries: &[TextureEntry], layout: &GridLayout, parallel: bool) -> Result<AtlasImage> {
    compose(entries, layout, AtlasRole::Normal, parallel)
}

/// Composite `entries` into an atlas of the given role.
///
/// Entry `i` lands in cell `layout.cell_of(i)`.
///
/// # Panics
///
/// Panics if there are more entries than cells in `layout`.
pub fn compose(
    entries: &[TextureEntry],
    layout: &GridLayout,
    role: AtlasRole,
    parallel: bool,
) -> Result<AtlasImage> {
    assert!(
        entries.len() <= layout.capacity(),
        "{} entries do not fit a {}x{} grid",
        entries.len(),
        layout.columns,
        layout.rows
    );
    let started = Instant::now();

    let tiles: Vec<TextureData> = if parallel {
        entries
            .par_iter()
            .map(|entry| prepare_tile(entry, role, layout.cell_size))
            .collect::<Result<_>>()?
    } else {
        entries
            .iter()
            .map(|entry| prepare_tile(entry, role, layout.cell_size))
            .collect::<Result<_>>()?
    };

    let mut atlas = AtlasImage::filled(role, layout.atlas_width(), layout.atlas_height());
    let band_len = atlas.width as usize * layout.cell_pitch() as usize * 4;
    let columns = layout.columns as usize;

    let write_band = |(row, band): (usize, &mut [u8])| {
        let start = row * columns;
        let end = (start + columns).min(tiles.len());
        for index in start..end {
            let col = (index - start) as u32;
            let x = col * layout.cell_pitch() + layout.padding;
            blit(band, layout.atlas_width(), &tiles[index], x, layout.padding);
        }
    };

    if band_len > 0 {
        if parallel {
            atlas.pixels.par_chunks_mut(band_len).enumerate().for_each(&write_band);
        } else {
            atlas.pixels.chunks_mut(band_len).enumerate().for_each(&write_band);
        }
    }

    log::debug!(
        "Composited {} {} tiles into {}x{} atlas in {:?}",
        tiles.len(),
        role.name(),
        atlas.width,
        atlas.height,
        started.elapsed()
    );
    Ok(atlas)
}

/// Produce the `cell_size` square tile an entry contributes to a role's atlas.
fn prepare_tile(entry: &TextureEntry, role: AtlasRole, cell_size: u32) -> Result<TextureData> {
    match role {
        AtlasRole::Diffuse => {
            let mut tile = resample(entry.diffuse.data(), cell_size, role.color_space())?;
            if let Some(tint) = entry.tint {
                for pixel in tile.pixels.chunks_exact_mut(4) {
                    let tinted = multiply_rgb([pixel[0], pixel[1], pixel[2], pixel[3]], tint);
                    pixel.copy_from_slice(&tinted);
                }
            }
            Ok(tile)
        }
        AtlasRole::Normal => match &entry.normal {
            Some(normal) => resample(normal.data(), cell_size, role.color_space()),
            None => Ok(TextureData::flat_normal(cell_size)),
        },
    }
}

/// Copy a tile into a band of atlas rows at (x, y) relative to the band.
fn blit(band: &mut [u8], stride: u32, tile: &TextureData, x: u32, y: u32) {
    let row_bytes = tile.width as usize * 4;
    for ty in 0..tile.height {
        let src = (ty * tile.width) as usize * 4;
        let dst = ((y + ty) * stride + x) as usize * 4;
        band[dst..dst + row_bytes].copy_from_slice(&tile.pixels[src..src + row_bytes]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan;
    use crate::texture::TextureHandle;
    use crate::types::{CellPosition, FLAT_NORMAL};

    fn solid_entry(key: &str, size: u32, color: [u8; 4]) -> TextureEntry {
        TextureEntry::new(TextureHandle::new(key, TextureData::solid(size, size, color)))
    }

    fn layout(rows: u32, columns: u32, cell_size: u32, padding: u32) -> GridLayout {
        GridLayout {
            rows,
            columns,
            cell_size,
            padding,
        }
    }

    /// Every pixel of a cell's content area.
    fn cell_pixels(atlas: &AtlasImage, layout: &GridLayout, cell: CellPosition) -> Vec<[u8; 4]> {
        let (x0, y0) = layout.content_origin(cell);
        let mut out = Vec::new();
        for y in y0..y0 + layout.cell_size {
            for x in x0..x0 + layout.cell_size {
                out.push(atlas.get_pixel(x, y));
            }
        }
        out
    }

    #[test]
    fn test_tint_multiplies_rgb() {
        let entry = solid_entry("gray", 16, [128, 128, 128, 255]).with_tint([1.0, 0.0, 0.0, 1.0]);
        let layout = layout(1, 1, 16, 0);
        let atlas = compose_diffuse(&[entry], &layout, false).unwrap();
        assert!(atlas.pixels.chunks(4).all(|p| p == [128, 0, 0, 255]));
    }

    #[test]
    fn test_tint_never_touches_normals() {
        let normal = TextureHandle::new("n", TextureData::flat_normal(16));
        let entry = solid_entry("gray", 16, [128, 128, 128, 255])
            .with_tint([0.0, 0.0, 0.0, 1.0])
            .with_normal(normal);
        let atlas = compose_normal(&[entry], &layout(1, 1, 16, 0), false).unwrap();
        assert!(atlas.pixels.chunks(4).all(|p| p == FLAT_NORMAL));
    }

    #[test]
    fn test_waste_cells_show_background() {
        let entries: Vec<_> = (0..5)
            .map(|i| solid_entry(&format!("t{i}"), 64, [10, 20, 30, 255]))
            .collect();
        let layout = plan(&vec![(64, 64); 5], 4096, 0).unwrap();
        assert_eq!((layout.columns, layout.rows), (3, 2));

        let diffuse = compose_diffuse(&entries, &layout, false).unwrap();
        let waste = CellPosition::new(1, 2);
        assert!(cell_pixels(&diffuse, &layout, waste).iter().all(|p| *p == [255, 255, 255, 255]));
        assert!(cell_pixels(&diffuse, &layout, CellPosition::new(1, 1))
            .iter()
            .all(|p| *p == [10, 20, 30, 255]));

        let normal = compose_normal(&entries, &layout, false).unwrap();
        assert!(cell_pixels(&normal, &layout, waste).iter().all(|p| *p == FLAT_NORMAL));
    }

    #[test]
    fn test_entries_without_normal_get_flat_tiles() {
        let bumpy = TextureHandle::new("bumpy_n", TextureData::solid(16, 16, [200, 128, 200, 255]));
        let entries = vec![
            solid_entry("a", 16, [0, 0, 0, 255]).with_normal(bumpy),
            solid_entry("b", 16, [0, 0, 0, 255]),
        ];
        let layout = layout(1, 2, 16, 1);
        let atlas = compose_normal(&entries, &layout, false).unwrap();

        let first = cell_pixels(&atlas, &layout, CellPosition::new(0, 0));
        assert!(first.iter().all(|p| *p != FLAT_NORMAL));
        let second = cell_pixels(&atlas, &layout, CellPosition::new(0, 1));
        assert!(second.iter().all(|p| *p == FLAT_NORMAL));
    }

    #[test]
    fn test_padding_ring_stays_background() {
        let entries = vec![
            solid_entry("red", 16, [255, 0, 0, 255]),
            solid_entry("blue", 16, [0, 0, 255, 255]),
        ];
        let layout = layout(1, 2, 16, 2);
        let atlas = compose_diffuse(&entries, &layout, false).unwrap();
        assert_eq!((atlas.width, atlas.height), (40, 20));

        assert_eq!(atlas.get_pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(atlas.get_pixel(1, 10), [255, 255, 255, 255]);
        assert_eq!(atlas.get_pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(atlas.get_pixel(17, 17), [255, 0, 0, 255]);
        assert_eq!(atlas.get_pixel(18, 10), [255, 255, 255, 255]);
        assert_eq!(atlas.get_pixel(21, 10), [255, 255, 255, 255]);
        assert_eq!(atlas.get_pixel(22, 2), [0, 0, 255, 255]);
        assert_eq!(atlas.get_pixel(37, 17), [0, 0, 255, 255]);
        assert_eq!(atlas.get_pixel(38, 19), [255, 255, 255, 255]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let entries: Vec<_> = (0..7u8)
            .map(|i| solid_entry(&format!("t{i}"), 32, [i * 30, 255 - i * 30, i, 255]).with_tint([0.5, 1.0, 1.0, 1.0]))
            .collect();
        let layout = plan(&vec![(32, 32); 7], 512, 3).unwrap();

        let sequential = compose_diffuse(&entries, &layout, false).unwrap();
        let parallel = compose_diffuse(&entries, &layout, true).unwrap();
        assert_eq!(sequential.pixels, parallel.pixels);
    }

    #[test]
    fn test_sources_are_resampled_to_cell_size() {
        let entries = vec![
            solid_entry("big", 64, [50, 60, 70, 255]),
            solid_entry("small", 4, [90, 80, 70, 255]),
        ];
        let layout = layout(1, 2, 32, 0);
        let atlas = compose_diffuse(&entries, &layout, true).unwrap();
        assert!(cell_pixels(&atlas, &layout, CellPosition::new(0, 0))
            .iter()
            .all(|p| *p == [50, 60, 70, 255]));
        assert!(cell_pixels(&atlas, &layout, CellPosition::new(0, 1))
            .iter()
            .all(|p| *p == [90, 80, 70, 255]));
    }

    #[test]
    #[should_panic(expected = "do not fit")]
    fn test_too_many_entries_panics() {
        let entries = vec![solid_entry("a", 16, [0; 4]), solid_entry("b", 16, [0; 4])];
        let _ = compose_diffuse(&entries, &layout(1, 1, 16, 0), false);
    }
}
