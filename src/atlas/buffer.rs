//! Atlas pixel buffers.

use crate::error::{AtlasError, Result};
use crate::texture::ColorSpace;
use crate::types::{FLAT_NORMAL, OPAQUE_WHITE};
use image::ImageEncoder;
use serde::Serialize;
use std::path::Path;

/// Which material channel an atlas holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AtlasRole {
    Diffuse,
    Normal,
}

impl AtlasRole {
    /// Fill color for cells and padding that no entry writes.
    pub fn background(&self) -> [u8; 4] {
        match self {
            AtlasRole::Diffuse => OPAQUE_WHITE,
            AtlasRole::Normal => FLAT_NORMAL,
        }
    }

    /// Color space the role's source textures are resampled in.
    pub fn color_space(&self) -> ColorSpace {
        match self {
            AtlasRole::Diffuse => ColorSpace::Perceptual,
            AtlasRole::Normal => ColorSpace::Linear,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AtlasRole::Diffuse => "diffuse",
            AtlasRole::Normal => "normal",
        }
    }
}

/// A generated atlas.
#[derive(Debug, Clone)]
pub struct AtlasImage {
    pub role: AtlasRole,
    /// Width of the atlas in pixels.
    pub width: u32,
    /// Height of the atlas in pixels.
    pub height: u32,
    /// RGBA pixel data, rows top to bottom.
    pub pixels: Vec<u8>,
}

impl AtlasImage {
    /// Allocate an atlas filled with the role's background color.
    pub fn filled(role: AtlasRole, width: u32, height: u32) -> Self {
        let background = role.background();
        let pixels = (0..width as usize * height as usize)
            .flat_map(|_| background)
            .collect();
        Self {
            role,
            width,
            height,
            pixels,
        }
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Export the atlas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(
                &self.pixels,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| AtlasError::Export(format!("Failed to encode {} atlas PNG: {}", self.role.name(), e)))?;

        Ok(bytes)
    }

    /// Write the atlas to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
