//! Texture loading and handling.

use crate::error::{AtlasError, Result};
use crate::types::{FLAT_NORMAL, OPAQUE_WHITE};
use std::path::Path;
use std::sync::Arc;

/// Key reserved for the built-in 1x1 white texture.
const WHITE_TEXTURE_KEY: &str = "builtin:white";

/// Raw RGBA8 texture data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Create a new texture from RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a texture filled with a single color.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = (0..width * height).flat_map(|_| color).collect();
        Self::new(width, height, pixels)
    }

    /// The 1x1 opaque white texture used for renderers without a diffuse map.
    pub fn white() -> Self {
        Self::solid(1, 1, OPAQUE_WHITE)
    }

    /// A square tile of flat normals (0.5, 0.5, 1.0).
    pub fn flat_normal(size: u32) -> Self {
        Self::solid(size, size, FLAT_NORMAL)
    }

    /// Native (width, height) of the texture.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Check if this texture has transparency.
    pub fn has_transparency(&self) -> bool {
        self.pixels.chunks(4).any(|pixel| pixel[3] < 255)
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

    /// Reject empty textures and pixel buffers that don't match the dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AtlasError::InvalidTexture(format!(
                "texture has no pixels ({}x{})",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(AtlasError::InvalidTexture(format!(
                "{}x{} texture needs {} bytes of RGBA data, got {}",
                self.width,
                self.height,
                expected,
                self.pixels.len()
            )));
        }
        Ok(())
    }
}

/// A shared source texture together with its identity.
///
/// Two handles are the same texture when their keys are equal; the pixel data
/// is never compared. Cloning a handle is cheap.
#[derive(Debug, Clone)]
pub struct TextureHandle {
    key: String,
    data: Arc<TextureData>,
}

impl TextureHandle {
    pub fn new(key: impl Into<String>, data: TextureData) -> Self {
        Self {
            key: key.into(),
            data: Arc::new(data),
        }
    }

    /// Handle for the built-in white texture.
    pub fn white() -> Self {
        Self::new(WHITE_TEXTURE_KEY, TextureData::white())
    }

    /// Identity key of this texture.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn data(&self) -> &TextureData {
        &self.data
    }

    pub fn is_builtin_white(&self) -> bool {
        self.key == WHITE_TEXTURE_KEY
    }
}

impl PartialEq for TextureHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TextureHandle {}

/// Load a texture from encoded image bytes.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData> {
    let img = image::load_from_memory(data)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Load a texture from an image file on disk.
pub fn load_texture_from_path<P: AsRef<Path>>(path: P) -> Result<TextureData> {
    let data = std::fs::read(path)?;
    load_texture_from_bytes(&data)
}
