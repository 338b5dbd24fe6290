//! Resampling source textures to atlas cell size.
//!
//! Both color spaces filter bilinearly on the stored 8-bit values. Diffuse data is
//! filtered as encoded (perceptual) color. Normal data is vector data: after
//! filtering, each texel is decoded to a vector, renormalized, and re-encoded, so
//! interpolation between differently oriented normals doesn't shorten them and
//! shift the hue of the map.

use super::TextureData;
use crate::error::{AtlasError, Result};
use glam::Vec3;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// How the stored pixel values of a texture should be interpreted while filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Gamma-encoded color (diffuse maps).
    Perceptual,
    /// Linear vector data (tangent-space normal maps).
    Linear,
}

/// Resample a texture to exactly `size` x `size` pixels.
pub fn resample(texture: &TextureData, size: u32, space: ColorSpace) -> Result<TextureData> {
    texture.validate()?;

    let mut pixels = if texture.dimensions() == (size, size) {
        texture.pixels.clone()
    } else {
        let source = RgbaImage::from_raw(texture.width, texture.height, texture.pixels.clone())
            .ok_or_else(|| {
                AtlasError::InvalidTexture(format!(
                    "pixel buffer does not match {}x{}",
                    texture.width, texture.height
                ))
            })?;
        imageops::resize(&source, size, size, FilterType::Triangle).into_raw()
    };

    if space == ColorSpace::Linear {
        for texel in pixels.chunks_exact_mut(4) {
            renormalize(texel);
        }
    }

    Ok(TextureData::new(size, size, pixels))
}

/// Re-encode an RGB-packed normal at unit length. Degenerate vectors become flat.
fn renormalize(texel: &mut [u8]) {
    let decode = |c: u8| c as f32 / 255.0 * 2.0 - 1.0;
    let encode = |n: f32| ((n * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8;

    let normal = Vec3::new(decode(texel[0]), decode(texel[1]), decode(texel[2]))
        .try_normalize()
        .unwrap_or(Vec3::Z);

    texel[0] = encode(normal.x);
    texel[1] = encode(normal.y);
    texel[2] = encode(normal.z);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FLAT_NORMAL;

    #[test]
    fn test_resample_same_size_is_copy() {
        let tex = TextureData::new(2, 2, vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 9, 9, 9, 9]);
        let out = resample(&tex, 2, ColorSpace::Perceptual).unwrap();
        assert_eq!(out, tex);
    }

    #[test]
    fn test_resample_uniform_color_is_preserved() {
        let tex = TextureData::solid(64, 64, [128, 128, 128, 255]);
        let down = resample(&tex, 16, ColorSpace::Perceptual).unwrap();
        assert_eq!(down.dimensions(), (16, 16));
        assert!(down.pixels.chunks(4).all(|p| p == [128, 128, 128, 255]));

        let up = resample(&TextureData::white(), 32, ColorSpace::Perceptual).unwrap();
        assert_eq!(up.dimensions(), (32, 32));
        assert!(up.pixels.chunks(4).all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_flat_normals_survive_linear_resample() {
        let tex = TextureData::flat_normal(8);
        let out = resample(&tex, 16, ColorSpace::Linear).unwrap();
        assert!(out.pixels.chunks(4).all(|p| p == FLAT_NORMAL));
    }

    #[test]
    fn test_linear_resample_keeps_unit_length() {
        // Left half tilted along +X, right half tilted along -X.
        let mut tex = TextureData::solid(4, 4, [0, 0, 0, 255]);
        for y in 0..4 {
            for x in 0..4 {
                let idx = ((y * 4 + x) * 4) as usize;
                let texel = if x < 2 { [218, 128, 218] } else { [37, 128, 218] };
                tex.pixels[idx..idx + 3].copy_from_slice(&texel);
            }
        }

        let out = resample(&tex, 2, ColorSpace::Linear).unwrap();
        for texel in out.pixels.chunks(4) {
            let n = Vec3::new(
                texel[0] as f32 / 255.0 * 2.0 - 1.0,
                texel[1] as f32 / 255.0 * 2.0 - 1.0,
                texel[2] as f32 / 255.0 * 2.0 - 1.0,
            );
            assert!((n.length() - 1.0).abs() < 0.02, "length {}", n.length());
        }
    }

    #[test]
    fn test_resample_rejects_empty_texture() {
        let tex = TextureData::new(0, 0, Vec::new());
        assert!(resample(&tex, 16, ColorSpace::Perceptual).is_err());
    }
}
