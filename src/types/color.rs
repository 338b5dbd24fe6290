//! Color helpers for tinting and background fills.

/// Linear RGBA color with components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Opaque white, the diffuse background and the "no texture" color.
pub const OPAQUE_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Encoding of a normal pointing straight out of the surface, (0.5, 0.5, 1.0, 1.0).
pub const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

/// Quantize a color to RGBA8 so it can be compared and hashed.
pub fn quantize_color(color: Rgba) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Multiply the RGB channels of an RGBA8 pixel by a tint. Alpha is left untouched.
pub fn multiply_rgb(pixel: [u8; 4], tint: Rgba) -> [u8; 4] {
    let channel = |c: u8, t: f32| (c as f32 * t.clamp(0.0, 1.0)).round().clamp(0.0, 255.0) as u8;
    [
        channel(pixel[0], tint[0]),
        channel(pixel[1], tint[1]),
        channel(pixel[2], tint[2]),
        pixel[3],
    ]
}
