//! Source texture data, loading, and resampling.

mod data;
pub mod sampler;

pub use data::{load_texture_from_bytes, load_texture_from_path, TextureData, TextureHandle};
pub use sampler::{resample, ColorSpace};
