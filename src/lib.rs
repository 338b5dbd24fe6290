//! # Atlas Baker
//!
//! A Rust library for packing many material textures into a grid atlas so the
//! meshes using them can share a single material.
//!
//! ## Overview
//!
//! The input is an ordered list of renderers, each with a diffuse texture, an
//! optional tint, an optional normal map, and the mesh's UVs. The output is a
//! diffuse atlas, an optional normal atlas, and new UVs for every mesh.
//!
//! Generation runs in four steps:
//!
//! 1. [`dedupe`] collapses renderers sharing a diffuse texture and tint.
//! 2. [`layout::plan`] picks a uniform power-of-two cell size and a grid.
//! 3. [`atlas::compose`] resamples each entry into its cell.
//! 4. [`uv::remap`] moves each mesh's UVs into its entry's cell.
//!
//! ## Quick Start
//!
//! ```ignore
//! use atlas_baker::{generate, AtlasConfig, RendererInput, TextureHandle, load_texture_from_path};
//!
//! let wood = TextureHandle::new("wood.png", load_texture_from_path("wood.png")?);
//! let inputs = vec![
//!     RendererInput::new("crate", crate_uvs).with_diffuse(wood.clone()),
//!     RendererInput::new("barrel", barrel_uvs).with_diffuse(wood).with_tint([0.8, 0.6, 0.4, 1.0]),
//! ];
//!
//! if let Some(output) = generate(&inputs, &AtlasConfig::default())?.into_output() {
//!     let png = output.diffuse.to_png()?;
//!     for mesh in &output.meshes {
//!         // apply mesh.uvs to mesh.mesh
//!     }
//! }
//! ```

pub mod error;
pub mod types;
pub mod texture;
pub mod layout;
pub mod atlas;
pub mod uv;
pub mod dedupe;
pub mod warning;
pub mod generator;
pub mod export;

// Re-export main types for convenience
pub use error::{AtlasError, Result};
pub use types::{CellPosition, Rgba, Uv};
pub use texture::{load_texture_from_bytes, load_texture_from_path, ColorSpace, TextureData, TextureHandle};
pub use layout::GridLayout;
pub use atlas::{AtlasImage, AtlasRole};
pub use uv::{CellRegion, UvRemap};
pub use dedupe::{dedupe, Deduplicated, TextureEntry};
pub use warning::{AtlasWarning, SkipReason};
pub use generator::{
    AtlasConfig, AtlasGenerator, AtlasOutput, Generation, MeshRemap, RendererInput, RECOGNIZED_ATLAS_SIZES,
};
pub use export::{export_to_directory, AtlasManifest};

/// Run the whole pipeline with the given configuration.
pub fn generate(inputs: &[RendererInput], config: &AtlasConfig) -> Result<Generation> {
    AtlasGenerator::new(config.clone()).generate(inputs)
}
