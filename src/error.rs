//! Error types for atlas generation.

use thiserror::Error;

/// Result type alias using AtlasError.
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Main error type for atlas generation.
///
/// Only [`AtlasError::LayoutInfeasible`] can come out of the packing core itself.
/// Soft conditions (tiling UVs, divergent normals, skipped meshes) are reported
/// as [`crate::AtlasWarning`] values instead.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// No cell size down to the minimum fits every entry inside the atlas bound.
    #[error(
        "Cannot fit {entry_count} textures into a {max_dimension}x{max_dimension} atlas \
         even at {min_cell_size}px cells; raise the max atlas size or reduce the entries"
    )]
    LayoutInfeasible {
        entry_count: usize,
        max_dimension: u32,
        min_cell_size: u32,
    },

    /// Configuration values that no layout could ever satisfy.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Source texture with no pixels or a truncated pixel buffer.
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to export an atlas or manifest.
    #[error("Export error: {0}")]
    Export(String),
}
