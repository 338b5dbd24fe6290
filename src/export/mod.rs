//! Export helpers for handing generated atlases to storage.
//!
//! The generator never touches the filesystem; these are for callers that
//! want the conventional PNG + JSON manifest layout.

pub mod directory;
pub mod manifest;

pub use directory::{export_to_directory, ExportedFiles};
pub use manifest::{AtlasManifest, ManifestEntry, ManifestMesh};
