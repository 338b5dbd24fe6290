//! JSON manifest describing an atlas and the remapped meshes.

use crate::error::Result;
use crate::generator::AtlasOutput;
use crate::layout::GridLayout;
use crate::types::{CellPosition, Rgba, Uv};
use crate::uv::CellRegion;
use crate::warning::AtlasWarning;
use serde::Serialize;

/// One packed entry.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub cell: CellPosition,
    pub region: CellRegion,
    pub diffuse: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<Rgba>,
}

/// One remapped mesh.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestMesh {
    pub renderer: usize,
    pub mesh: String,
    pub entry: usize,
    pub clamped: bool,
    pub uvs: Vec<Uv>,
}

/// Everything a caller needs to rebuild materials and meshes against the atlas.
#[derive(Debug, Clone, Serialize)]
pub struct AtlasManifest {
    pub width: u32,
    pub height: u32,
    pub layout: GridLayout,
    pub has_normal_atlas: bool,
    pub entries: Vec<ManifestEntry>,
    pub meshes: Vec<ManifestMesh>,
    pub warnings: Vec<AtlasWarning>,
}

impl AtlasManifest {
    pub fn from_output(output: &AtlasOutput) -> Self {
        let layout = output.layout;
        let entries = output
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let cell = layout.cell_of(index);
                ManifestEntry {
                    index,
                    cell,
                    region: CellRegion::of(cell, &layout),
                    diffuse: entry.diffuse.key().to_string(),
                    normal: entry.normal.as_ref().map(|n| n.key().to_string()),
                    tint: entry.tint,
                }
            })
            .collect();

        let meshes = output
            .meshes
            .iter()
            .map(|m| ManifestMesh {
                renderer: m.renderer,
                mesh: m.mesh.clone(),
                entry: m.entry,
                clamped: m.clamped,
                uvs: m.uvs.clone(),
            })
            .collect();

        Self {
            width: output.diffuse.width,
            height: output.diffuse.height,
            layout,
            has_normal_atlas: output.normal.is_some(),
            entries,
            meshes,
            warnings: output.warnings.clone(),
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
