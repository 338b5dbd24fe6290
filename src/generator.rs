//! The full generation pipeline: dedupe, plan, composite, remap.

use crate::atlas::{compose_diffuse, compose_normal, AtlasImage};
use crate::dedupe::{dedupe, TextureEntry};
use crate::error::{AtlasError, Result};
use crate::layout::{plan, GridLayout, MIN_CELL_SIZE};
use crate::texture::TextureHandle;
use crate::types::{CellPosition, Rgba, Uv};
use crate::uv::remap;
use crate::warning::{AtlasWarning, SkipReason};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Atlas sizes offered to users. The library accepts any bound of at least
/// [`MIN_CELL_SIZE`].
pub const RECOGNIZED_ATLAS_SIZES: [u32; 5] = [256, 512, 1024, 2048, 4096];

/// Atlas generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Maximum atlas width and height in pixels.
    pub max_atlas_dimension: u32,
    /// Padding around every cell's content.
    pub padding: u32,
    /// Read tint colors from the inputs.
    pub apply_tint: bool,
    /// Build a normal atlas alongside the diffuse one.
    pub enable_normal_atlasing: bool,
    /// Resample and blit entries on the rayon thread pool.
    pub parallel: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            max_atlas_dimension: 2048,
            padding: 2,
            apply_tint: true,
            enable_normal_atlasing: false,
            parallel: true,
        }
    }
}

impl AtlasConfig {
    pub fn with_max_atlas_dimension(mut self, max_atlas_dimension: u32) -> Self {
        self.max_atlas_dimension = max_atlas_dimension;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_tint(mut self, apply_tint: bool) -> Self {
        self.apply_tint = apply_tint;
        self
    }

    pub fn with_normals(mut self, enable_normal_atlasing: bool) -> Self {
        self.enable_normal_atlasing = enable_normal_atlasing;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject bounds no cell could ever fit in.
    pub fn validate(&self) -> Result<()> {
        if self.max_atlas_dimension < MIN_CELL_SIZE {
            return Err(AtlasError::InvalidConfig(format!(
                "max atlas dimension {} is below the {}px minimum cell size",
                self.max_atlas_dimension, MIN_CELL_SIZE
            )));
        }
        Ok(())
    }
}

/// One renderer handed over by the scene collaborator.
#[derive(Debug, Clone, Default)]
pub struct RendererInput {
    /// Identity of the renderer's mesh, or `None` if it has no mesh.
    pub mesh: Option<String>,
    /// Diffuse texture. `None` means untextured and samples as white.
    pub diffuse: Option<TextureHandle>,
    /// Material color, if the material is tinted.
    pub tint: Option<Rgba>,
    pub normal: Option<TextureHandle>,
    /// Per-vertex UVs of the mesh.
    pub uvs: Vec<Uv>,
}

impl RendererInput {
    pub fn new(mesh: impl Into<String>, uvs: Vec<Uv>) -> Self {
        Self {
            mesh: Some(mesh.into()),
            uvs,
            ..Default::default()
        }
    }

    pub fn with_diffuse(mut self, diffuse: TextureHandle) -> Self {
        self.diffuse = Some(diffuse);
        self
    }

    pub fn with_tint(mut self, tint: Rgba) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn with_normal(mut self, normal: TextureHandle) -> Self {
        self.normal = Some(normal);
        self
    }
}

/// Remapped UVs for one renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRemap {
    /// Index of the renderer in the input list.
    pub renderer: usize,
    pub mesh: String,
    /// Unique entry the renderer samples.
    pub entry: usize,
    pub cell: CellPosition,
    pub uvs: Vec<Uv>,
    /// Whether the original UVs were clamped to `[0, 1]`.
    pub clamped: bool,
}

/// Output of a successful generation.
#[derive(Debug)]
pub struct AtlasOutput {
    pub layout: GridLayout,
    /// Unique entries in cell order.
    pub entries: Vec<TextureEntry>,
    pub diffuse: AtlasImage,
    pub normal: Option<AtlasImage>,
    /// Remapped UVs for every renderer that wasn't skipped.
    pub meshes: Vec<MeshRemap>,
    pub warnings: Vec<AtlasWarning>,
}

impl AtlasOutput {
    /// Find the remap produced for a renderer.
    pub fn mesh_for_renderer(&self, renderer: usize) -> Option<&MeshRemap> {
        self.meshes.iter().find(|m| m.renderer == renderer)
    }

    /// Number of grid cells left empty.
    pub fn waste(&self) -> usize {
        self.layout.capacity() - self.entries.len()
    }
}

/// Result of a generation run.
#[derive(Debug)]
pub enum Generation {
    /// No renderer had anything to pack.
    NothingToDo { warnings: Vec<AtlasWarning> },
    Generated(AtlasOutput),
}

impl Generation {
    pub fn output(&self) -> Option<&AtlasOutput> {
        match self {
            Generation::Generated(output) => Some(output),
            Generation::NothingToDo { .. } => None,
        }
    }

    pub fn into_output(self) -> Option<AtlasOutput> {
        match self {
            Generation::Generated(output) => Some(output),
            Generation::NothingToDo { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[AtlasWarning] {
        match self {
            Generation::Generated(output) => &output.warnings,
            Generation::NothingToDo { warnings } => warnings,
        }
    }
}

/// Renderer that made it past the skip checks.
struct Packable<'a> {
    renderer: usize,
    mesh: &'a str,
    uvs: &'a [Uv],
}

/// The main atlas generator.
pub struct AtlasGenerator {
    config: AtlasConfig,
}

impl AtlasGenerator {
    /// Create a new generator with custom configuration.
    pub fn new(config: AtlasConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Pack the renderers' textures into atlases and remap their UVs.
    pub fn generate(&self, inputs: &[RendererInput]) -> Result<Generation> {
        self.config.validate()?;

        let mut warnings = Vec::new();
        let mut packable = Vec::with_capacity(inputs.len());
        let mut raw_entries = Vec::with_capacity(inputs.len());

        for (renderer, input) in inputs.iter().enumerate() {
            let reason = match &input.mesh {
                None => Some(SkipReason::MissingMesh),
                Some(_) if input.uvs.is_empty() => Some(SkipReason::EmptyUvs),
                Some(_) => None,
            };
            if let Some(reason) = reason {
                let warning = AtlasWarning::MeshSkipped {
                    renderer,
                    mesh: input.mesh.clone(),
                    reason,
                };
                log::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            packable.push(Packable {
                renderer,
                mesh: input.mesh.as_deref().unwrap_or_default(),
                uvs: &input.uvs,
            });
            raw_entries.push(self.entry_for(input));
        }

        if raw_entries.is_empty() {
            log::info!("No renderers to pack; nothing to do");
            return Ok(Generation::NothingToDo { warnings });
        }

        let deduplicated = dedupe(&raw_entries);
        warnings.extend(deduplicated.warnings);
        let entries = deduplicated.entries;

        for entry in &entries {
            validate_texture(&entry.diffuse)?;
            if let Some(normal) = &entry.normal {
                validate_texture(normal)?;
            }
        }

        let native_sizes: Vec<_> = entries.iter().map(|e| e.diffuse.data().dimensions()).collect();
        let layout = plan(&native_sizes, self.config.max_atlas_dimension, self.config.padding)?;

        let diffuse = compose_diffuse(&entries, &layout, self.config.parallel)?;
        let normal = if self.config.enable_normal_atlasing {
            Some(compose_normal(&entries, &layout, self.config.parallel)?)
        } else {
            None
        };

        let mut warned_meshes = HashSet::new();
        let meshes = packable
            .iter()
            .zip(&deduplicated.entry_index_of)
            .map(|(item, &entry)| {
                let cell = layout.cell_of(entry);
                let remapped = remap(item.uvs, cell, &layout);
                if remapped.clamped && warned_meshes.insert(item.mesh) {
                    let warning = AtlasWarning::TilingUvClamped {
                        mesh: item.mesh.to_string(),
                    };
                    log::warn!("{}", warning);
                    warnings.push(warning);
                }
                MeshRemap {
                    renderer: item.renderer,
                    mesh: item.mesh.to_string(),
                    entry,
                    cell,
                    uvs: remapped.uvs,
                    clamped: remapped.clamped,
                }
            })
            .collect();

        log::info!(
            "Packed {} renderers into {} entries on a {}x{} atlas ({}x{} grid, {}px cells)",
            packable.len(),
            entries.len(),
            diffuse.width,
            diffuse.height,
            layout.columns,
            layout.rows,
            layout.cell_size
        );

        Ok(Generation::Generated(AtlasOutput {
            layout,
            entries,
            diffuse,
            normal,
            meshes,
            warnings,
        }))
    }

    /// Build the raw entry for a renderer, honoring the tint and normal switches.
    fn entry_for(&self, input: &RendererInput) -> TextureEntry {
        TextureEntry {
            diffuse: input.diffuse.clone().unwrap_or_else(TextureHandle::white),
            normal: input
                .normal
                .clone()
                .filter(|_| self.config.enable_normal_atlasing),
            tint: input.tint.filter(|_| self.config.apply_tint),
        }
    }
}

impl Default for AtlasGenerator {
    fn default() -> Self {
        Self::new(AtlasConfig::default())
    }
}

fn validate_texture(texture: &TextureHandle) -> Result<()> {
    texture.data().validate().map_err(|e| match e {
        AtlasError::InvalidTexture(msg) => AtlasError::InvalidTexture(format!("{}: {}", texture.key(), msg)),
        other => other,
    })
}
