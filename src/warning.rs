//! Non-fatal conditions reported alongside a generated atlas.

use serde::Serialize;
use std::fmt;

/// Why a renderer contributed no remapped UVs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The renderer has no mesh attached.
    MissingMesh,
    /// The mesh has no UV coordinates.
    EmptyUvs,
}

/// A soft problem found while generating an atlas.
///
/// Warnings never abort generation. They are returned to the caller in order of
/// discovery and also logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AtlasWarning {
    /// Two inputs share a diffuse texture and tint but carry different normal maps.
    /// The first normal map seen for the entry is kept.
    DivergentNormalForSharedEntry {
        /// Unique entry index.
        entry: usize,
        /// Position of the ignored input in the raw list.
        raw_index: usize,
        kept: Option<String>,
        ignored: Option<String>,
    },
    /// A mesh had UVs outside `[0, 1]`; all of its UVs were clamped before remapping.
    TilingUvClamped { mesh: String },
    /// A renderer was left out of UV remapping.
    MeshSkipped {
        renderer: usize,
        mesh: Option<String>,
        reason: SkipReason,
    },
}

impl fmt::Display for AtlasWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasWarning::DivergentNormalForSharedEntry {
                entry,
                raw_index,
                kept,
                ignored,
            } => write!(
                f,
                "input {} shares entry {} but has normal map {}; keeping {}",
                raw_index,
                entry,
                ignored.as_deref().unwrap_or("<none>"),
                kept.as_deref().unwrap_or("<none>")
            ),
            AtlasWarning::TilingUvClamped { mesh } => write!(
                f,
                "mesh {} has UVs outside 0-1 and was clamped; tiling is lost in the atlas",
                mesh
            ),
            AtlasWarning::MeshSkipped {
                renderer,
                mesh,
                reason,
            } => {
                let what = match reason {
                    SkipReason::MissingMesh => "has no mesh",
                    SkipReason::EmptyUvs => "has no UVs",
                };
                match mesh {
                    Some(mesh) => write!(f, "renderer {} (mesh {}) {}; skipped", renderer, mesh, what),
                    None => write!(f, "renderer {} {}; skipped", renderer, what),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let w = AtlasWarning::TilingUvClamped {
            mesh: "floor".to_string(),
        };
        assert!(w.to_string().contains("floor"));

        let w = AtlasWarning::MeshSkipped {
            renderer: 3,
            mesh: None,
            reason: SkipReason::MissingMesh,
        };
        assert_eq!(w.to_string(), "renderer 3 has no mesh; skipped");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let w = AtlasWarning::DivergentNormalForSharedEntry {
            entry: 0,
            raw_index: 2,
            kept: Some("a_n".to_string()),
            ignored: None,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "divergent_normal_for_shared_entry");
        assert_eq!(json["raw_index"], 2);
    }
}
