//! Collapsing inputs that would composite to identical atlas cells.

use crate::texture::TextureHandle;
use crate::types::{quantize_color, Rgba};
use crate::warning::AtlasWarning;
use std::collections::HashMap;

/// One atlas cell's worth of source material.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureEntry {
    pub diffuse: TextureHandle,
    pub normal: Option<TextureHandle>,
    /// Color multiplied into the diffuse RGB, if tinting is enabled for this entry.
    pub tint: Option<Rgba>,
}

impl TextureEntry {
    pub fn new(diffuse: TextureHandle) -> Self {
        Self {
            diffuse,
            normal: None,
            tint: None,
        }
    }

    pub fn with_normal(mut self, normal: TextureHandle) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_tint(mut self, tint: Rgba) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Identity of the entry: diffuse texture key plus quantized tint.
    fn key(&self) -> EntryKey {
        EntryKey {
            diffuse: self.diffuse.key().to_string(),
            tint: self.tint.map(quantize_color),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    diffuse: String,
    tint: Option<[u8; 4]>,
}

/// Result of deduplicating a raw entry list.
#[derive(Debug, Clone, Default)]
pub struct Deduplicated {
    /// Unique entries in first-seen order. This order assigns grid cells.
    pub entries: Vec<TextureEntry>,
    /// For every raw input, the index of its unique entry.
    pub entry_index_of: Vec<usize>,
    pub warnings: Vec<AtlasWarning>,
}

/// Collapse raw entries sharing a diffuse texture and tint.
///
/// The first entry seen for a key decides the normal map. Later entries with a
/// different normal map produce a warning and are folded in anyway.
pub fn dedupe(raw: &[TextureEntry]) -> Deduplicated {
    let mut result = Deduplicated::default();
    let mut index_of_key: HashMap<EntryKey, usize> = HashMap::new();

    for (raw_index, entry) in raw.iter().enumerate() {
        let key = entry.key();
        let index = match index_of_key.get(&key) {
            Some(&index) => {
                let kept = &result.entries[index].normal;
                if entry.normal.is_some() && entry.normal != *kept {
                    let warning = AtlasWarning::DivergentNormalForSharedEntry {
                        entry: index,
                        raw_index,
                        kept: kept.as_ref().map(|n| n.key().to_string()),
                        ignored: entry.normal.as_ref().map(|n| n.key().to_string()),
                    };
                    log::warn!("{}", warning);
                    result.warnings.push(warning);
                }
                index
            }
            None => {
                let index = result.entries.len();
                result.entries.push(entry.clone());
                index_of_key.insert(key, index);
                index
            }
        };
        result.entry_index_of.push(index);
    }

    log::debug!(
        "Deduplicated {} inputs into {} entries",
        raw.len(),
        result.entries.len()
    );
    result
}
