//! Writing atlases and the manifest into a directory.

use super::AtlasManifest;
use crate::error::Result;
use crate::generator::AtlasOutput;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths written by [`export_to_directory`].
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub diffuse: PathBuf,
    pub normal: Option<PathBuf>,
    pub manifest: PathBuf,
}

/// Write `<stem>_diffuse.png`, `<stem>_normal.png` (if built) and
/// `<stem>_manifest.json` into `dir`, creating it if needed.
pub fn export_to_directory<P: AsRef<Path>>(output: &AtlasOutput, dir: P, stem: &str) -> Result<ExportedFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let diffuse = dir.join(format!("{}_diffuse.png", stem));
    output.diffuse.save_png(&diffuse)?;

    let normal = match &output.normal {
        Some(atlas) => {
            let path = dir.join(format!("{}_normal.png", stem));
            atlas.save_png(&path)?;
            Some(path)
        }
        None => None,
    };

    let manifest = dir.join(format!("{}_manifest.json", stem));
    fs::write(&manifest, AtlasManifest::from_output(output).to_json()?)?;

    log::info!("Exported atlas to {:?}", dir);
    Ok(ExportedFiles {
        diffuse,
        normal,
        manifest,
    })
}
