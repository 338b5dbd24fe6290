//! Atlas Baker CLI
//!
//! Pack textures from a JSON job file into atlases and remap mesh UVs.

use atlas_baker::{
    export_to_directory, layout, load_texture_from_path, AtlasConfig, AtlasGenerator, Generation, RendererInput,
    TextureHandle, RECOGNIZED_ATLAS_SIZES,
};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "atlas-baker")]
#[command(author, version, about = "Pack material textures into grid atlases and remap mesh UVs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build atlases for the renderers in a job file
    Bake {
        /// Input JSON job file
        #[arg(short, long)]
        job: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// File name prefix for the written atlases and manifest
        #[arg(long, default_value = "atlas")]
        name: String,

        /// Maximum atlas size (256, 512, 1024, 2048 or 4096)
        #[arg(long, value_parser = parse_atlas_size)]
        max_size: Option<u32>,

        /// Padding around every cell in pixels
        #[arg(long)]
        padding: Option<u32>,

        /// Ignore material tint colors
        #[arg(long)]
        no_tint: bool,

        /// Also build a normal map atlas
        #[arg(long)]
        normals: bool,

        /// Composite on the calling thread only
        #[arg(long)]
        single_threaded: bool,
    },

    /// Show the grid that would be planned for a set of textures
    Plan {
        /// Number of textures
        #[arg(short, long)]
        count: usize,

        /// Native texture size as WIDTHxHEIGHT
        #[arg(short, long, value_parser = parse_size, default_value = "256x256")]
        size: (u32, u32),

        /// Maximum atlas size (256, 512, 1024, 2048 or 4096)
        #[arg(long, value_parser = parse_atlas_size, default_value = "2048")]
        max_size: u32,

        /// Padding around every cell in pixels
        #[arg(long, default_value = "2")]
        padding: u32,
    },
}

fn parse_atlas_size(s: &str) -> Result<u32, String> {
    let size: u32 = s.parse().map_err(|_| format!("Invalid atlas size: '{}'", s))?;
    if !RECOGNIZED_ATLAS_SIZES.contains(&size) {
        return Err(format!("Atlas size must be one of {:?}", RECOGNIZED_ATLAS_SIZES));
    }
    Ok(size)
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("Invalid size format: '{}'. Use WIDTHxHEIGHT", s))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|_| format!("Invalid size: '{}'", s));
    Ok((parse(w)?, parse(h)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Bake {
            job,
            output,
            name,
            max_size,
            padding,
            no_tint,
            normals,
            single_threaded,
        } => {
            let overrides = ConfigOverrides {
                max_size,
                padding,
                no_tint,
                normals,
                single_threaded,
            };
            bake(&job, &output, &name, overrides)?;
        }
        Commands::Plan {
            count,
            size,
            max_size,
            padding,
        } => {
            show_plan(count, size, max_size, padding)?;
        }
    }

    Ok(())
}

/// Command-line settings that take precedence over the job file.
struct ConfigOverrides {
    max_size: Option<u32>,
    padding: Option<u32>,
    no_tint: bool,
    normals: bool,
    single_threaded: bool,
}

impl ConfigOverrides {
    fn apply(&self, mut config: AtlasConfig) -> AtlasConfig {
        if let Some(max_size) = self.max_size {
            config.max_atlas_dimension = max_size;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if self.no_tint {
            config.apply_tint = false;
        }
        if self.normals {
            config.enable_normal_atlasing = true;
        }
        if self.single_threaded {
            config.parallel = false;
        }
        config
    }
}

fn bake(
    job_path: &Path,
    output_dir: &Path,
    name: &str,
    overrides: ConfigOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading job from {:?}...", job_path);
    let json_content = fs::read_to_string(job_path)?;
    let job: JobInput = serde_json::from_str(&json_content)?;
    println!("  Loaded {} renderers", job.renderers.len());

    let base_dir = job_path.parent().unwrap_or_else(|| Path::new("."));
    let mut textures = TextureCache::new(base_dir);
    let inputs = job
        .renderers
        .iter()
        .map(|entry| entry.to_input(&mut textures))
        .collect::<Result<Vec<_>, _>>()?;
    println!("  Loaded {} textures", textures.len());

    let config = overrides.apply(job.config.unwrap_or_default());
    println!("Baking with config:");
    println!("  - Atlas max size: {}", config.max_atlas_dimension);
    println!("  - Padding: {}", config.padding);
    println!("  - Tint: {}", config.apply_tint);
    println!("  - Normal atlas: {}", config.enable_normal_atlasing);

    let generation = AtlasGenerator::new(config).generate(&inputs)?;
    for warning in generation.warnings() {
        println!("  Warning: {}", warning);
    }

    let output = match generation {
        Generation::Generated(output) => output,
        Generation::NothingToDo { .. } => {
            println!("Nothing to pack.");
            return Ok(());
        }
    };

    println!(
        "  Packed {} entries into a {}x{} atlas ({}x{} grid of {}px cells, {} empty)",
        output.entries.len(),
        output.diffuse.width,
        output.diffuse.height,
        output.layout.columns,
        output.layout.rows,
        output.layout.cell_size,
        output.waste()
    );

    let files = export_to_directory(&output, output_dir, name)?;
    println!("Exported diffuse atlas to {:?}", files.diffuse);
    if let Some(normal) = &files.normal {
        println!("Exported normal atlas to {:?}", normal);
    }
    println!("Exported manifest to {:?}", files.manifest);

    Ok(())
}

fn show_plan(count: usize, size: (u32, u32), max_size: u32, padding: u32) -> Result<(), Box<dyn std::error::Error>> {
    if count == 0 {
        println!("Nothing to pack.");
        return Ok(());
    }

    let planned = layout::plan(&vec![size; count], max_size, padding)?;
    println!("Grid: {} columns x {} rows", planned.columns, planned.rows);
    println!("Cell size: {}px (+{}px padding)", planned.cell_size, padding);
    println!("Atlas: {}x{}", planned.atlas_width(), planned.atlas_height());
    println!("Empty cells: {}", planned.capacity() - count);

    Ok(())
}

// JSON job format
#[derive(serde::Deserialize)]
struct JobInput {
    #[serde(default)]
    config: Option<AtlasConfig>,
    renderers: Vec<RendererEntry>,
}

#[derive(serde::Deserialize)]
struct RendererEntry {
    #[serde(default)]
    mesh: Option<String>,
    #[serde(default)]
    diffuse: Option<PathBuf>,
    #[serde(default)]
    tint: Option<[f32; 4]>,
    #[serde(default)]
    normal: Option<PathBuf>,
    #[serde(default)]
    uvs: Vec<[f32; 2]>,
}

impl RendererEntry {
    fn to_input(&self, textures: &mut TextureCache) -> atlas_baker::Result<RendererInput> {
        Ok(RendererInput {
            mesh: self.mesh.clone(),
            diffuse: self.diffuse.as_deref().map(|p| textures.load(p)).transpose()?,
            tint: self.tint,
            normal: self.normal.as_deref().map(|p| textures.load(p)).transpose()?,
            uvs: self.uvs.clone(),
        })
    }
}

/// Loads each texture path once so that equal paths share one identity.
struct TextureCache {
    base_dir: PathBuf,
    loaded: HashMap<PathBuf, TextureHandle>,
}

impl TextureCache {
    fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            loaded: HashMap::new(),
        }
    }

    fn load(&mut self, relative: &Path) -> atlas_baker::Result<TextureHandle> {
        let path = self.base_dir.join(relative);
        if let Some(handle) = self.loaded.get(&path) {
            return Ok(handle.clone());
        }

        let data = load_texture_from_path(&path)?;
        let handle = TextureHandle::new(relative.to_string_lossy(), data);
        self.loaded.insert(path, handle.clone());
        Ok(handle)
    }

    fn len(&self) -> usize {
        self.loaded.len()
    }
}
