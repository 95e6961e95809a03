//! Batch manifest parsing and build orchestration
//!
//! Parses a models.toml and converts every listed model.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::convert::{convert_gltf, ExportOptions};

/// Extension of produced model files
pub const BMD_EXT: &str = "bmd";

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    /// Output stem → source. Ordered so batch output is reproducible.
    #[serde(default)]
    pub models: BTreeMap<String, ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("models/")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ModelEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        padding: Option<String>,
    },
}

impl ModelEntry {
    pub fn path(&self) -> &Path {
        match self {
            ModelEntry::Simple(p) => p,
            ModelEntry::Detailed { path, .. } => path,
        }
    }

    pub fn options(&self) -> ExportOptions {
        match self {
            ModelEntry::Simple(_) => ExportOptions::default(),
            ModelEntry::Detailed { padding, .. } => ExportOptions {
                padding: padding.clone(),
            },
        }
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    Ok(toml::from_str(content)?)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    for (name, entry) in &manifest.models {
        if !entry.path().exists() {
            anyhow::bail!("Model '{}' source not found: {:?}", name, entry.path());
        }
        if !is_gltf(entry.path()) {
            anyhow::bail!(
                "Unsupported model format for '{}': {:?} (use .gltf or .glb)",
                name,
                entry.path()
            );
        }
    }
    Ok(())
}

/// Build all models from a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    let output_dir = output_override.unwrap_or(&manifest.output.dir);
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    for (name, entry) in &manifest.models {
        let output = output_dir.join(format!("{}.{}", name, BMD_EXT));
        tracing::info!("Converting model: {} -> {:?}", name, output);

        if !is_gltf(entry.path()) {
            anyhow::bail!("Unsupported model format for '{}': {:?}", name, entry.path());
        }
        convert_gltf(entry.path(), &output, &entry.options())
            .with_context(|| format!("Failed to build model '{}'", name))?;
    }

    tracing::info!("Built {} model(s)", manifest.models.len());
    Ok(())
}

/// Whether the path has a glTF extension (case-insensitive)
pub fn is_gltf(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();
    matches!(ext.as_str(), "gltf" | "glb")
}
