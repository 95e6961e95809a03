//! bmd-export - J3D model export tool
//!
//! Compiles glTF scenes (skeleton, skin weights, vertex data) into BMD
//! binary models.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bmd_export::{convert, manifest};

#[derive(Parser)]
#[command(name = "bmd-export")]
#[command(about = "J3D model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single glTF/GLB model
    Convert {
        /// Input glTF/GLB file
        input: PathBuf,

        /// Output .bmd file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Alignment filler text
        #[arg(long)]
        padding: Option<String>,
    },

    /// Convert every model listed in a manifest
    Batch {
        /// Path to models.toml manifest
        #[arg(default_value = "models.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to models.toml manifest
        #[arg(default_value = "models.toml")]
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            padding,
        } => {
            if !manifest::is_gltf(&input) {
                anyhow::bail!("Unsupported model format: {:?} (use .gltf or .glb)", input);
            }
            let output = output.unwrap_or_else(|| input.with_extension(manifest::BMD_EXT));
            tracing::info!("Converting {:?} -> {:?}", input, output);

            let options = convert::ExportOptions { padding };
            convert::convert_gltf(&input, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::Batch { manifest, output } => {
            tracing::info!("Building models from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }
    }

    Ok(())
}
