//! Vision3D CLI - character concept previewer
//!
//! # Commands
//!
//! - `vision3d analyze <IMAGE>` - Analyze an image, render its preview, print the blueprint
//! - `vision3d preview` - Render the preview for a record file (or the built-in demo)
//! - `vision3d schema` - Print the response schema sent to the analysis model
//! - `vision3d config` - Show the effective configuration, or write defaults with `--init`
//!
//! # Usage
//!
//! ```bash
//! # Analyze a concept image and save the result
//! API_KEY=... vision3d analyze knight.png --export knight.json
//!
//! # Run the whole cycle offline with the demo character
//! vision3d analyze knight.png --offline
//!
//! # Inspect the generated scene for a saved record
//! vision3d preview --record knight.json --dump scene.json
//! ```

mod analyze;
mod config_cmd;
mod preview;
mod schema;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vision3d_core::Config;
use vision3d_core::config;

/// Vision3D - turn character concept art into a 3D blockout preview
#[derive(Parser)]
#[command(name = "vision3d")]
#[command(about = "Turn character concept art into a 3D blockout preview")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an image and render its preview
    Analyze(analyze::AnalyzeArgs),

    /// Render the preview for a record file or the demo character
    Preview(preview::PreviewArgs),

    /// Print the analysis response schema
    Schema,

    /// Show or initialize the configuration
    Config(config_cmd::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    config.apply_env_overrides();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => analyze::execute(args, &config),
        Commands::Preview(args) => preview::execute(args, &config),
        Commands::Schema => schema::execute(),
        Commands::Config(args) => config_cmd::execute(args, &config, cli.config.as_deref()),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => config::load().context("Failed to load config"),
    }
}
