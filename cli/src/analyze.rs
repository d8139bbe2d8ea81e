//! Analyze command - full upload, analyze, view and export cycle
//!
//! Drives the controller through its event loop exactly as an interactive
//! front-end would: select the image, wait for the analysis, let the preview
//! render for a number of frames, then shut down and report.

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use vision3d_core::analysis::{Analyzer, GeminiAnalyzer, SourceImage, StaticAnalyzer};
use vision3d_core::{
    Command, Config, Driver, HeadlessBackend, SurfaceSize, ViewController, ViewSession, ViewState,
    Viewport, export_file_name, write_export,
};

/// Arguments for the analyze command
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Character concept image (PNG or JPEG)
    pub image: PathBuf,

    /// Write the record and blueprint as JSON (a directory uses the character name)
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Frames to render once the preview is up
    #[arg(long, default_value_t = 120)]
    pub frames: u64,

    /// Use the built-in demo result instead of calling the model
    #[arg(long)]
    pub offline: bool,
}

/// Execute the analyze command
pub fn execute(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let image = SourceImage::from_path(&args.image)
        .with_context(|| format!("Failed to load image {}", args.image.display()))?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create runtime")?;

    let session = if args.offline {
        println!("=== Offline analysis (demo character) ===");
        rt.block_on(run_cycle(StaticAnalyzer::demo(), image, &args, config))?
    } else {
        println!("=== Analyzing with {} ===", config.analysis.model);
        let analyzer = GeminiAnalyzer::new(&config.analysis)?;
        rt.block_on(run_cycle(analyzer, image, &args, config))?
    };

    if let Some(path) = &args.export {
        let path = if path.is_dir() {
            match session.record() {
                Some(record) => path.join(export_file_name(record)),
                None => path.clone(),
            }
        } else {
            path.clone()
        };
        write_export(&path, &session)?;
        println!("  Exported: {}", path.display());
    }

    Ok(())
}

async fn run_cycle<A: Analyzer>(
    analyzer: A,
    image: SourceImage,
    args: &AnalyzeArgs,
    config: &Config,
) -> Result<ViewSession> {
    let size = SurfaceSize::new(config.viewer.width, config.viewer.height);
    let viewport = Viewport::new(HeadlessBackend::new(size.width, size.height), size);
    let controller = ViewController::new(Arc::new(analyzer), viewport)
        .with_auto_rotate_speed(config.viewer.auto_rotate_speed);
    let driver = Driver::new(controller, config.viewer.frame_interval());
    let mut status = driver.status();
    let (tx, rx) = mpsc::channel(4);
    let frames = args.frames;

    let script = async move {
        tx.send(Command::SelectImage(image)).await.ok();
        let settled = status
            .wait_for(|s| {
                s.state == ViewState::Error || (s.state == ViewState::Viewing && s.frames >= frames)
            })
            .await
            .is_ok();
        if !settled {
            tracing::warn!("driver stopped before the session settled");
        }
        tx.send(Command::Shutdown).await.ok();
    };

    let (controller, ()) = tokio::join!(driver.run(rx), script);
    let session = controller.session().clone();

    match session.state {
        ViewState::Viewing => {
            print_session(&session);
            if let Some(scene) = controller.viewport().scene() {
                println!();
                println!("  Preview: {}", scene.label());
                println!("  Frames:  {}", scene.frames());
                println!("  Meshes:  {}", scene.mesh_count());
            }
            Ok(session)
        }
        ViewState::Error => {
            let message = session.error.clone().unwrap_or_default();
            bail!("Analysis failed: {}", message)
        }
        state => bail!("Analysis did not complete (state: {})", state),
    }
}

fn print_session(session: &ViewSession) {
    let Some(record) = session.record() else {
        return;
    };

    println!();
    println!("  Name:        {}", record.name);
    println!("  Material:    {}", record.material);
    println!("  Palette:     {} / {}", record.primary_color, record.secondary_color);
    println!("  Lighting:    {}", record.lighting);
    if !record.complexity.is_empty() {
        println!("  Complexity:  {}", record.complexity);
    }
    println!("  Features:    {}", record.features.join(", "));
    println!();
    println!("  {}", record.description);

    if let Some(advice) = record.modeling_advice() {
        println!();
        println!("  Modeling advice: {}", advice);
    }

    if let Some(blueprint) = session.blueprint() {
        println!();
        println!("--- Blueprint ---");
        println!("{}", blueprint);
    }
}
