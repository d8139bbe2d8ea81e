//! Preview command - build and render the scene for a record without analysis

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use vision3d_core::figure::{NodeRole, SceneDescription, generate_from};
use vision3d_core::{Config, HeadlessBackend, SurfaceSize, Viewport};
use vision3d_shared::{AnalysisResult, AttributeRecord, demo_record};

/// Arguments for the preview command
#[derive(Args)]
pub struct PreviewArgs {
    /// Record JSON: an exported analysis or a bare record (default: the demo character)
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Frames to render
    #[arg(long, default_value_t = 60)]
    pub frames: u64,

    /// Write the generated scene description as JSON
    #[arg(long)]
    pub dump: Option<PathBuf>,
}

/// Execute the preview command
pub fn execute(args: PreviewArgs, config: &Config) -> Result<()> {
    let record = match &args.record {
        Some(path) => load_record(path)?,
        None => demo_record(),
    };

    let mut description = generate_from(&record).context("Record cannot be previewed")?;
    let speed = config.viewer.auto_rotate_speed;
    description.orbit.auto_rotate_speed = (speed > 0.0).then_some(speed);

    println!("=== Preview ===");
    print_summary(&description);

    let size = SurfaceSize::new(config.viewer.width, config.viewer.height);
    let mut viewport = Viewport::new(HeadlessBackend::new(size.width, size.height), size);
    viewport.mount(&description)?;

    let dt = config.viewer.frame_interval().as_secs_f32();
    for _ in 0..args.frames {
        viewport.tick(dt)?;
    }

    if let Some(backend) = viewport.backend() {
        let stats = backend.stats();
        println!(
            "  Rendered {} frames: {} draw calls, {} triangles",
            stats.frames, stats.draw_calls, stats.triangles
        );
    }
    viewport.unmount();

    if let Some(path) = &args.dump {
        let json = serde_json::to_string_pretty(&description)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  Scene written to {}", path.display());
    }

    Ok(())
}

/// Accept either `{ config, blueprint }` or a bare record.
fn load_record(path: &Path) -> Result<AttributeRecord> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if let Ok(result) = serde_json::from_str::<AnalysisResult>(&text) {
        return Ok(result.config);
    }
    serde_json::from_str::<AttributeRecord>(&text)
        .with_context(|| format!("{} is not an attribute record", path.display()))
}

fn print_summary(description: &SceneDescription) {
    println!("  Label:  {}", description.label);
    println!(
        "  Nodes:  {} (spikes: {})",
        description.figure.len(),
        description.count(NodeRole::Spike)
    );
    if let Some(rim) = description.rim_light() {
        println!("  Rim:    {}", rim.color);
    }
}
