//! Export a Kdenlive timeline.

use std::path::PathBuf;

use slidecast_common::config::AppConfig;
use slidecast_export::raster::{Rasterizer, RsvgConvert};
use slidecast_export::timeline_export::{export_timeline, TimelineJob};

use super::{fallback_canvas, print_issues};

pub fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    frame_height: Option<u32>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    println!("Exporting timeline from: {}", path.display());

    let output_path = output.unwrap_or_else(|| TimelineJob::default_output(&path));
    let frame_height = frame_height.unwrap_or(config.rendering.frame_height);
    if frame_height == 0 {
        anyhow::bail!("--frame-height must be greater than zero");
    }

    let rasterizer = RsvgConvert::new(config.rendering.rasterizer.as_str());
    if !rasterizer.is_available() {
        anyhow::bail!(
            "{} is not installed or not in PATH (run `slidecast check`)",
            rasterizer.name()
        );
    }

    let profile = &config.timeline;
    println!("  Output: {}", output_path.display());
    println!(
        "  Profile: {} ({}x{} @ {}fps)",
        profile.profile_name, profile.width, profile.height, profile.fps
    );
    println!("  Frame height: {frame_height}px");

    let job = TimelineJob {
        recording: path,
        output_path,
        frame_height,
        fallback: fallback_canvas(config),
        profile: profile.clone(),
        parallel: config.rendering.parallel,
    };
    let report = export_timeline(&job, &rasterizer)
        .map_err(|e| anyhow::anyhow!("Timeline export failed: {e}"))?;

    println!();
    println!(
        "  [OK] {} frames ({} rasterized)",
        report.frames, report.rasterized
    );
    println!("  [OK] Document: {}", report.document.display());
    println!("  [OK] Summary: {}", report.summary.display());
    print_issues(&report.issues);

    Ok(())
}
