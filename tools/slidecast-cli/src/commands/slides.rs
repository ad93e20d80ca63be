//! Export annotated slides.

use std::path::PathBuf;

use slidecast_common::config::AppConfig;
use slidecast_export::raster::{DocumentJoiner, PdfJoin, Rasterizer, RsvgConvert};
use slidecast_export::slides_export::{export_slides, SlidesJob};

use super::{fallback_canvas, print_issues};

pub fn run(path: PathBuf, output: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    println!("Exporting slides from: {}", path.display());
    println!("  Output: {}", output.display());

    let rasterizer = RsvgConvert::new(config.rendering.rasterizer.as_str());
    let joiner = PdfJoin::new(config.rendering.pdf_joiner.as_str());
    for (name, available) in [
        (rasterizer.name(), rasterizer.is_available()),
        (joiner.name(), joiner.is_available()),
    ] {
        if !available {
            anyhow::bail!("{name} is not installed or not in PATH (run `slidecast check`)");
        }
    }

    let job = SlidesJob {
        recording: path,
        output_dir: output,
        fallback: fallback_canvas(config),
        parallel: config.rendering.parallel,
    };
    let report = export_slides(&job, &rasterizer, &joiner)
        .map_err(|e| anyhow::anyhow!("Slide export failed: {e}"))?;

    println!();
    for deck in &report.presentations {
        match &deck.document {
            Some(pdf) => println!(
                "  [OK] {} ({} slides) -> {}",
                deck.presentation,
                deck.slides.len(),
                pdf.display()
            ),
            None => println!(
                "  [WARN] {} ({} slides): no PDF produced",
                deck.presentation,
                deck.slides.len()
            ),
        }
    }
    if report.presentations.is_empty() {
        println!("  No presentations found.");
    }
    print_issues(&report.issues);

    Ok(())
}
