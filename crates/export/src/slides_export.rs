//! Static slide export.
//!
//! Every slide of every presentation is written with the annotations left on
//! it at the end of the session, rasterized to a PDF page, and the pages of
//! each presentation are joined into one document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_engine::compose::compose;
use slidecast_engine::issues::{Diagnostics, ReplayIssue};
use slidecast_engine::replay::replay_annotations;
use slidecast_engine::slides::SlideSource;
use slidecast_model::canvas::{BaseDocument, Canvas};
use slidecast_model::event::read_event_log;
use slidecast_model::shape::{ShapeRecord, WhiteboardId};

use crate::presentation::DirectorySlideSource;
use crate::raster::{DocumentJoiner, RasterTarget, Rasterizer};

/// A static slide export ready to run.
#[derive(Debug, Clone)]
pub struct SlidesJob {
    /// Raw recording directory holding `events.xml` and `presentation/`.
    pub recording: PathBuf,

    /// Directory receiving `<pres>/slide<N>.svg` and `<pres>.pdf`.
    pub output_dir: PathBuf,

    /// Canvas for slides that declare no size.
    pub fallback: Canvas,

    /// Rasterize slides in parallel.
    pub parallel: bool,
}

/// Per-presentation outcome.
#[derive(Debug, Clone)]
pub struct PresentationExport {
    pub presentation: String,
    pub slides: Vec<PathBuf>,
    /// `None` when no page could be rasterized or joining failed.
    pub document: Option<PathBuf>,
}

/// Result of a static slide export.
#[derive(Debug, Clone)]
pub struct SlidesReport {
    pub presentations: Vec<PresentationExport>,
    pub issues: Vec<ReplayIssue>,
}

/// Run a static slide export.
pub fn export_slides(
    job: &SlidesJob,
    rasterizer: &dyn Rasterizer,
    joiner: &dyn DocumentJoiner,
) -> SlidecastResult<SlidesReport> {
    tracing::info!(
        recording = %job.recording.display(),
        output = %job.output_dir.display(),
        "Starting slide export"
    );

    let events = read_event_log(job.recording.join("events.xml"))
        .map_err(|e| SlidecastError::event_log(e.to_string()))?;
    let annotations = replay_annotations(&events);

    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(annotations.issues);

    let source = DirectorySlideSource::new(&job.recording, job.fallback);
    let mut presentations = Vec::new();
    for presentation in source.list_presentations()? {
        let slides = match source.load(&presentation) {
            Ok(slides) => slides,
            Err(e) => {
                diagnostics.report(ReplayIssue::PresentationUnavailable {
                    presentation: presentation.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let out_dir = job.output_dir.join(&presentation);
        std::fs::create_dir_all(&out_dir)?;

        let mut written = Vec::with_capacity(slides.len());
        for (i, base) in slides.iter().enumerate() {
            let whiteboard = WhiteboardId::new(presentation.as_str(), i as u32 + 1);
            let shapes = annotations.whiteboards.snapshot(&whiteboard);
            let path = out_dir.join(format!("slide{}.svg", whiteboard.slide()));
            write_slide(base, &shapes, &whiteboard, &path, &mut diagnostics)?;
            written.push(path);
        }

        let pages = rasterize_pages(&written, rasterizer, job.parallel, &mut diagnostics);
        let document = join_pages(
            &pages,
            &job.output_dir.join(format!("{presentation}.pdf")),
            joiner,
            &mut diagnostics,
        )?;

        tracing::info!(
            %presentation,
            slides = written.len(),
            pages = pages.len(),
            "Presentation exported"
        );
        presentations.push(PresentationExport {
            presentation,
            slides: written,
            document,
        });
    }

    if presentations.is_empty() {
        tracing::warn!(recording = %job.recording.display(), "No presentations found");
    }

    Ok(SlidesReport {
        presentations,
        issues: diagnostics.into_issues(),
    })
}

fn write_slide(
    base: &BaseDocument,
    shapes: &[Arc<ShapeRecord>],
    whiteboard: &WhiteboardId,
    path: &Path,
    diagnostics: &mut Diagnostics,
) -> SlidecastResult<()> {
    let composition = compose(base, shapes);
    for fault in composition.faults {
        diagnostics.report(ReplayIssue::DataIntegrityFault {
            whiteboard: whiteboard.clone(),
            shape_id: fault.shape_id.unwrap_or_else(|| "<unnamed>".to_string()),
            frame: None,
            source: fault.error,
        });
    }
    if !composition.closed {
        diagnostics.report(ReplayIssue::MalformedBaseDocument {
            whiteboard: whiteboard.clone(),
        });
    }
    std::fs::write(path, composition.svg)?;
    Ok(())
}

/// Rasterize each SVG to a sibling PDF. Returns the pages that succeeded, in
/// input order.
fn rasterize_pages(
    svgs: &[PathBuf],
    rasterizer: &dyn Rasterizer,
    parallel: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<PathBuf> {
    let convert = |svg: &PathBuf| {
        let pdf = svg.with_extension("pdf");
        rasterizer
            .rasterize(svg, &pdf, RasterTarget::Pdf)
            .map(|()| pdf)
            .map_err(|e| ReplayIssue::RenderFailed {
                artifact: svg.display().to_string(),
                message: e.to_string(),
            })
    };
    let results: Vec<_> = if parallel {
        svgs.par_iter().map(convert).collect()
    } else {
        svgs.iter().map(convert).collect()
    };

    let mut pages = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(page) => pages.push(page),
            Err(issue) => diagnostics.report(issue),
        }
    }
    pages
}

fn join_pages(
    pages: &[PathBuf],
    output: &Path,
    joiner: &dyn DocumentJoiner,
    diagnostics: &mut Diagnostics,
) -> SlidecastResult<Option<PathBuf>> {
    if output.exists() {
        std::fs::remove_file(output)?;
    }
    if pages.is_empty() {
        return Ok(None);
    }
    match joiner.join(pages, output) {
        Ok(()) => Ok(Some(output.to_path_buf())),
        Err(e) => {
            diagnostics.report(ReplayIssue::RenderFailed {
                artifact: output.display().to_string(),
                message: e.to_string(),
            });
            Ok(None)
        }
    }
}
