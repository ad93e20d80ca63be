//! Timeline export.
//!
//! Replays the whole session, renders every captured frame to
//! `<recording>/frames/<n>.png`, and writes the Kdenlive document plus a JSON
//! summary next to it. Media resources in the document are relative to the
//! recording directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use slidecast_common::clock::format_timecode;
use slidecast_common::config::TimelineProfile;
use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_engine::frames::{render_frames, RenderedFrame};
use slidecast_engine::issues::ReplayIssue;
use slidecast_engine::replay::replay_session;
use slidecast_engine::timeline::SessionTimeline;
use slidecast_model::canvas::Canvas;
use slidecast_model::event::read_event_log;
use slidecast_model::segment::{MediaSegment, SegmentKind};

use crate::kdenlive::assemble;
use crate::presentation::DirectorySlideSource;
use crate::raster::{RasterTarget, Rasterizer};

/// A timeline export ready to run.
#[derive(Debug, Clone)]
pub struct TimelineJob {
    /// Raw recording directory.
    pub recording: PathBuf,

    /// Kdenlive document to write.
    pub output_path: PathBuf,

    /// Pixel height of rendered frames.
    pub frame_height: u32,

    /// Canvas for slides that declare no size.
    pub fallback: Canvas,

    /// Editor profile.
    pub profile: TimelineProfile,

    /// Rasterize frames in parallel.
    pub parallel: bool,
}

impl TimelineJob {
    /// `<recording>/<recording-name>.kdenlive`.
    pub fn default_output(recording: &Path) -> PathBuf {
        recording.join(format!("{}.kdenlive", recording_name(recording)))
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.recording.join("frames")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_path.with_extension("timeline.json")
    }
}

/// Machine-readable digest written next to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub recording: String,
    pub started_at: Option<DateTime<Utc>>,
    pub length_ms: u64,
    /// `HH:MM:SS.mmm`.
    pub length: String,
    pub frames: usize,
    pub audio: usize,
    pub webcams: usize,
    pub screenshares: usize,
    pub segments: Vec<MediaSegment>,
    pub issue_count: usize,
    pub issues: Vec<String>,
}

impl TimelineSummary {
    pub fn new(recording: &str, timeline: &SessionTimeline, issues: &[ReplayIssue]) -> Self {
        let segments = SegmentKind::ALL
            .iter()
            .flat_map(|kind| timeline.segments(*kind).iter().cloned())
            .collect();
        Self {
            recording: recording.to_string(),
            started_at: i64::try_from(timeline.started_at_ms)
                .ok()
                .and_then(DateTime::from_timestamp_millis),
            length_ms: timeline.length_ms,
            length: format_timecode(timeline.length_ms),
            frames: timeline.frames.len(),
            audio: timeline.audio.len(),
            webcams: timeline.webcams.len(),
            screenshares: timeline.screenshares.len(),
            segments,
            issue_count: issues.len(),
            issues: issues.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Result of a timeline export.
#[derive(Debug, Clone)]
pub struct TimelineReport {
    pub document: PathBuf,
    pub summary: PathBuf,
    pub frames: usize,
    /// Frames whose PNG was produced.
    pub rasterized: usize,
    pub issues: Vec<ReplayIssue>,
}

/// Run a timeline export.
pub fn export_timeline(
    job: &TimelineJob,
    rasterizer: &dyn Rasterizer,
) -> SlidecastResult<TimelineReport> {
    tracing::info!(
        recording = %job.recording.display(),
        output = %job.output_path.display(),
        frame_height = job.frame_height,
        "Starting timeline export"
    );

    if !job.recording.is_dir() {
        return Err(SlidecastError::FileNotFound {
            path: job.recording.clone(),
        });
    }

    let events = read_event_log(job.recording.join("events.xml"))
        .map_err(|e| SlidecastError::event_log(e.to_string()))?;
    let source = DirectorySlideSource::new(&job.recording, job.fallback);
    let outcome = replay_session(&events, source)?;
    let mut issues = outcome.issues;

    let frames = render_frames(&outcome.timeline.snapshots, job.parallel);
    let frames_dir = job.frames_dir();
    std::fs::create_dir_all(&frames_dir)?;
    for frame in &frames {
        issues.extend(frame.issues());
        std::fs::write(frames_dir.join(format!("{}.svg", frame.index)), &frame.svg)?;
    }

    let failures = rasterize_frames(&frames, &frames_dir, job, rasterizer);
    let rasterized = frames.len() - failures.len();
    issues.extend(failures);

    let root = job.recording.display().to_string();
    let document = assemble(&outcome.timeline, &job.profile, &root);
    if let Some(parent) = job.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&job.output_path, document.to_xml())?;

    let summary = TimelineSummary::new(
        &recording_name(&job.recording),
        &outcome.timeline,
        &issues,
    );
    let summary_path = job.summary_path();
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

    tracing::info!(
        document = %job.output_path.display(),
        frames = frames.len(),
        rasterized,
        issues = issues.len(),
        "Timeline export complete"
    );

    Ok(TimelineReport {
        document: job.output_path.clone(),
        summary: summary_path,
        frames: frames.len(),
        rasterized,
        issues,
    })
}

fn rasterize_frames(
    frames: &[RenderedFrame],
    frames_dir: &Path,
    job: &TimelineJob,
    rasterizer: &dyn Rasterizer,
) -> Vec<ReplayIssue> {
    let target = RasterTarget::Png {
        height: job.frame_height,
    };
    let convert = |frame: &RenderedFrame| {
        let svg = frames_dir.join(format!("{}.svg", frame.index));
        let png = frames_dir.join(format!("{}.png", frame.index));
        rasterizer
            .rasterize(&svg, &png, target)
            .err()
            .map(|e| ReplayIssue::RenderFailed {
                artifact: png.display().to_string(),
                message: e.to_string(),
            })
    };
    if job.parallel {
        frames.par_iter().filter_map(convert).collect()
    } else {
        frames.iter().filter_map(convert).collect()
    }
}

fn recording_name(recording: &Path) -> String {
    recording
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_string())
}
