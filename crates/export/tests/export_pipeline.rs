use std::path::{Path, PathBuf};
use std::sync::Mutex;

use slidecast_common::config::TimelineProfile;
use slidecast_engine::issues::ReplayIssue;
use slidecast_export::raster::{DocumentJoiner, RasterTarget, Rasterizer, RenderError};
use slidecast_export::slides_export::{export_slides, SlidesJob};
use slidecast_export::timeline_export::{export_timeline, TimelineJob, TimelineSummary};
use slidecast_model::canvas::Canvas;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-recording")
}

/// Copy the fixture recording into a fresh scratch directory.
fn scratch_recording(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "slidecast-export-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&root);
    let recording = root.join("fixture-meeting");
    let svgs = recording.join("presentation").join("deck-a").join("svgs");
    std::fs::create_dir_all(&svgs).expect("scratch dir should be creatable");

    let source = fixture_dir();
    std::fs::copy(source.join("events.xml"), recording.join("events.xml"))
        .expect("fixture events should copy");
    for n in 1..=2 {
        let file = format!("slide{n}.svg");
        std::fs::copy(
            source.join("presentation").join("deck-a").join("svgs").join(&file),
            svgs.join(&file),
        )
        .expect("fixture slide should copy");
    }
    recording
}

/// Writes a marker file instead of rasterizing; fails for names it is told to.
#[derive(Default)]
struct FakeRasterizer {
    fail_on: Option<String>,
    calls: Mutex<Vec<(PathBuf, RasterTarget)>>,
}

impl Rasterizer for FakeRasterizer {
    fn rasterize(
        &self,
        input: &Path,
        output: &Path,
        target: RasterTarget,
    ) -> Result<(), RenderError> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_path_buf(), target));
        let name = input.file_name().unwrap().to_string_lossy();
        if self.fail_on.as_deref() == Some(name.as_ref()) {
            return Err(RenderError::Failed {
                program: "fake".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "broken".to_string(),
            });
        }
        std::fs::write(output, format!("{target:?}")).unwrap();
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[derive(Default)]
struct FakeJoiner {
    joined: Mutex<Vec<Vec<PathBuf>>>,
}

impl DocumentJoiner for FakeJoiner {
    fn join(&self, pages: &[PathBuf], output: &Path) -> Result<(), RenderError> {
        self.joined.lock().unwrap().push(pages.to_vec());
        std::fs::write(output, format!("{} pages", pages.len())).unwrap();
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "fake-join"
    }
}

fn slides_job(recording: &Path) -> SlidesJob {
    SlidesJob {
        recording: recording.to_path_buf(),
        output_dir: recording.join("out"),
        fallback: Canvas::HD,
        parallel: true,
    }
}

#[test]
fn slides_export_writes_final_annotations_and_joins_pages() {
    let recording = scratch_recording("slides");
    let job = slides_job(&recording);
    std::fs::create_dir_all(&job.output_dir).unwrap();
    std::fs::write(job.output_dir.join("deck-a.pdf"), "stale").unwrap();

    let rasterizer = FakeRasterizer::default();
    let joiner = FakeJoiner::default();
    let report = export_slides(&job, &rasterizer, &joiner).unwrap();

    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert_eq!(report.presentations.len(), 1);
    let deck = &report.presentations[0];
    assert_eq!(deck.presentation, "deck-a");
    assert_eq!(deck.slides.len(), 2);

    let slide1 = std::fs::read_to_string(job.output_dir.join("deck-a").join("slide1.svg")).unwrap();
    assert!(slide1.contains(r##"stroke="#ff0000""##));
    assert!(!slide1.contains("<rect x=\"320\""), "undone rectangle must be gone");
    let slide2 = std::fs::read_to_string(job.output_dir.join("deck-a").join("slide2.svg")).unwrap();
    assert!(slide2.contains(">Q &amp; A</text>"));

    let joined = joiner.joined.lock().unwrap();
    assert_eq!(joined.len(), 1);
    assert_eq!(
        joined[0],
        vec![
            job.output_dir.join("deck-a").join("slide1.pdf"),
            job.output_dir.join("deck-a").join("slide2.pdf"),
        ]
    );
    let pdf = std::fs::read_to_string(job.output_dir.join("deck-a.pdf")).unwrap();
    assert_eq!(pdf, "2 pages");
    assert!(rasterizer
        .calls
        .lock()
        .unwrap()
        .iter()
        .all(|(_, target)| *target == RasterTarget::Pdf));

    std::fs::remove_dir_all(recording.parent().unwrap()).ok();
}

#[test]
fn slides_export_reports_a_failed_page_and_keeps_going() {
    let recording = scratch_recording("slides-fail");
    let job = slides_job(&recording);
    let rasterizer = FakeRasterizer {
        fail_on: Some("slide2.svg".to_string()),
        ..Default::default()
    };
    let joiner = FakeJoiner::default();
    let report = export_slides(&job, &rasterizer, &joiner).unwrap();

    assert_eq!(report.issues.len(), 1);
    assert!(matches!(
        &report.issues[0],
        ReplayIssue::RenderFailed { artifact, .. } if artifact.ends_with("slide2.svg")
    ));
    assert_eq!(joiner.joined.lock().unwrap()[0].len(), 1);
    assert!(report.presentations[0].document.is_some());

    std::fs::remove_dir_all(recording.parent().unwrap()).ok();
}

#[test]
fn timeline_export_writes_frames_document_and_summary() {
    let recording = scratch_recording("timeline");
    let job = TimelineJob {
        output_path: TimelineJob::default_output(&recording),
        recording: recording.clone(),
        frame_height: 720,
        fallback: Canvas::HD,
        profile: TimelineProfile::default(),
        parallel: true,
    };
    let rasterizer = FakeRasterizer::default();
    let report = export_timeline(&job, &rasterizer).unwrap();

    assert!(report.issues.is_empty(), "{:?}", report.issues);
    assert_eq!(report.frames, 6);
    assert_eq!(report.rasterized, 6);
    for n in 0..6 {
        assert!(recording.join("frames").join(format!("{n}.svg")).exists());
        assert!(recording.join("frames").join(format!("{n}.png")).exists());
    }
    assert!(rasterizer
        .calls
        .lock()
        .unwrap()
        .iter()
        .all(|(_, target)| *target == RasterTarget::Png { height: 720 }));

    assert_eq!(
        report.document,
        recording.join("fixture-meeting.kdenlive")
    );
    let xml = std::fs::read_to_string(&report.document).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(r#"<producer id="frame5""#));
    assert!(xml.contains(r#"<playlist id="webcamplaylist0">"#));
    assert!(xml.trim_end().ends_with("</mlt>"));

    let summary: TimelineSummary =
        serde_json::from_str(&std::fs::read_to_string(&report.summary).unwrap()).unwrap();
    assert_eq!(summary.recording, "fixture-meeting");
    assert_eq!(summary.length, "00:00:30.000");
    assert_eq!(summary.frames, 6);
    assert_eq!(summary.webcams, 1);
    assert_eq!(summary.screenshares, 1);
    assert_eq!(summary.issue_count, 0);
    assert_eq!(
        summary.started_at.map(|t| t.to_rfc3339()),
        Some("2020-09-13T12:26:40+00:00".to_string())
    );

    std::fs::remove_dir_all(recording.parent().unwrap()).ok();
}

#[test]
fn timeline_export_requires_a_recording_directory() {
    let missing = std::env::temp_dir().join("slidecast-export-no-such-recording");
    let job = TimelineJob {
        output_path: TimelineJob::default_output(&missing),
        recording: missing,
        frame_height: 1080,
        fallback: Canvas::HD,
        profile: TimelineProfile::default(),
        parallel: false,
    };
    assert!(export_timeline(&job, &FakeRasterizer::default()).is_err());
}
