//! Non-fatal conditions found during a replay.
//!
//! Nothing here aborts a run. Every issue is logged when it is recorded and
//! kept so callers can summarise or fail on it afterwards.

use slidecast_model::event::TimestampMs;
use slidecast_model::segment::SegmentKind;
use slidecast_model::shape::WhiteboardId;

use crate::classifier::ClassifyError;
use crate::geometry::GeometryError;

/// One recoverable condition, with enough context to find the source event.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplayIssue {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("Undo of unknown shape {shape_id} on {whiteboard} at {timestamp_ms}")]
    UnknownShapeReference {
        whiteboard: WhiteboardId,
        shape_id: String,
        timestamp_ms: TimestampMs,
    },

    #[error("Webcam stream {filename} at {timestamp_ms} belongs to unjoined user {user_id}")]
    UnknownParticipant {
        user_id: String,
        filename: String,
        timestamp_ms: TimestampMs,
    },

    #[error("Shape {shape_id} on {whiteboard} could not be drawn: {source}")]
    DataIntegrityFault {
        whiteboard: WhiteboardId,
        shape_id: String,
        frame: Option<usize>,
        source: GeometryError,
    },

    #[error("Rendering {artifact} failed: {message}")]
    RenderFailed { artifact: String, message: String },

    #[error("Stop for {kind:?} stream {key:?} at {timestamp_ms} has no matching start")]
    UnmatchedStop {
        kind: SegmentKind,
        key: String,
        timestamp_ms: TimestampMs,
    },

    #[error("{event} at {timestamp_ms} needs a frame but no slide is shown")]
    NoActiveSlide {
        event: &'static str,
        timestamp_ms: TimestampMs,
    },

    #[error("Presentation {presentation} could not be loaded: {message}")]
    PresentationUnavailable {
        presentation: String,
        message: String,
    },

    #[error("Slide {whiteboard} at {timestamp_ms} is outside its presentation ({available} slides)")]
    SlideOutOfRange {
        whiteboard: WhiteboardId,
        available: usize,
        timestamp_ms: TimestampMs,
    },

    #[error("Repeated session start at {timestamp_ms} ignored")]
    DuplicateSessionStart { timestamp_ms: TimestampMs },

    #[error("{kind:?} segment at {timestamp_ms} opens after the session end (+{end_ms} ms); skipped")]
    AfterSessionEnd {
        kind: SegmentKind,
        timestamp_ms: TimestampMs,
        end_ms: u64,
    },

    #[error("Log has no session end; closing at last event (+{end_ms} ms)")]
    MissingSessionEnd { end_ms: u64 },

    #[error("Slide {whiteboard} has no closing </svg> tag")]
    MalformedBaseDocument { whiteboard: WhiteboardId },
}

/// Collected issues of one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    issues: Vec<ReplayIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log an issue.
    pub fn report(&mut self, issue: impl Into<ReplayIssue>) {
        let issue = issue.into();
        tracing::warn!(issue = %issue, "Replay issue");
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ReplayIssue>) {
        for issue in issues {
            self.report(issue);
        }
    }

    pub fn issues(&self) -> &[ReplayIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<ReplayIssue> {
        self.issues
    }
}
