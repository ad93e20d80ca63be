//! Session timeline construction.
//!
//! Segment lengths are only known once the next event of the same kind (or
//! the session end) arrives. Each track therefore keeps its in-progress
//! segments open in a registry and closes them on the next transition:
//!
//! ```text
//! audio start @0s ─┐
//! audio start @30s ┴─ closes [0s, 30s), opens @30s ─┐
//! session end @45s ──────────────────────────────────┴─ closes [30s, 45s)
//! ```
//!
//! Frame and audio tracks have a single lane. Webcam and screen-share
//! tracks have one lane per stream file name.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use slidecast_common::clock::SessionClock;
use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_model::canvas::BaseDocument;
use slidecast_model::event::TimestampMs;
use slidecast_model::segment::{MediaSegment, SegmentKind};
use slidecast_model::shape::{ShapeRecord, WhiteboardId};

use crate::issues::{Diagnostics, ReplayIssue};

/// Lane key of single-lane tracks.
pub const SINGLE_LANE: &str = "";

/// Presenter label used when a webcam's owner never joined.
pub const UNKNOWN_PARTICIPANT: &str = "unknown";

#[derive(Debug, Clone)]
struct OpenSegment {
    resource: String,
    label: Option<String>,
    start_ms: u64,
}

/// Open and closed segments of one track.
#[derive(Debug, Clone)]
pub struct SegmentRegistry {
    kind: SegmentKind,
    open: BTreeMap<String, OpenSegment>,
    closed: Vec<MediaSegment>,
}

impl SegmentRegistry {
    pub fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            open: BTreeMap::new(),
            closed: Vec::new(),
        }
    }

    /// Open a segment on `key`, closing any segment already open there.
    /// Returns the segment that was closed.
    pub fn open(
        &mut self,
        key: &str,
        resource: impl Into<String>,
        label: Option<String>,
        at_ms: u64,
    ) -> Option<&MediaSegment> {
        let replaced = self.close(key, at_ms).is_some();
        self.open.insert(
            key.to_string(),
            OpenSegment {
                resource: resource.into(),
                label,
                start_ms: at_ms,
            },
        );
        if replaced {
            self.closed.last()
        } else {
            None
        }
    }

    /// Close the segment open on `key`, if any.
    pub fn close(&mut self, key: &str, at_ms: u64) -> Option<&MediaSegment> {
        let open = self.open.remove(key)?;
        self.closed.push(MediaSegment {
            kind: self.kind,
            key: key.to_string(),
            resource: open.resource,
            label: open.label,
            start_ms: open.start_ms,
            length_ms: at_ms.saturating_sub(open.start_ms),
        });
        self.closed.last()
    }

    /// Close every open lane.
    pub fn close_all(&mut self, at_ms: u64) {
        let keys: Vec<String> = self.open.keys().cloned().collect();
        for key in keys {
            self.close(&key, at_ms);
        }
    }

    /// Closed segments ordered by start time.
    pub fn finish(mut self) -> Vec<MediaSegment> {
        self.closed.sort_by_key(|s| s.start_ms);
        self.closed
    }
}

/// Visual state captured at one frame boundary.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Frame number; also the frame segment's position in the track.
    pub index: usize,
    /// Offset from session start.
    pub at_ms: u64,
    pub whiteboard: WhiteboardId,
    pub base: Arc<BaseDocument>,
    /// Active shapes in stacking order.
    pub shapes: Vec<Arc<ShapeRecord>>,
}

/// Finished timeline of one session.
#[derive(Debug, Clone)]
pub struct SessionTimeline {
    /// Absolute session start (wall clock, ms).
    pub started_at_ms: u64,
    pub length_ms: u64,
    pub frames: Vec<MediaSegment>,
    pub audio: Vec<MediaSegment>,
    pub webcams: Vec<MediaSegment>,
    pub screenshares: Vec<MediaSegment>,
    pub snapshots: Vec<FrameSnapshot>,
}

/// All segments of one stream, in start order.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane<'a> {
    pub key: &'a str,
    pub segments: Vec<&'a MediaSegment>,
}

impl SessionTimeline {
    pub fn segments(&self, kind: SegmentKind) -> &[MediaSegment] {
        match kind {
            SegmentKind::Frame => &self.frames,
            SegmentKind::Audio => &self.audio,
            SegmentKind::Webcam => &self.webcams,
            SegmentKind::Screenshare => &self.screenshares,
        }
    }

    /// Segments of `kind` grouped per stream, streams ordered by first start.
    pub fn lanes(&self, kind: SegmentKind) -> Vec<Lane<'_>> {
        let mut lanes: Vec<Lane<'_>> = Vec::new();
        for segment in self.segments(kind) {
            match lanes.iter_mut().find(|lane| lane.key == segment.key) {
                Some(lane) => lane.segments.push(segment),
                None => lanes.push(Lane {
                    key: &segment.key,
                    segments: vec![segment],
                }),
            }
        }
        lanes
    }

    pub fn segment_count(&self) -> usize {
        SegmentKind::ALL
            .iter()
            .map(|kind| self.segments(*kind).len())
            .sum()
    }
}

/// Builds the session timeline from classified events.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    clock: SessionClock,
    frames: SegmentRegistry,
    audio: SegmentRegistry,
    webcams: SegmentRegistry,
    screenshares: SegmentRegistry,
    participants: HashMap<String, String>,
    snapshots: Vec<FrameSnapshot>,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self {
            clock: SessionClock::new(),
            frames: SegmentRegistry::new(SegmentKind::Frame),
            audio: SegmentRegistry::new(SegmentKind::Audio),
            webcams: SegmentRegistry::new(SegmentKind::Webcam),
            screenshares: SegmentRegistry::new(SegmentKind::Screenshare),
            participants: HashMap::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Anchor the session. Later starts are reported and ignored.
    pub fn start_session(&mut self, timestamp_ms: TimestampMs, diagnostics: &mut Diagnostics) {
        if self.clock.start(timestamp_ms) {
            tracing::info!(timestamp_ms, "Session started");
        } else {
            diagnostics.report(ReplayIssue::DuplicateSessionStart { timestamp_ms });
        }
    }

    /// Record the session end and close everything still open.
    pub fn end_session(&mut self, timestamp_ms: TimestampMs) -> SlidecastResult<u64> {
        let end = self.clock.end(timestamp_ms)?;
        self.close_all(end);
        tracing::info!(length_ms = end, "Session ended");
        Ok(end)
    }

    /// Note an event timestamp for the end-of-log fallback.
    pub fn observe(&mut self, timestamp_ms: TimestampMs) {
        self.clock.observe(timestamp_ms);
    }

    pub fn join(&mut self, user_id: impl Into<String>, name: impl Into<String>) {
        self.participants.insert(user_id.into(), name.into());
    }

    pub fn participant(&self, user_id: &str) -> Option<&str> {
        self.participants.get(user_id).map(String::as_str)
    }

    /// Offset for a segment opening at `timestamp_ms`, or `None` (reported)
    /// once the session has already ended.
    fn opening_offset(
        &mut self,
        kind: SegmentKind,
        timestamp_ms: TimestampMs,
        diagnostics: &mut Diagnostics,
    ) -> SlidecastResult<Option<u64>> {
        let at = self.clock.relative(timestamp_ms)?;
        match self.clock.end_offset_ms() {
            Some(end_ms) if at > end_ms => {
                diagnostics.report(ReplayIssue::AfterSessionEnd {
                    kind,
                    timestamp_ms,
                    end_ms,
                });
                Ok(None)
            }
            _ => Ok(Some(at)),
        }
    }

    pub fn start_audio(
        &mut self,
        timestamp_ms: TimestampMs,
        filename: &str,
        diagnostics: &mut Diagnostics,
    ) -> SlidecastResult<()> {
        let Some(at) = self.opening_offset(SegmentKind::Audio, timestamp_ms, diagnostics)? else {
            return Ok(());
        };
        let resource = format!("audio/{}", file_name(filename));
        tracing::debug!(at_ms = at, %resource, "Audio segment opened");
        self.audio.open(SINGLE_LANE, resource, None, at);
        Ok(())
    }

    pub fn start_screenshare(
        &mut self,
        timestamp_ms: TimestampMs,
        filename: &str,
        diagnostics: &mut Diagnostics,
    ) -> SlidecastResult<()> {
        let Some(at) = self.opening_offset(SegmentKind::Screenshare, timestamp_ms, diagnostics)?
        else {
            return Ok(());
        };
        let key = file_name(filename);
        self.screenshares
            .open(key, format!("deskshare/{key}"), None, at);
        Ok(())
    }

    pub fn stop_screenshare(
        &mut self,
        timestamp_ms: TimestampMs,
        filename: &str,
        diagnostics: &mut Diagnostics,
    ) -> SlidecastResult<()> {
        let at = self.clock.relative(timestamp_ms)?;
        let key = file_name(filename);
        if self.screenshares.close(key, at).is_none() {
            diagnostics.report(ReplayIssue::UnmatchedStop {
                kind: SegmentKind::Screenshare,
                key: key.to_string(),
                timestamp_ms,
            });
        }
        Ok(())
    }

    /// Open a webcam lane labelled with its presenter's name.
    pub fn start_webcam(
        &mut self,
        timestamp_ms: TimestampMs,
        filename: &str,
        diagnostics: &mut Diagnostics,
    ) -> SlidecastResult<()> {
        let Some(at) = self.opening_offset(SegmentKind::Webcam, timestamp_ms, diagnostics)? else {
            return Ok(());
        };
        let key = file_name(filename);
        let user_id = webcam_user_id(key);
        let label = match user_id.and_then(|id| self.participant(id)) {
            Some(name) => name.to_string(),
            None => {
                diagnostics.report(ReplayIssue::UnknownParticipant {
                    user_id: user_id.unwrap_or_default().to_string(),
                    filename: filename.to_string(),
                    timestamp_ms,
                });
                UNKNOWN_PARTICIPANT.to_string()
            }
        };
        tracing::debug!(at_ms = at, presenter = %label, "Webcam segment opened");
        self.webcams
            .open(key, webcam_resource(filename), Some(label), at);
        Ok(())
    }

    pub fn stop_webcam(
        &mut self,
        timestamp_ms: TimestampMs,
        filename: &str,
        diagnostics: &mut Diagnostics,
    ) -> SlidecastResult<()> {
        let at = self.clock.relative(timestamp_ms)?;
        let key = file_name(filename);
        if self.webcams.close(key, at).is_none() {
            diagnostics.report(ReplayIssue::UnmatchedStop {
                kind: SegmentKind::Webcam,
                key: key.to_string(),
                timestamp_ms,
            });
        }
        Ok(())
    }

    /// Close the current frame and open a new one showing `base` + `shapes`.
    /// Returns the new frame's index, or `None` after the session end.
    pub fn open_frame(
        &mut self,
        timestamp_ms: TimestampMs,
        whiteboard: WhiteboardId,
        base: Arc<BaseDocument>,
        shapes: Vec<Arc<ShapeRecord>>,
        diagnostics: &mut Diagnostics,
    ) -> SlidecastResult<Option<usize>> {
        let Some(at) = self.opening_offset(SegmentKind::Frame, timestamp_ms, diagnostics)? else {
            return Ok(None);
        };
        let index = self.snapshots.len();
        self.frames
            .open(SINGLE_LANE, format!("frames/{index}.png"), None, at);
        tracing::debug!(frame = index, at_ms = at, %whiteboard, shapes = shapes.len(), "Frame boundary");
        self.snapshots.push(FrameSnapshot {
            index,
            at_ms: at,
            whiteboard,
            base,
            shapes,
        });
        Ok(Some(index))
    }

    fn close_all(&mut self, at_ms: u64) {
        self.frames.close_all(at_ms);
        self.audio.close_all(at_ms);
        self.webcams.close_all(at_ms);
        self.screenshares.close_all(at_ms);
    }

    /// Close the session and return the finished timeline.
    ///
    /// Without a session end, the last observed event time is used.
    pub fn finish(mut self, diagnostics: &mut Diagnostics) -> SlidecastResult<SessionTimeline> {
        let started_at_ms = self
            .clock
            .start_ms()
            .ok_or(SlidecastError::MissingSessionStart { timestamp_ms: None })?;

        let length_ms = match self.clock.end_offset_ms() {
            Some(end) => end,
            None => {
                let end = self.clock.last_seen_offset_ms().unwrap_or(0);
                diagnostics.report(ReplayIssue::MissingSessionEnd { end_ms: end });
                end
            }
        };
        self.close_all(length_ms);

        Ok(SessionTimeline {
            started_at_ms,
            length_ms,
            frames: self.frames.finish(),
            audio: self.audio.finish(),
            webcams: self.webcams.finish(),
            screenshares: self.screenshares.finish(),
            snapshots: self.snapshots,
        })
    }
}

/// Last path component of a recorded stream path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// `video/<stream dir>/<file>` for a webcam recording path.
pub fn webcam_resource(path: &str) -> String {
    let mut parts = path.rsplit('/');
    let file = parts.next().unwrap_or(path);
    match parts.next() {
        Some(dir) if !dir.is_empty() => format!("video/{dir}/{file}"),
        _ => format!("video/{file}"),
    }
}

/// Owner of a webcam stream: second `-`-separated token of its file name.
pub fn webcam_user_id(file_name: &str) -> Option<&str> {
    file_name.split('-').nth(1).filter(|id| !id.is_empty())
}
