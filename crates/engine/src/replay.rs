//! Replay driver.
//!
//! Feeds an ordered event log through the classifier into the whiteboard
//! state machine and the timeline builder. A frame boundary is taken after
//! the triggering event is fully applied, so the captured snapshot already
//! reflects it.

use std::sync::Arc;

use slidecast_common::error::{SlidecastError, SlidecastResult};
use slidecast_model::event::{RawEvent, TimestampMs};
use slidecast_model::shape::WhiteboardId;

use crate::classifier::{classify, Classified, EventKind, SessionEvent};
use crate::issues::{Diagnostics, ReplayIssue};
use crate::slides::{SlideLibrary, SlideLookupError, SlideSource};
use crate::timeline::{SessionTimeline, TimelineBuilder};
use crate::whiteboard::WhiteboardState;

/// Result of a full session replay.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub timeline: SessionTimeline,
    pub whiteboards: WhiteboardState,
    pub issues: Vec<ReplayIssue>,
    /// Number of raw events consumed.
    pub events: usize,
}

/// Incremental session replay over one log.
pub struct SessionReplay<S> {
    slides: SlideLibrary<S>,
    whiteboards: WhiteboardState,
    timeline: TimelineBuilder,
    diagnostics: Diagnostics,
    current: Option<WhiteboardId>,
    events: usize,
}

impl<S: SlideSource> SessionReplay<S> {
    pub fn new(source: S) -> Self {
        Self {
            slides: SlideLibrary::new(source),
            whiteboards: WhiteboardState::new(),
            timeline: TimelineBuilder::new(),
            diagnostics: Diagnostics::new(),
            current: None,
            events: 0,
        }
    }

    /// The slide currently on screen.
    pub fn current_slide(&self) -> Option<&WhiteboardId> {
        self.current.as_ref()
    }

    pub fn whiteboards(&self) -> &WhiteboardState {
        &self.whiteboards
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Apply one event.
    ///
    /// Only a missing session start is an error here; every other problem is
    /// reported to the diagnostics and the event is treated as a no-op.
    pub fn apply(&mut self, event: &RawEvent) -> SlidecastResult<()> {
        self.events += 1;
        let ts = event.timestamp_ms;
        self.timeline.observe(ts);

        let decoded = match classify(event) {
            Ok(Classified::State(decoded)) => decoded,
            Ok(Classified::Skip(kind)) => {
                tracing::trace!(kind = kind.tag(), timestamp_ms = ts, "Skipping event");
                return Ok(());
            }
            Err(err) => {
                self.diagnostics.report(err);
                return Ok(());
            }
        };

        match decoded {
            SessionEvent::SessionStart => {
                self.timeline.start_session(ts, &mut self.diagnostics);
            }
            SessionEvent::SessionEnd => {
                self.timeline.end_session(ts)?;
            }
            SessionEvent::ParticipantJoin { user_id, name } => {
                tracing::debug!(%user_id, %name, "Participant joined");
                self.timeline.join(user_id, name);
            }
            SessionEvent::RecordingStart { filename } => {
                self.timeline
                    .start_audio(ts, &filename, &mut self.diagnostics)?;
            }
            SessionEvent::ScreenShareStart { filename } => {
                self.timeline
                    .start_screenshare(ts, &filename, &mut self.diagnostics)?;
            }
            SessionEvent::ScreenShareStop { filename } => {
                self.timeline
                    .stop_screenshare(ts, &filename, &mut self.diagnostics)?;
            }
            SessionEvent::WebcamStart { filename } => {
                self.timeline
                    .start_webcam(ts, &filename, &mut self.diagnostics)?;
            }
            SessionEvent::WebcamStop { filename } => {
                self.timeline
                    .stop_webcam(ts, &filename, &mut self.diagnostics)?;
            }
            SessionEvent::PresentationSwitch { presentation } => {
                tracing::info!(%presentation, "Presentation shared");
                self.current = Some(WhiteboardId::new(presentation, 1));
                self.frame_boundary(ts, EventKind::SharePresentation)?;
            }
            SessionEvent::SlideChange {
                presentation,
                slide,
            } => {
                self.current = Some(WhiteboardId::new(presentation, slide));
                self.frame_boundary(ts, EventKind::GotoSlide)?;
            }
            SessionEvent::AddShape {
                whiteboard,
                shape_id,
                draw_end,
                record,
            } => {
                let outcome =
                    self.whiteboards
                        .apply_add_shape(&whiteboard, &shape_id, record, draw_end);
                if outcome.is_applied() {
                    self.frame_boundary(ts, EventKind::AddShape)?;
                }
            }
            SessionEvent::Undo {
                whiteboard,
                shape_id,
            } => match self.whiteboards.apply_undo(&whiteboard, &shape_id) {
                Ok(_) => self.frame_boundary(ts, EventKind::UndoAnnotation)?,
                Err(unknown) => self.diagnostics.report(ReplayIssue::UnknownShapeReference {
                    whiteboard: unknown.whiteboard,
                    shape_id: unknown.shape_id,
                    timestamp_ms: ts,
                }),
            },
        }
        Ok(())
    }

    fn frame_boundary(&mut self, ts: TimestampMs, trigger: EventKind) -> SlidecastResult<()> {
        if !self.timeline.clock().is_started() {
            return Err(SlidecastError::MissingSessionStart {
                timestamp_ms: Some(ts),
            });
        }

        let Some(whiteboard) = self.current.clone() else {
            self.diagnostics.report(ReplayIssue::NoActiveSlide {
                event: trigger.tag(),
                timestamp_ms: ts,
            });
            return Ok(());
        };

        match self.slides.slide(&whiteboard) {
            Ok(base) => {
                let shapes = self.whiteboards.snapshot(&whiteboard);
                self.timeline.open_frame(
                    ts,
                    whiteboard,
                    Arc::clone(&base),
                    shapes,
                    &mut self.diagnostics,
                )?;
            }
            Err(SlideLookupError::Unavailable { message }) => {
                self.diagnostics.report(ReplayIssue::PresentationUnavailable {
                    presentation: whiteboard.presentation().to_string(),
                    message,
                });
            }
            Err(SlideLookupError::OutOfRange { available }) => {
                self.diagnostics.report(ReplayIssue::SlideOutOfRange {
                    whiteboard,
                    available,
                    timestamp_ms: ts,
                });
            }
        }
        Ok(())
    }

    /// Close the session and collect the results.
    pub fn finish(self) -> SlidecastResult<ReplayOutcome> {
        let mut diagnostics = self.diagnostics;
        let timeline = self.timeline.finish(&mut diagnostics)?;
        tracing::info!(
            events = self.events,
            frames = timeline.frames.len(),
            segments = timeline.segment_count(),
            issues = diagnostics.len(),
            "Replay complete"
        );
        Ok(ReplayOutcome {
            timeline,
            whiteboards: self.whiteboards,
            issues: diagnostics.into_issues(),
            events: self.events,
        })
    }
}

/// Replay a whole log against a slide source.
pub fn replay_session<S: SlideSource>(
    events: &[RawEvent],
    source: S,
) -> SlidecastResult<ReplayOutcome> {
    let mut replay = SessionReplay::new(source);
    for event in events {
        replay.apply(event)?;
    }
    replay.finish()
}

/// Final whiteboard state of a log, without any timeline.
#[derive(Debug, Clone, Default)]
pub struct AnnotationReplay {
    pub whiteboards: WhiteboardState,
    pub issues: Vec<ReplayIssue>,
}

/// Apply only add-shape and undo events. Needs no session start.
pub fn replay_annotations(events: &[RawEvent]) -> AnnotationReplay {
    let mut whiteboards = WhiteboardState::new();
    let mut diagnostics = Diagnostics::new();

    for event in events {
        match classify(event) {
            Ok(Classified::State(SessionEvent::AddShape {
                whiteboard,
                shape_id,
                draw_end,
                record,
            })) => {
                whiteboards.apply_add_shape(&whiteboard, &shape_id, record, draw_end);
            }
            Ok(Classified::State(SessionEvent::Undo {
                whiteboard,
                shape_id,
            })) => {
                if let Err(unknown) = whiteboards.apply_undo(&whiteboard, &shape_id) {
                    diagnostics.report(ReplayIssue::UnknownShapeReference {
                        whiteboard: unknown.whiteboard,
                        shape_id: unknown.shape_id,
                        timestamp_ms: event.timestamp_ms,
                    });
                }
            }
            Ok(_) => {}
            Err(err) => diagnostics.report(err),
        }
    }

    AnnotationReplay {
        whiteboards,
        issues: diagnostics.into_issues(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::InMemorySlides;
    use slidecast_model::canvas::{BaseDocument, Canvas};
    use slidecast_model::segment::SegmentKind;

    const T0: u64 = 1_600_000_000_000;

    fn slides() -> InMemorySlides {
        InMemorySlides::new().with_deck(
            "deckA",
            vec![
                BaseDocument::new(r#"<svg width="100" height="100"></svg>"#, Canvas::HD),
                BaseDocument::new(r#"<svg width="100" height="100"></svg>"#, Canvas::HD),
            ],
        )
    }

    fn at(kind: &str, secs: u64) -> RawEvent {
        RawEvent::new(kind, T0 + secs * 1000)
    }

    fn add(secs: u64, id: &str, status: &str) -> RawEvent {
        at("AddShapeEvent", secs)
            .with_field("whiteboardId", "deckA/1")
            .with_field("shapeId", id)
            .with_field("status", status)
            .with_field("type", "pencil")
            .with_field("color", "0")
            .with_field("thickness", "1")
            .with_field("dataPoints", "0,0,50,50")
            .with_field("commands", "1,2")
    }

    #[test]
    fn test_slide_change_opens_frame() {
        let events = vec![
            at("CreatePresentationPodEvent", 0),
            at("SharePresentationEvent", 0).with_field("presentationName", "deckA"),
            at("GotoSlideEvent", 3)
                .with_field("presentationName", "deckA")
                .with_field("slide", "1"),
            at("EndAndKickAllEvent", 10),
        ];
        let outcome = replay_session(&events, slides()).unwrap();
        let frames = &outcome.timeline.snapshots;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].whiteboard, WhiteboardId::new("deckA", 2));
        assert_eq!(outcome.timeline.frames[0].length_ms, 3_000);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_slide_change_after_end_stays_inside_session() {
        let events = vec![
            at("CreatePresentationPodEvent", 0),
            at("SharePresentationEvent", 0).with_field("presentationName", "deckA"),
            at("EndAndKickAllEvent", 10),
            at("GotoSlideEvent", 12)
                .with_field("presentationName", "deckA")
                .with_field("slide", "1"),
        ];
        let outcome = replay_session(&events, slides()).unwrap();
        assert_eq!(outcome.timeline.length_ms, 10_000);
        assert_eq!(outcome.timeline.snapshots.len(), 1);
        assert_eq!(outcome.timeline.frames.len(), 1);
        assert_eq!(outcome.timeline.frames[0].length_ms, 10_000);
        assert!(matches!(
            outcome.issues[0],
            ReplayIssue::AfterSessionEnd {
                kind: SegmentKind::Frame,
                end_ms: 10_000,
                ..
            }
        ));
    }

    #[test]
    fn test_frame_before_session_start_is_fatal() {
        let mut replay = SessionReplay::new(slides());
        let err = replay
            .apply(&at("SharePresentationEvent", 0).with_field("presentationName", "deckA"))
            .unwrap_err();
        assert!(matches!(err, SlidecastError::MissingSessionStart { .. }));
    }

    #[test]
    fn test_add_without_slide_is_reported() {
        let mut replay = SessionReplay::new(slides());
        replay.apply(&at("CreatePresentationPodEvent", 0)).unwrap();
        replay.apply(&add(1, "s1", "DRAW_END")).unwrap();
        assert_eq!(replay.current_slide(), None);
        assert!(matches!(
            replay.diagnostics().issues()[0],
            ReplayIssue::NoActiveSlide {
                event: "AddShapeEvent",
                ..
            }
        ));
        assert_eq!(replay.whiteboards().shape_count(&WhiteboardId::new("deckA", 1)), 1);
    }

    #[test]
    fn test_unknown_presentation_skips_frames() {
        let events = vec![
            at("CreatePresentationPodEvent", 0),
            at("SharePresentationEvent", 1).with_field("presentationName", "ghost"),
            at("EndAndKickAllEvent", 2),
        ];
        let outcome = replay_session(&events, slides()).unwrap();
        assert!(outcome.timeline.frames.is_empty());
        assert!(matches!(
            outcome.issues[0],
            ReplayIssue::PresentationUnavailable { .. }
        ));
    }

    #[test]
    fn test_unrecognized_event_is_reported_and_ignored() {
        let events = vec![
            at("CreatePresentationPodEvent", 0),
            at("PollStartedRecordEvent", 1),
            at("EndAndKickAllEvent", 2),
        ];
        let outcome = replay_session(&events, slides()).unwrap();
        assert_eq!(outcome.events, 3);
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn test_replay_annotations_without_clock() {
        let events = vec![
            add(1, "s1", "DRAW_END"),
            add(2, "s2", "DRAW_START"),
            add(3, "s3", "DRAW_END"),
            at("UndoAnnotationEvent", 4)
                .with_field("whiteboardId", "deckA/1")
                .with_field("shapeId", "s3"),
            at("UndoAnnotationEvent", 5)
                .with_field("whiteboardId", "deckA/1")
                .with_field("shapeId", "s3"),
        ];
        let replay = replay_annotations(&events);
        let board = WhiteboardId::new("deckA", 1);
        assert_eq!(replay.whiteboards.shape_count(&board), 1);
        assert!(replay.whiteboards.contains(&board, "s1"));
        assert_eq!(replay.issues.len(), 1);
    }
}
