//! Event classification.
//!
//! Every raw tag maps to exactly one [`EventKind`]. Administrative kinds are
//! skipped; state kinds are decoded into a typed [`SessionEvent`] carrying
//! only the fields the replay needs. Tags outside the known set are an
//! error so they surface instead of silently vanishing from the output.

use slidecast_model::event::{RawEvent, TimestampMs};
use slidecast_model::shape::{ShapeRecord, WhiteboardId};

/// Add-shape status marking a finished stroke.
pub const DRAW_END: &str = "DRAW_END";

/// Every event tag the replay understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CreatePresentationPod,
    EndAndKickAll,
    ParticipantJoin,
    StartRecording,
    StartDesktopShare,
    StopDesktopShare,
    StartWebcamShare,
    StopWebcamShare,
    SharePresentation,
    GotoSlide,
    AddShape,
    UndoAnnotation,

    WhiteboardCursorMove,
    AssignPresenter,
    ConversionCompleted,
    ParticipantJoined,
    SetPresentationDownloadable,
    SetPresenterInPod,
    ResizeAndMoveSlide,
    ParticipantLeft,
    ParticipantMuted,
    DeskShareStartRtmp,
    DeskShareStopRtmp,
    ParticipantStatusChange,
    ParticipantTalking,
    PublicChat,
    RecordStatus,
}

const TAGS: &[(&str, EventKind)] = &[
    ("CreatePresentationPodEvent", EventKind::CreatePresentationPod),
    ("EndAndKickAllEvent", EventKind::EndAndKickAll),
    ("ParticipantJoinEvent", EventKind::ParticipantJoin),
    ("StartRecordingEvent", EventKind::StartRecording),
    ("StartWebRTCDesktopShareEvent", EventKind::StartDesktopShare),
    ("StopWebRTCDesktopShareEvent", EventKind::StopDesktopShare),
    ("StartWebRTCShareEvent", EventKind::StartWebcamShare),
    ("StopWebRTCShareEvent", EventKind::StopWebcamShare),
    ("SharePresentationEvent", EventKind::SharePresentation),
    ("GotoSlideEvent", EventKind::GotoSlide),
    ("AddShapeEvent", EventKind::AddShape),
    ("UndoAnnotationEvent", EventKind::UndoAnnotation),
    ("WhiteboardCursorMoveEvent", EventKind::WhiteboardCursorMove),
    ("AssignPresenterEvent", EventKind::AssignPresenter),
    ("ConversionCompletedEvent", EventKind::ConversionCompleted),
    ("ParticipantJoinedEvent", EventKind::ParticipantJoined),
    ("SetPresentationDownloadable", EventKind::SetPresentationDownloadable),
    ("SetPresenterInPodEvent", EventKind::SetPresenterInPod),
    ("ResizeAndMoveSlideEvent", EventKind::ResizeAndMoveSlide),
    ("ParticipantLeftEvent", EventKind::ParticipantLeft),
    ("ParticipantMutedEvent", EventKind::ParticipantMuted),
    ("DeskShareStartRTMP", EventKind::DeskShareStartRtmp),
    ("DeskShareStopRTMP", EventKind::DeskShareStopRtmp),
    ("ParticipantStatusChangeEvent", EventKind::ParticipantStatusChange),
    ("ParticipantTalkingEvent", EventKind::ParticipantTalking),
    ("PublicChatEvent", EventKind::PublicChat),
    ("RecordStatusEvent", EventKind::RecordStatus),
];

impl EventKind {
    /// Look up a raw tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        TAGS.iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, kind)| *kind)
    }

    /// The tag as it appears in the log.
    pub fn tag(self) -> &'static str {
        TAGS.iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }

    /// Kinds that never affect rendering or timeline state.
    pub fn is_administrative(self) -> bool {
        match self {
            EventKind::CreatePresentationPod
            | EventKind::EndAndKickAll
            | EventKind::ParticipantJoin
            | EventKind::StartRecording
            | EventKind::StartDesktopShare
            | EventKind::StopDesktopShare
            | EventKind::StartWebcamShare
            | EventKind::StopWebcamShare
            | EventKind::SharePresentation
            | EventKind::GotoSlide
            | EventKind::AddShape
            | EventKind::UndoAnnotation => false,
            EventKind::WhiteboardCursorMove
            | EventKind::AssignPresenter
            | EventKind::ConversionCompleted
            | EventKind::ParticipantJoined
            | EventKind::SetPresentationDownloadable
            | EventKind::SetPresenterInPod
            | EventKind::ResizeAndMoveSlide
            | EventKind::ParticipantLeft
            | EventKind::ParticipantMuted
            | EventKind::DeskShareStartRtmp
            | EventKind::DeskShareStopRtmp
            | EventKind::ParticipantStatusChange
            | EventKind::ParticipantTalking
            | EventKind::PublicChat
            | EventKind::RecordStatus => true,
        }
    }
}

/// A decoded event that changes whiteboard or timeline state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SessionStart,
    SessionEnd,
    ParticipantJoin {
        user_id: String,
        name: String,
    },
    RecordingStart {
        filename: String,
    },
    ScreenShareStart {
        filename: String,
    },
    ScreenShareStop {
        filename: String,
    },
    WebcamStart {
        filename: String,
    },
    WebcamStop {
        filename: String,
    },
    PresentationSwitch {
        presentation: String,
    },
    /// Slide change; `slide` is 1-based (the log carries a 0-based index).
    SlideChange {
        presentation: String,
        slide: u32,
    },
    AddShape {
        whiteboard: WhiteboardId,
        shape_id: String,
        draw_end: bool,
        record: ShapeRecord,
    },
    Undo {
        whiteboard: WhiteboardId,
        shape_id: String,
    },
}

/// Outcome of classifying one raw event.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// Administrative event; no effect on state.
    Skip(EventKind),
    /// Event that drives whiteboard or timeline state.
    State(SessionEvent),
}

/// Why an event could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("Unrecognized event kind {kind} at {timestamp_ms}")]
    UnrecognizedEventKind {
        kind: String,
        timestamp_ms: TimestampMs,
    },

    #[error("{kind} at {timestamp_ms} is missing field {field}")]
    MissingField {
        kind: String,
        field: &'static str,
        timestamp_ms: TimestampMs,
    },

    #[error("{kind} at {timestamp_ms} has invalid {field}: {value:?}")]
    InvalidField {
        kind: String,
        field: &'static str,
        value: String,
        timestamp_ms: TimestampMs,
    },
}

impl ClassifyError {
    pub fn timestamp_ms(&self) -> TimestampMs {
        match self {
            ClassifyError::UnrecognizedEventKind { timestamp_ms, .. }
            | ClassifyError::MissingField { timestamp_ms, .. }
            | ClassifyError::InvalidField { timestamp_ms, .. } => *timestamp_ms,
        }
    }
}

/// Classify one raw event. Pure; no side effects.
pub fn classify(event: &RawEvent) -> Result<Classified, ClassifyError> {
    let kind = EventKind::from_tag(&event.kind).ok_or_else(|| {
        ClassifyError::UnrecognizedEventKind {
            kind: event.kind.clone(),
            timestamp_ms: event.timestamp_ms,
        }
    })?;

    let fields = Fields { event };
    let decoded = match kind {
        EventKind::CreatePresentationPod => SessionEvent::SessionStart,
        EventKind::EndAndKickAll => SessionEvent::SessionEnd,
        EventKind::ParticipantJoin => SessionEvent::ParticipantJoin {
            user_id: fields.required("userId")?,
            name: fields.required("name")?,
        },
        EventKind::StartRecording => SessionEvent::RecordingStart {
            filename: fields.required("filename")?,
        },
        EventKind::StartDesktopShare => SessionEvent::ScreenShareStart {
            filename: fields.required("filename")?,
        },
        EventKind::StopDesktopShare => SessionEvent::ScreenShareStop {
            filename: fields.required("filename")?,
        },
        EventKind::StartWebcamShare => SessionEvent::WebcamStart {
            filename: fields.required("filename")?,
        },
        EventKind::StopWebcamShare => SessionEvent::WebcamStop {
            filename: fields.required("filename")?,
        },
        EventKind::SharePresentation => SessionEvent::PresentationSwitch {
            presentation: fields.required("presentationName")?,
        },
        EventKind::GotoSlide => {
            let raw = fields.required("slide")?;
            let index: u32 = raw
                .trim()
                .parse()
                .map_err(|_| fields.invalid("slide", &raw))?;
            SessionEvent::SlideChange {
                presentation: fields.required("presentationName")?,
                slide: index
                    .checked_add(1)
                    .ok_or_else(|| fields.invalid("slide", &raw))?,
            }
        }
        EventKind::AddShape => SessionEvent::AddShape {
            whiteboard: fields.whiteboard()?,
            shape_id: fields.required("shapeId")?,
            draw_end: fields.required("status")? == DRAW_END,
            record: ShapeRecord::new(event.fields.clone()),
        },
        EventKind::UndoAnnotation => SessionEvent::Undo {
            whiteboard: fields.whiteboard()?,
            shape_id: fields.required("shapeId")?,
        },
        EventKind::WhiteboardCursorMove
        | EventKind::AssignPresenter
        | EventKind::ConversionCompleted
        | EventKind::ParticipantJoined
        | EventKind::SetPresentationDownloadable
        | EventKind::SetPresenterInPod
        | EventKind::ResizeAndMoveSlide
        | EventKind::ParticipantLeft
        | EventKind::ParticipantMuted
        | EventKind::DeskShareStartRtmp
        | EventKind::DeskShareStopRtmp
        | EventKind::ParticipantStatusChange
        | EventKind::ParticipantTalking
        | EventKind::PublicChat
        | EventKind::RecordStatus => return Ok(Classified::Skip(kind)),
    };

    Ok(Classified::State(decoded))
}

struct Fields<'a> {
    event: &'a RawEvent,
}

impl Fields<'_> {
    fn required(&self, field: &'static str) -> Result<String, ClassifyError> {
        self.event
            .field(field)
            .map(str::to_string)
            .ok_or_else(|| ClassifyError::MissingField {
                kind: self.event.kind.clone(),
                field,
                timestamp_ms: self.event.timestamp_ms,
            })
    }

    fn invalid(&self, field: &'static str, value: &str) -> ClassifyError {
        ClassifyError::InvalidField {
            kind: self.event.kind.clone(),
            field,
            value: value.to_string(),
            timestamp_ms: self.event.timestamp_ms,
        }
    }

    fn whiteboard(&self) -> Result<WhiteboardId, ClassifyError> {
        let raw = self.required("whiteboardId")?;
        raw.parse().map_err(|_| self.invalid("whiteboardId", &raw))
    }
}
