//! slidecast Engine: session reconstruction
//!
//! Replays a recorded event log and rebuilds what was on screen:
//! - **Classifier:** Maps raw event tags to typed session events
//! - **Whiteboards:** Per-slide annotation state driven by add/undo
//! - **Geometry:** Renders one annotation into one SVG primitive
//! - **Timeline:** Frame, audio, webcam, and screen-share segments whose
//!   lengths are closed by the next event of the same kind
//! - **Replay:** Drives all of the above over one ordered log
//!
//! This crate does no filesystem or process I/O; slide documents arrive
//! through [`slides::SlideSource`] and rendered frames leave as strings.

pub mod classifier;
pub mod compose;
pub mod frames;
pub mod geometry;
pub mod issues;
pub mod replay;
pub mod slides;
pub mod timeline;
pub mod whiteboard;

pub use classifier::{classify, Classified, EventKind, SessionEvent};
pub use compose::{compose, Composition};
pub use frames::{render_frames, RenderedFrame};
pub use geometry::{render, GeometryError, Primitive};
pub use issues::{Diagnostics, ReplayIssue};
pub use replay::{replay_annotations, replay_session, AnnotationReplay, ReplayOutcome, SessionReplay};
pub use slides::{InMemorySlides, SlideLibrary, SlideSource};
pub use timeline::{SessionTimeline, TimelineBuilder};
pub use whiteboard::WhiteboardState;
