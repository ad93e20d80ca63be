//! slidecast Data Model
//!
//! Defines the data contracts shared by the replay engine and exporters:
//! - **Events:** Raw recorded events and the `events.xml` log reader
//! - **Shapes:** Whiteboard ids and completed annotation shape records
//! - **Canvas:** Slide base documents and their drawing resolution
//! - **Segments:** Finished media segments of the session timeline
//!
//! Annotation coordinates are stored on a 0–100 scale in the log and are
//! normalized to `[0.0, 1.0]` when parsed.

pub mod canvas;
pub mod event;
pub mod segment;
pub mod shape;

pub use canvas::*;
pub use event::*;
pub use segment::*;
pub use shape::*;
