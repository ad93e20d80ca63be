//! slidecast Export
//!
//! Turns a replayed session into files on disk.
//!
//! # Pipeline
//!
//! ```text
//! events.xml ──┐
//!              ├── replay ── frame snapshots ── frames/<n>.svg ── rsvg-convert ── frames/<n>.png
//! slides ──────┘       │                                                               │
//!                      └── media segments ─────────────── assemble ────────────────────┴── <name>.kdenlive
//!
//! events.xml ── annotation replay ── <pres>/slide<N>.svg ── rsvg-convert ── pdfjoin ── <pres>.pdf
//! ```

pub mod kdenlive;
pub mod presentation;
pub mod raster;
pub mod slides_export;
pub mod timeline_export;

pub use kdenlive::{assemble, TimelineDocument};
pub use presentation::DirectorySlideSource;
pub use raster::{command_exists, DocumentJoiner, PdfJoin, RasterTarget, Rasterizer, RenderError, RsvgConvert};
pub use slides_export::{export_slides, SlidesJob, SlidesReport};
pub use timeline_export::{export_timeline, TimelineJob, TimelineReport, TimelineSummary};
