//! Show recording information.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::DateTime;

use slidecast_common::clock::{format_timecode, ms_to_secs};
use slidecast_common::config::AppConfig;
use slidecast_engine::replay::replay_session;
use slidecast_export::presentation::DirectorySlideSource;
use slidecast_model::event::read_event_log;
use slidecast_model::segment::SegmentKind;

use super::{fallback_canvas, print_issues};

pub fn run(path: PathBuf, config: &AppConfig) -> anyhow::Result<()> {
    let events = read_event_log(path.join("events.xml"))
        .map_err(|e| anyhow::anyhow!("Failed to read event log: {e}"))?;
    let source = DirectorySlideSource::new(&path, fallback_canvas(config));
    let presentations = source.list_presentations()?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in &events {
        *counts.entry(event.kind.as_str()).or_default() += 1;
    }
    tracing::debug!(events = events.len(), kinds = counts.len(), "Event log loaded");

    println!("Recording: {}", path.display());
    println!("  Events: {}", events.len());
    for (kind, count) in &counts {
        println!("    {kind}: {count}");
    }
    println!();

    println!("Presentations:");
    if presentations.is_empty() {
        println!("  (none)");
    }
    for presentation in &presentations {
        let slides = source.slide_files(presentation).map(|s| s.len()).unwrap_or(0);
        println!("  {presentation}: {slides} slides");
    }
    println!();

    let outcome = replay_session(&events, &source)
        .map_err(|e| anyhow::anyhow!("Failed to replay session: {e}"))?;
    let timeline = &outcome.timeline;

    println!("Session:");
    match i64::try_from(timeline.started_at_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
    {
        Some(start) => println!("  Started: {}", start.format("%Y-%m-%d %H:%M:%S%.3f UTC")),
        None => println!("  Started: {} ms", timeline.started_at_ms),
    }
    println!(
        "  Length: {} ({:.1}s)",
        format_timecode(timeline.length_ms),
        ms_to_secs(timeline.length_ms)
    );
    println!();

    println!("Timeline:");
    for kind in SegmentKind::ALL {
        println!(
            "  {}: {} segments on {} tracks",
            kind.as_str(),
            timeline.segments(kind).len(),
            timeline.lanes(kind).len()
        );
    }
    println!();

    println!("Annotations:");
    let boards = outcome.whiteboards.whiteboards();
    if boards.is_empty() {
        println!("  (none)");
    }
    for board in boards {
        println!(
            "  {board}: {} shapes",
            outcome.whiteboards.shape_count(board)
        );
    }

    print_issues(&outcome.issues);
    Ok(())
}

