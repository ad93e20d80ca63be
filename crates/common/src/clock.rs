//! Session clock and timecode utilities.
//!
//! Every timestamp in a recording is wall-clock milliseconds (UTC). The
//! session clock anchors them to the first session-start event so that all
//! segment offsets are relative to the beginning of the session:
//! - Capturing the origin (first start wins)
//! - Converting absolute timestamps to relative offsets
//! - Formatting offsets as `HH:MM:SS.mmm` timecodes

use chrono::{DateTime, Utc};

use crate::error::{SlidecastError, SlidecastResult};

/// Relative-time origin for one recorded session.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    /// Absolute timestamp (ms) of the first session-start event.
    start_ms: Option<u64>,

    /// Absolute timestamp (ms) of the session-termination event.
    end_ms: Option<u64>,

    /// Latest absolute timestamp observed by the clock.
    last_seen_ms: Option<u64>,
}

impl SessionClock {
    /// Create a clock with no origin yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor the clock. Returns `false` if an origin already exists,
    /// in which case the existing origin is kept.
    pub fn start(&mut self, timestamp_ms: u64) -> bool {
        self.observe(timestamp_ms);
        if self.start_ms.is_some() {
            return false;
        }
        self.start_ms = Some(timestamp_ms);
        true
    }

    /// Record the session end and return it as a relative offset.
    pub fn end(&mut self, timestamp_ms: u64) -> SlidecastResult<u64> {
        let relative = self.relative(timestamp_ms)?;
        self.end_ms = Some(timestamp_ms);
        Ok(relative)
    }

    /// Note that an event with this timestamp was seen.
    pub fn observe(&mut self, timestamp_ms: u64) {
        self.last_seen_ms = Some(self.last_seen_ms.map_or(timestamp_ms, |t| t.max(timestamp_ms)));
    }

    /// Convert an absolute timestamp into milliseconds since session start.
    pub fn relative(&mut self, timestamp_ms: u64) -> SlidecastResult<u64> {
        let start = self.start_ms.ok_or(SlidecastError::MissingSessionStart {
            timestamp_ms: Some(timestamp_ms),
        })?;
        self.observe(timestamp_ms);
        Ok(timestamp_ms.saturating_sub(start))
    }

    /// Whether a session-start event has been seen.
    pub fn is_started(&self) -> bool {
        self.start_ms.is_some()
    }

    /// Absolute start timestamp, if any.
    pub fn start_ms(&self) -> Option<u64> {
        self.start_ms
    }

    /// Relative end offset, if the session-termination event was seen.
    pub fn end_offset_ms(&self) -> Option<u64> {
        match (self.start_ms, self.end_ms) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }

    /// Relative offset of the latest observed event.
    pub fn last_seen_offset_ms(&self) -> Option<u64> {
        match (self.start_ms, self.last_seen_ms) {
            (Some(start), Some(last)) => Some(last.saturating_sub(start)),
            _ => None,
        }
    }

    /// Wall-clock time at session start.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_ms
            .and_then(|ms| i64::try_from(ms).ok())
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// Convert milliseconds to fractional seconds.
pub fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Format a millisecond offset as an `HH:MM:SS.mmm` timecode.
///
/// Hours are not wrapped, so sessions longer than a day keep counting.
pub fn format_timecode(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_start_wins() {
        let mut clock = SessionClock::new();
        assert!(clock.start(1_000));
        assert!(!clock.start(5_000));
        assert_eq!(clock.start_ms(), Some(1_000));
        assert_eq!(clock.relative(4_000).unwrap(), 3_000);
    }

    #[test]
    fn test_relative_before_start_is_fatal() {
        let mut clock = SessionClock::new();
        let err = clock.relative(42).unwrap_err();
        assert!(matches!(
            err,
            SlidecastError::MissingSessionStart {
                timestamp_ms: Some(42)
            }
        ));
    }

    #[test]
    fn test_end_and_last_seen_offsets() {
        let mut clock = SessionClock::new();
        clock.start(10_000);
        clock.observe(12_500);
        assert_eq!(clock.last_seen_offset_ms(), Some(2_500));
        assert_eq!(clock.end_offset_ms(), None);
        assert_eq!(clock.end(55_000).unwrap(), 45_000);
        assert_eq!(clock.end_offset_ms(), Some(45_000));
    }

    #[test]
    fn test_started_at_wall_clock() {
        let mut clock = SessionClock::new();
        clock.start(1_600_000_000_000);
        let wall = clock.started_at().unwrap();
        assert_eq!(wall.to_rfc3339(), "2020-09-13T12:26:40+00:00");
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0), "00:00:00.000");
        assert_eq!(format_timecode(30_000), "00:00:30.000");
        assert_eq!(format_timecode(3_723_456), "01:02:03.456");
        assert_eq!(format_timecode(90_061_001), "25:01:01.001");
    }

    #[test]
    fn test_ms_to_secs() {
        assert!((ms_to_secs(1_500) - 1.5).abs() < 1e-9);
    }
}
