//! Media segments of the reconstructed session timeline.
//!
//! Offsets and lengths are milliseconds relative to the session start.

use serde::{Deserialize, Serialize};

/// Track a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// A rendered slide frame.
    Frame,
    /// A recorded audio file.
    Audio,
    /// A presenter webcam stream.
    Webcam,
    /// A desktop/screen share stream.
    Screenshare,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [
        SegmentKind::Frame,
        SegmentKind::Audio,
        SegmentKind::Webcam,
        SegmentKind::Screenshare,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentKind::Frame => "frame",
            SegmentKind::Audio => "audio",
            SegmentKind::Webcam => "webcam",
            SegmentKind::Screenshare => "screenshare",
        }
    }
}

/// A contiguous, closed span of one timeline track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSegment {
    pub kind: SegmentKind,

    /// Registry key the segment was opened under (file name for webcam and
    /// screen share, empty for single-lane tracks).
    pub key: String,

    /// Media path relative to the recording directory.
    pub resource: String,

    /// Presenter name for webcam segments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Offset from session start.
    pub start_ms: u64,

    /// Duration, known once the successor (or session end) arrived.
    pub length_ms: u64,
}

impl MediaSegment {
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.length_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_end() {
        let segment = MediaSegment {
            kind: SegmentKind::Audio,
            key: String::new(),
            resource: "audio/a.opus".to_string(),
            label: None,
            start_ms: 30_000,
            length_ms: 15_000,
        };
        assert_eq!(segment.end_ms(), 45_000);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SegmentKind::Screenshare).unwrap(),
            "\"screenshare\""
        );
    }
}
