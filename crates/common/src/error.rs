//! Error types shared across slidecast crates.

use std::path::PathBuf;

/// Top-level error type for slidecast operations.
///
/// Only run-level failures live here. Per-event conditions (unknown event
/// kinds, dangling undo references, malformed shapes) are reported by the
/// engine as issues and never abort a replay.
#[derive(Debug, thiserror::Error)]
pub enum SlidecastError {
    #[error("Event log error: {message}")]
    EventLog { message: String },

    #[error("No session-start event precedes the event at {timestamp_ms:?}")]
    MissingSessionStart { timestamp_ms: Option<u64> },

    #[error("Presentation error: {message}")]
    Presentation { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SlidecastError.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

impl SlidecastError {
    pub fn event_log(msg: impl Into<String>) -> Self {
        Self::EventLog {
            message: msg.into(),
        }
    }

    pub fn presentation(msg: impl Into<String>) -> Self {
        Self::Presentation {
            message: msg.into(),
        }
    }
}
