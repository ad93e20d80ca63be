//! Raw recorded events and the `events.xml` log reader.
//!
//! A recording log is a flat `<recording>` element holding one `<event>`
//! per recorded action, already in total order:
//!
//! ```xml
//! <recording>
//!   <event timestamp="1234" module="WHITEBOARD" eventname="AddShapeEvent">
//!     <timestampUTC>1600000005000</timestampUTC>
//!     <whiteboardId>deck-a/1</whiteboardId>
//!     ...
//!   </event>
//! </recording>
//! ```
//!
//! Child elements become string fields. Empty children are treated as
//! absent fields, so `<text/>` and `<text></text>` both read as "no text".

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

/// Wall-clock timestamp in milliseconds (UTC).
pub type TimestampMs = u64;

/// Field carrying the wall-clock timestamp of every event.
pub const TIMESTAMP_FIELD: &str = "timestampUTC";

/// One recorded event, as read from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event tag (the `eventname` attribute).
    pub kind: String,

    /// Wall-clock milliseconds from `timestampUTC`.
    pub timestamp_ms: TimestampMs,

    /// Emitting module (the `module` attribute), if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Kind-specific payload.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl RawEvent {
    /// Create an event with no payload.
    pub fn new(kind: impl Into<String>, timestamp_ms: TimestampMs) -> Self {
        Self {
            kind: kind.into(),
            timestamp_ms,
            module: None,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a payload field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Errors raised while reading an event log. All of them are fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed XML near byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("Event #{index} has no eventname attribute")]
    MissingEventName { index: usize },

    #[error("Event #{index} ({kind}) has no usable timestampUTC: {value:?}")]
    BadTimestamp {
        index: usize,
        kind: String,
        value: Option<String>,
    },

    #[error("Log contains no <recording> events")]
    Empty,
}

/// Read and parse an event log from disk.
pub fn read_event_log(path: impl AsRef<Path>) -> Result<Vec<RawEvent>, EventLogError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| EventLogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_event_log(&content)
}

/// Parse an `events.xml` document into raw events, in log order.
pub fn parse_event_log(xml: &str) -> Result<Vec<RawEvent>, EventLogError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut events = Vec::new();
    let mut current: Option<PendingEvent> = None;
    let mut field: Option<PendingField> = None;

    loop {
        let event = reader.read_event().map_err(|e| EventLogError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Eof => break,
            Event::Start(start) => {
                let name = element_name(start.local_name().as_ref());
                if current.is_none() {
                    if name == "event" {
                        current = Some(PendingEvent::from_start(&start, events.len())?);
                    }
                } else if let Some(open) = field.as_mut() {
                    open.nested += 1;
                } else {
                    field = Some(PendingField {
                        name,
                        text: String::new(),
                        nested: 0,
                    });
                }
            }
            Event::Empty(start) => {
                let name = element_name(start.local_name().as_ref());
                if current.is_none() && name == "event" {
                    let pending = PendingEvent::from_start(&start, events.len())?;
                    events.push(pending.finish()?);
                }
            }
            Event::Text(text) => {
                if let Some(open) = field.as_mut().filter(|f| f.nested == 0) {
                    let unescaped = text.unescape().map_err(|e| EventLogError::Xml {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    })?;
                    open.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(open) = field.as_mut().filter(|f| f.nested == 0) {
                    open.text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(end) => {
                let name = element_name(end.local_name().as_ref());
                if let Some(open) = field.as_mut() {
                    if open.nested > 0 {
                        open.nested -= 1;
                        continue;
                    }
                    if let (Some(pending), Some(done)) = (current.as_mut(), field.take()) {
                        if !done.text.is_empty() {
                            pending.fields.insert(done.name, done.text);
                        }
                    }
                } else if name == "event" {
                    if let Some(pending) = current.take() {
                        events.push(pending.finish()?);
                    }
                }
            }
            _ => {}
        }
    }

    if events.is_empty() {
        return Err(EventLogError::Empty);
    }
    Ok(events)
}

struct PendingEvent {
    index: usize,
    kind: String,
    module: Option<String>,
    fields: BTreeMap<String, String>,
}

struct PendingField {
    name: String,
    text: String,
    nested: usize,
}

impl PendingEvent {
    fn from_start(start: &BytesStart<'_>, index: usize) -> Result<Self, EventLogError> {
        let mut kind = None;
        let mut module = None;
        for attr in start.attributes() {
            let attr = attr.map_err(|e| EventLogError::Xml {
                position: 0,
                message: e.to_string(),
            })?;
            let value = attr
                .unescape_value()
                .map_err(|e| EventLogError::Xml {
                    position: 0,
                    message: e.to_string(),
                })?
                .into_owned();
            match attr.key.local_name().as_ref() {
                b"eventname" => kind = Some(value),
                b"module" => module = Some(value),
                _ => {}
            }
        }

        Ok(Self {
            index,
            kind: kind.ok_or(EventLogError::MissingEventName { index })?,
            module,
            fields: BTreeMap::new(),
        })
    }

    fn finish(self) -> Result<RawEvent, EventLogError> {
        let raw = self.fields.get(TIMESTAMP_FIELD).cloned();
        let timestamp_ms = raw
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .ok_or_else(|| EventLogError::BadTimestamp {
                index: self.index,
                kind: self.kind.clone(),
                value: raw.clone(),
            })?;

        Ok(RawEvent {
            kind: self.kind,
            timestamp_ms,
            module: self.module,
            fields: self.fields,
        })
    }
}

fn element_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
