//! Store event journal.
//!
//! Records the outcome of every load and save. The log is append-only and
//! never holds contact data, only counts. Supports pluggable sinks for
//! forwarding events to a file or elsewhere.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sink that receives store events. Implement this to forward events to a
/// file, a database, or another persistent store.
pub trait EventSink: Send {
    /// Append an event. Called for every load and save outcome.
    fn append(&mut self, event: StoreEvent);
}

/// What happened to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEventKind {
    /// No file existed; an empty book was created in memory.
    Created,
    /// The file was decrypted and decoded.
    Loaded,
    /// The file existed but could not be decoded under the given key.
    Rejected,
    /// The book was encrypted and written.
    Saved,
}

/// A permanent record of a store operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    pub kind: StoreEventKind,
    /// The store file involved.
    pub path: String,
    /// Number of contacts loaded or saved. `None` for rejected loads.
    pub contacts: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

impl StoreEvent {
    pub fn now(kind: StoreEventKind, path: &Path, contacts: Option<usize>) -> Self {
        Self {
            kind,
            path: path.display().to_string(),
            contacts,
            timestamp: Utc::now(),
        }
    }
}

/// An append-only log of store events.
#[derive(Default)]
pub struct EventLog {
    events: Vec<StoreEvent>,
    forward_sinks: Vec<Box<dyn EventSink>>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.events)
            .field("forward_sinks", &self.forward_sinks.len())
            .finish()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink to receive a copy of every event.
    pub fn add_forward_sink(&mut self, sink: Box<dyn EventSink>) {
        self.forward_sinks.push(sink);
    }

    /// Append a new event to the log and forward it to any attached sinks.
    pub fn append(&mut self, event: StoreEvent) {
        for sink in self.forward_sinks.iter_mut() {
            sink.append(event.clone());
        }
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StoreEvent> {
        self.events.iter()
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<&StoreEvent> {
        self.events.last()
    }
}

// ---------------------------------------------------------------------------
// Built-in sink: file
// ---------------------------------------------------------------------------

/// Writes events as JSON lines (one per event) to a file.
/// Creates the file if it doesn't exist; appends if it does.
pub struct FileEventSink {
    file: std::fs::File,
}

impl FileEventSink {
    /// Open or create a file for append-only event logging.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl EventSink for FileEventSink {
    fn append(&mut self, event: StoreEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "could not serialize store event");
                return;
            }
        };
        if let Err(err) = writeln!(self.file, "{line}").and_then(|()| self.file.flush()) {
            tracing::warn!(error = %err, "could not write store event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_iterate() {
        let mut log = EventLog::new();
        assert!(log.is_empty());
        log.append(StoreEvent::now(StoreEventKind::Created, Path::new("a.bin"), Some(0)));
        log.append(StoreEvent::now(StoreEventKind::Saved, Path::new("a.bin"), Some(2)));

        assert_eq!(log.len(), 2);
        let kinds: Vec<_> = log.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [StoreEventKind::Created, StoreEventKind::Saved]);
        assert_eq!(log.last().unwrap().contacts, Some(2));
    }

    #[test]
    fn test_event_serializes_snake_case() {
        let event = StoreEvent::now(StoreEventKind::Rejected, Path::new("x"), None);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "rejected");
        assert_eq!(json["contacts"], serde_json::Value::Null);
    }
}
