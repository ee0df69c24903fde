//! Analytics event emission
//!
//! The core treats its analytics collector as an external collaborator:
//! it emits `(name, flat parameter map)` pairs fire-and-forget and never
//! depends on delivery. Sinks therefore return nothing; a sink that needs
//! IO buffers internally and flushes on its own schedule.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;

/// A primitive event parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventValue {
    /// String parameter
    Str(String),
    /// Integer parameter
    Int(i64),
    /// Float parameter
    Float(f64),
    /// Boolean parameter
    Bool(bool),
}

impl From<&str> for EventValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for EventValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for EventValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for EventValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for EventValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Flat parameter map attached to an event. `BTreeMap` keeps the
/// serialized form stable for collectors that dedupe on payload.
pub type EventParams = BTreeMap<String, EventValue>;

/// Fire-and-forget sink for analytics events.
pub trait EventSink: Send + Sync {
    /// Emit one event. Must not block and must not fail the caller.
    fn emit(&self, name: &str, params: EventParams);
}

impl<T: EventSink> EventSink for std::sync::Arc<T> {
    fn emit(&self, name: &str, params: EventParams) {
        T::emit(self, name, params);
    }
}

/// Sink that drops every event. Default for clients without analytics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _name: &str, _params: EventParams) {}
}

/// One recorded event, as captured by [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Event name
    pub name: String,
    /// Flat parameter map
    pub params: EventParams,
}

/// Sink that records events in memory for inspection in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemorySink {
    /// Create a new empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the recorded events.
    ///
    /// # Panics
    ///
    /// Panics if a previous recording panicked while holding the lock.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().expect("event sink poisoned").clone()
    }

    /// Number of recorded events.
    ///
    /// # Panics
    ///
    /// Panics if a previous recording panicked while holding the lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().expect("event sink poisoned").len()
    }

    /// Check if no events were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn emit(&self, name: &str, params: EventParams) {
        if let Ok(mut events) = self.events.lock() {
            events.push(RecordedEvent {
                name: name.to_string(),
                params,
            });
        }
    }
}
