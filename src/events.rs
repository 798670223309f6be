//! Named events emitted towards the agent activity's session.
//!
//! Events carry an arbitrary JSON payload mapping so hosts can route them
//! through whatever session event machinery they already have.

use serde::Serialize;
use serde_json::{Map, Value};

/// Event emitted when a filler-only transcript is suppressed while the
/// agent is speaking.
pub const AGENT_FALSE_INTERRUPTION: &str = "agent_false_interruption";

/// A named event with a JSON payload mapping.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEvent {
    pub name: String,
    pub payload: Map<String, Value>,
}

impl ActivityEvent {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field, consuming and returning the event.
    pub fn with_field<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    /// Get a payload field by key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Build the `agent_false_interruption` event for a suppressed transcript.
    pub fn agent_false_interruption(transcript: &str, timestamp_ms: u64) -> Self {
        Self::new(AGENT_FALSE_INTERRUPTION)
            .with_field("transcript", transcript)
            .with_field("timestamp", timestamp_ms)
    }
}

/// Sink for events emitted by the interceptor towards the host session.
///
/// Implementations must not block; emission happens inline on the transcript
/// dispatch path.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ActivityEvent);
}
