//! Notification event values

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One notification delivered to listeners
///
/// Events are owned values. Listeners receive a shared reference and may
/// clone what they need; there is no path back into the emitting subject
/// through an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Monotone sequence number within the source subject
    pub seq: u64,
    /// Name of the subject that emitted the event
    pub source: String,
    /// Event kind (e.g. `new_post`, `state_changed`)
    pub kind: String,
    /// Structured payload
    pub payload: Map<String, Value>,
}

impl Event {
    /// Create an event with an empty payload
    #[inline]
    #[must_use]
    pub fn new(seq: u64, source: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            seq,
            source: source.into(),
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    /// Attach a payload entry
    #[must_use]
    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Short human-readable description
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{}#{} {}", self.source, self.seq, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_names_source_seq_and_kind() {
        let event = Event::new(3, "chloe", "new_post");
        assert_eq!(event.describe(), "chloe#3 new_post");
    }

    #[test]
    fn payload_builder() {
        let event = Event::new(1, "s", "k").with_payload("url", "http://example.com/a.png");
        assert_eq!(
            event.payload.get("url").and_then(|v| v.as_str()),
            Some("http://example.com/a.png")
        );
    }
}
