use serde::{Deserialize, Serialize};

/// Tells other participants which clip the local avatar is playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEvent {
    pub name: String,
    #[serde(rename = "loop")]
    pub looped: bool,
}

#[derive(Serialize)]
struct Envelope<'a> {
    animation: &'a AnimationEvent,
}

impl AnimationEvent {
    pub fn new(name: impl Into<String>, looped: bool) -> Self {
        Self {
            name: name.into(),
            looped,
        }
    }

    /// Wire form: `{"animation":{"name":"walk","loop":true}}`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Envelope { animation: self })
    }
}

/// Outbound channel to the shared session.
pub trait NetworkSink {
    fn is_online(&self) -> bool;
    fn send_animation(&mut self, event: &AnimationEvent);
}

/// Last-value dedup: admits a clip unless it was the last one forwarded.
///
/// Not a sequence protocol; `a, b, a` forwards all three.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    last: Option<String>,
}

impl NotificationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admits(&self, name: &str) -> bool {
        self.last.as_deref() != Some(name)
    }

    pub fn record(&mut self, name: &str) {
        self.last = Some(name.to_string());
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

/// Sink that keeps every event, for tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub online: bool,
    sent: Vec<AnimationEvent>,
}

impl RecordingSink {
    pub fn online() -> Self {
        Self {
            online: true,
            sent: Vec::new(),
        }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[AnimationEvent] {
        &self.sent
    }

    pub fn names(&self) -> Vec<&str> {
        self.sent.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn take(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.sent)
    }
}

impl NetworkSink for RecordingSink {
    fn is_online(&self) -> bool {
        self.online
    }

    fn send_animation(&mut self, event: &AnimationEvent) {
        self.sent.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form() {
        let json = AnimationEvent::new("walk", true).to_json().unwrap();
        assert_eq!(json, r#"{"animation":{"name":"walk","loop":true}}"#);
    }

    #[test]
    fn filter_suppresses_consecutive_duplicates_only() {
        let mut filter = NotificationFilter::new();
        let mut forwarded = Vec::new();
        for name in ["walk", "walk", "idle", "walk", "walk"] {
            if filter.admits(name) {
                filter.record(name);
                forwarded.push(name);
            }
        }
        assert_eq!(forwarded, ["walk", "idle", "walk"]);
        assert_eq!(filter.last(), Some("walk"));
    }

    #[test]
    fn recording_sink_collects() {
        let mut sink = RecordingSink::online();
        sink.send_animation(&AnimationEvent::new("idle", true));
        assert_eq!(sink.names(), ["idle"]);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.sent().is_empty());
        assert!(!RecordingSink::offline().is_online());
    }
}
