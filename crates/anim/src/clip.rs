use serde::{Deserialize, Serialize};

/// A clip as enumerated by the animation provider.
///
/// Playback state (running, rate) stays with the provider; the catalog only
/// needs names and durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    pub name: String,
    pub duration_seconds: f32,
}

impl ClipInfo {
    pub fn new(name: impl Into<String>, duration_seconds: f32) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
        }
    }
}
