use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tunables for the locomotion controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Give up on a target after this long.
    pub movement_timeout_ms: u64,
    /// Per-axis (X and Z) distance under which a target counts as reached.
    pub arrival_tolerance: f32,
    /// Engine speed units to metres per second.
    pub unit_conversion: f32,
    /// Walk playback rate used until a stride has been measured.
    pub default_playback_rate: f32,
    /// Length of the turn-towards-target tween.
    pub rotation_duration_ms: u64,
    /// Added to every frame's displacement, unscaled by frame time.
    pub gravity: Vec3,
    /// Skeleton end-effectors whose distance is the stride.
    pub left_effector: String,
    pub right_effector: String,
}

impl LocomotionConfig {
    pub fn movement_timeout(&self) -> Duration {
        Duration::from_millis(self.movement_timeout_ms)
    }

    pub fn rotation_duration(&self) -> Duration {
        Duration::from_millis(self.rotation_duration_ms)
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            movement_timeout_ms: 5000,
            arrival_tolerance: 0.2,
            unit_conversion: 10.0,
            default_playback_rate: 1.0,
            rotation_duration_ms: 200,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            left_effector: "leftFoot".into(),
            right_effector: "rightFoot".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LocomotionConfig::default();
        assert_eq!(config.movement_timeout(), Duration::from_millis(5000));
        assert_eq!(config.rotation_duration(), Duration::from_millis(200));
        assert_eq!(config.arrival_tolerance, 0.2);
        assert_eq!(config.unit_conversion, 10.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: LocomotionConfig =
            serde_json::from_str(r#"{"movement_timeout_ms": 1000, "gravity": [0.0, 0.0, 0.0]}"#)
                .unwrap();
        assert_eq!(config.movement_timeout_ms, 1000);
        assert_eq!(config.gravity, Vec3::ZERO);
        assert_eq!(config.left_effector, "leftFoot");
    }
}
