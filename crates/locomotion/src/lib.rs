//! Locomotion: turns held directions and move-to-point requests into avatar motion.
//!
//! The controller integrates position once per frame, picks the walk or idle
//! clip from the animation catalog, and keeps walk playback in step with
//! ground speed using the measured stride.
//!
//! # Invariants
//! - Directional movement and target seeking are mutually exclusive.
//! - The direction vector is always the sum of the active directions' vectors.
//! - Stride length only grows over the controller's lifetime.
//! - At most one rotation tween (camera yaw or avatar orientation) is active.
//! - Nothing here fails: unreachable targets, missing clips and missing
//!   effectors degrade to idle or constant playback.

pub mod config;
pub mod controller;
pub mod headless;
pub mod rig;
pub mod rotation;
pub mod state;
pub mod stride;

pub use config::LocomotionConfig;
pub use controller::{LocomotionController, StepOutcome};
pub use headless::{ClipPlayback, HeadlessAvatar, HeadlessView};
pub use rig::{AvatarRig, ViewRig};
pub use rotation::{RotationSample, RotationTarget, RotationTween, heading_angle};
pub use state::{MovementMode, MovementState, TargetSeek};
pub use stride::{StrideTracker, playback_rate};

pub fn crate_info() -> &'static str {
    "embody-locomotion v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("locomotion"));
    }
}
