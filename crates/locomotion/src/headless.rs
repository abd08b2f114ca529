//! In-memory rigs for tests, automation and the CLI simulation.

use std::collections::BTreeMap;

use embody_common::{FirstPersonPose, ViewMode};
use glam::{Quat, Vec3};

use crate::rig::{AvatarRig, ViewRig};

/// Playback state of one clip on a [`HeadlessAvatar`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlayback {
    pub playing: bool,
    pub looped: bool,
    pub rate: f32,
}

impl Default for ClipPlayback {
    fn default() -> Self {
        Self {
            playing: false,
            looped: false,
            rate: 1.0,
        }
    }
}

/// Avatar without a scene. Collision is a flat floor at `floor_height`.
///
/// Effectors are stored as offsets in the avatar's local frame.
#[derive(Debug, Clone)]
pub struct HeadlessAvatar {
    pub position: Vec3,
    pub rotation: Quat,
    pub visible: bool,
    pub turned_around: bool,
    pub floor_height: Option<f32>,
    pub head_height: f32,
    effectors: BTreeMap<String, Vec3>,
    playback: BTreeMap<String, ClipPlayback>,
    started: Vec<String>,
}

impl HeadlessAvatar {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            visible: false,
            turned_around: false,
            floor_height: Some(0.0),
            head_height: 1.7,
            effectors: BTreeMap::new(),
            playback: BTreeMap::new(),
            started: Vec::new(),
        }
    }

    pub fn with_effector(mut self, name: impl Into<String>, offset: Vec3) -> Self {
        self.effectors.insert(name.into(), offset);
        self
    }

    pub fn with_floor(mut self, floor_height: Option<f32>) -> Self {
        self.floor_height = floor_height;
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn set_effector(&mut self, name: &str, offset: Vec3) {
        self.effectors.insert(name.to_string(), offset);
    }

    /// The clip currently playing, if any.
    pub fn playing(&self) -> Option<&str> {
        self.playback
            .iter()
            .find(|(_, p)| p.playing)
            .map(|(name, _)| name.as_str())
    }

    pub fn playback(&self, clip: &str) -> Option<&ClipPlayback> {
        self.playback.get(clip)
    }

    /// Every `start_animation` call, in order.
    pub fn started(&self) -> &[String] {
        &self.started
    }
}

impl Default for HeadlessAvatar {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarRig for HeadlessAvatar {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn turned_around(&self) -> bool {
        self.turned_around
    }

    fn head_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.head_height
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn move_with_collisions(&mut self, displacement: Vec3) {
        let mut next = self.position + displacement;
        if let Some(floor) = self.floor_height {
            next.y = next.y.max(floor);
        }
        self.position = next;
    }

    fn effector_position(&self, name: &str) -> Option<Vec3> {
        self.effectors
            .get(name)
            .map(|offset| self.position + self.rotation * *offset)
    }

    fn start_animation(&mut self, clip: &str, looped: bool) {
        for p in self.playback.values_mut() {
            p.playing = false;
        }
        let entry = self.playback.entry(clip.to_string()).or_default();
        entry.playing = true;
        entry.looped = looped;
        self.started.push(clip.to_string());
    }

    fn stop_animation(&mut self, clip: &str) {
        if let Some(p) = self.playback.get_mut(clip) {
            p.playing = false;
        }
    }

    fn set_playback_rate(&mut self, clip: &str, rate: f32) {
        self.playback.entry(clip.to_string()).or_default().rate = rate;
    }
}

/// Camera pair without a scene: a first-person camera and a third-person orbit.
#[derive(Debug, Clone)]
pub struct HeadlessView {
    pub active: ViewMode,
    pub orbit_yaw: f32,
    pub orbit_target: Vec3,
    pub first_person: FirstPersonPose,
}

impl HeadlessView {
    pub fn new(active: ViewMode) -> Self {
        Self {
            active,
            orbit_yaw: 1.5 * std::f32::consts::PI,
            orbit_target: Vec3::ZERO,
            first_person: FirstPersonPose::default(),
        }
    }

    pub fn third_person() -> Self {
        Self::new(ViewMode::ThirdPerson)
    }

    pub fn set_active(&mut self, active: ViewMode) {
        self.active = active;
    }
}

impl ViewRig for HeadlessView {
    fn active_view(&self) -> ViewMode {
        self.active
    }

    fn orbit_yaw(&self) -> f32 {
        self.orbit_yaw
    }

    fn set_orbit_yaw(&mut self, yaw: f32) {
        self.orbit_yaw = yaw;
    }

    fn set_orbit_target(&mut self, target: Vec3) {
        self.orbit_target = target;
    }

    fn first_person_pose(&self) -> FirstPersonPose {
        self.first_person
    }

    fn set_first_person_pose(&mut self, pose: FirstPersonPose) {
        self.first_person = pose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_stops_falling() {
        let mut avatar = HeadlessAvatar::new().at(Vec3::new(0.0, 0.5, 0.0));
        avatar.move_with_collisions(Vec3::new(1.0, -9.81, 0.0));
        assert_eq!(avatar.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn no_floor_free_falls() {
        let mut avatar = HeadlessAvatar::new().with_floor(None);
        avatar.move_with_collisions(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(avatar.position.y, -1.0);
    }

    #[test]
    fn only_one_clip_plays() {
        let mut avatar = HeadlessAvatar::new();
        avatar.start_animation("walk", true);
        avatar.start_animation("idle", true);
        assert_eq!(avatar.playing(), Some("idle"));
        assert_eq!(avatar.started(), &["walk".to_string(), "idle".to_string()]);
    }

    #[test]
    fn effectors_follow_pose() {
        let avatar = HeadlessAvatar::new()
            .at(Vec3::new(5.0, 0.0, 0.0))
            .with_effector("leftFoot", Vec3::new(0.2, 0.0, 0.0));
        assert_eq!(
            avatar.effector_position("leftFoot"),
            Some(Vec3::new(5.2, 0.0, 0.0))
        );
        assert_eq!(avatar.effector_position("tail"), None);
    }

    #[test]
    fn head_is_above_feet() {
        let avatar = HeadlessAvatar::new();
        assert!(avatar.head_position().y > avatar.position.y);
    }
}
