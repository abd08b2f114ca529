use embody_common::{FirstPersonPose, ViewMode};
use glam::{Quat, Vec3};

/// The avatar as seen by the controller: pose, skeleton lookups and clip playback.
///
/// Implemented by the scene/animation provider. The controller owns its rig
/// for as long as it is attached, so nothing else moves the avatar meanwhile.
pub trait AvatarRig {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);

    /// Whether the model was authored facing +Z instead of -Z.
    fn turned_around(&self) -> bool {
        false
    }

    fn head_position(&self) -> Vec3;
    fn set_visible(&mut self, visible: bool);

    /// Collide-and-slide move by `displacement`.
    fn move_with_collisions(&mut self, displacement: Vec3);

    /// World position of a named joint or end-effector.
    fn effector_position(&self, name: &str) -> Option<Vec3>;

    fn start_animation(&mut self, clip: &str, looped: bool);
    fn stop_animation(&mut self, clip: &str);
    fn set_playback_rate(&mut self, clip: &str, rate: f32);
}

/// Scene camera state the controller and orchestrator read and drive.
pub trait ViewRig {
    fn active_view(&self) -> ViewMode;

    /// Orbit angle of the third-person camera around its target, radians.
    fn orbit_yaw(&self) -> f32;
    fn set_orbit_yaw(&mut self, yaw: f32);
    fn set_orbit_target(&mut self, target: Vec3);

    fn first_person_pose(&self) -> FirstPersonPose;
    fn set_first_person_pose(&mut self, pose: FirstPersonPose);
}
