use std::f32::consts::PI;
use std::rc::Rc;
use std::time::Instant;

use embody_anim::{AnimationCatalog, AnimationRole};
use embody_common::{Clock, Direction, ViewMode};
use glam::{Quat, Vec3};

use crate::config::LocomotionConfig;
use crate::rig::{AvatarRig, ViewRig};
use crate::rotation::{RotationSample, RotationTarget, RotationTween, heading_angle};
use crate::state::{MovementMode, MovementState, TargetSeek};
use crate::stride::{StrideTracker, playback_rate};

/// What one [`LocomotionController::integrate`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The third-person view is not active; nothing happened.
    Inactive,
    /// Moved along held directions or towards the target.
    Moved,
    /// No movement requested; only gravity applied.
    Falling,
    /// Reached the target and went idle.
    Arrived,
    /// Distances to the target grew on both axes; gave up and went idle.
    Missed,
    /// The target was not reached in time; went idle.
    TimedOut,
}

/// Drives one avatar from held directions or a move-to-point request.
///
/// Owns the avatar and view rigs while attached. Input methods mutate state
/// instantly; [`integrate`](Self::integrate) advances the pose once per frame.
pub struct LocomotionController<A, V> {
    avatar: A,
    view: V,
    catalog: AnimationCatalog,
    config: LocomotionConfig,
    clock: Rc<dyn Clock>,
    state: MovementState,
    stride: Option<StrideTracker>,
    linear_speed: f32,
    playback_rate: f32,
    active_clip: Option<String>,
    rotation: Option<RotationTween>,
    tracking_camera_rotation: bool,
}

impl<A: AvatarRig, V: ViewRig> LocomotionController<A, V> {
    pub fn new(
        avatar: A,
        view: V,
        catalog: AnimationCatalog,
        config: LocomotionConfig,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let stride = StrideTracker::resolve(&avatar, &config.left_effector, &config.right_effector);
        if stride.is_none() {
            tracing::debug!(
                left = %config.left_effector,
                right = %config.right_effector,
                "stride tracking disabled: effectors not found"
            );
        }
        let playback_rate = config.default_playback_rate;
        Self {
            avatar,
            view,
            catalog,
            config,
            clock,
            state: MovementState::new(),
            stride,
            linear_speed: 0.0,
            playback_rate,
            active_clip: None,
            rotation: None,
            tracking_camera_rotation: false,
        }
    }

    pub fn avatar(&self) -> &A {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut A {
        &mut self.avatar
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn catalog(&self) -> &AnimationCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.clock)
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn mode(&self) -> MovementMode {
        self.state.mode()
    }

    pub fn linear_speed(&self) -> f32 {
        self.linear_speed
    }

    /// Current walk playback rate.
    pub fn playback_rate(&self) -> f32 {
        self.playback_rate
    }

    /// Longest stride seen so far, or `None` if tracking is disabled.
    pub fn stride_length(&self) -> Option<f32> {
        self.stride.as_ref().map(StrideTracker::max_observed)
    }

    pub fn active_clip(&self) -> Option<&str> {
        self.active_clip.as_deref()
    }

    pub fn rotation(&self) -> Option<&RotationTween> {
        self.rotation.as_ref()
    }

    pub fn is_tracking_camera_rotation(&self) -> bool {
        self.tracking_camera_rotation
    }

    /// Start holding `direction`. Repeats are ignored.
    ///
    /// The first held direction starts the walk and cancels any target seek.
    pub fn add_vector(&mut self, direction: Direction) {
        if self.state.is_active(direction) {
            return;
        }
        if self.state.mode() == MovementMode::Targeted {
            tracing::debug!("directional input cancels target seek");
            self.state.reset();
        }
        self.rotation = None;
        let starting = self.state.active_count() == 0;
        self.state.insert(direction);
        if starting {
            self.start_movement();
        }
        tracing::trace!(%direction, vector = ?self.state.direction_vector(), "direction added");
    }

    /// Release `direction`. Releasing the last one stops and idles.
    pub fn remove_vector(&mut self, direction: Direction) {
        if !self.state.remove(direction) {
            return;
        }
        tracing::trace!(%direction, vector = ?self.state.direction_vector(), "direction removed");
        if self.state.active_count() == 0 {
            self.halt();
        }
    }

    /// Walk in a straight line to `point`. Ignored while a direction is held.
    ///
    /// A new target during a seek restarts the time window but not the walk
    /// animation. Either way the avatar turns towards the point.
    pub fn move_to_target(&mut self, point: Vec3) {
        if self.state.active_count() > 0 {
            tracing::trace!(?point, "move to target ignored while directions are held");
            return;
        }
        let now = self.clock.now();
        let heading = point - self.avatar.position();
        if self.state.seek().is_some() {
            self.state.retarget(point, heading, now);
        } else {
            self.start_movement();
            self.state.set_seek(TargetSeek {
                target: point,
                heading,
                last_axis_distances: None,
            });
        }
        tracing::debug!(target = ?point, "moving to target");
        self.turn_towards(heading, now);
    }

    /// Stop moving and idle. No effect when already idle.
    pub fn stop(&mut self) {
        if self.state.mode() == MovementMode::Idle && self.state.started_at().is_none() {
            return;
        }
        self.halt();
    }

    /// Reset movement state and start the idle clip unconditionally.
    pub fn halt(&mut self) {
        self.state.reset();
        self.start_role(AnimationRole::Idle);
    }

    /// Advance one frame: `delta_seconds` of motion at `linear_speed` units/s.
    pub fn integrate(&mut self, delta_seconds: f32, linear_speed: f32) -> StepOutcome {
        if self.view.active_view() != ViewMode::ThirdPerson {
            return StepOutcome::Inactive;
        }
        let now = self.clock.now();
        self.advance_rotation(now);
        self.follow_camera();

        if self.timed_out(now) {
            tracing::info!(
                position = ?self.avatar.position(),
                target = ?self.state.target(),
                "stopping movement: target not reached before timeout"
            );
            self.halt();
            return StepOutcome::TimedOut;
        }
        self.state.touch(now);
        self.set_linear_speed(linear_speed);

        let gravity = self.config.gravity;
        let outcome = match self.state.mode() {
            MovementMode::Directional => {
                let step = self.state.direction_vector().normalize_or_zero()
                    * linear_speed
                    * delta_seconds;
                let yaw = Quat::from_rotation_y(-1.5 * PI - self.view.orbit_yaw());
                self.avatar.move_with_collisions(yaw * step + gravity);
                StepOutcome::Moved
            }
            MovementMode::Targeted => {
                let Some(seek) = self.state.seek().copied() else {
                    return StepOutcome::Inactive;
                };
                let position = self.avatar.position();
                let dx = (position.x - seek.target.x).abs();
                let dz = (position.z - seek.target.z).abs();
                let tolerance = self.config.arrival_tolerance;
                if dx < tolerance && dz < tolerance {
                    tracing::info!(?position, "arrived at destination");
                    self.halt();
                    return StepOutcome::Arrived;
                }
                if let Some((last_dx, last_dz)) = seek.last_axis_distances {
                    if dx > last_dx && dz > last_dz {
                        tracing::info!(?position, dx, dz, "missed destination");
                        self.halt();
                        return StepOutcome::Missed;
                    }
                }
                let step = seek.heading.normalize_or_zero() * linear_speed * delta_seconds;
                self.avatar.move_with_collisions(step + gravity);
                self.state.record_axis_distances(dx, dz);
                StepOutcome::Moved
            }
            MovementMode::Idle => {
                self.avatar.move_with_collisions(gravity);
                StepOutcome::Falling
            }
        };
        self.sample_stride();
        tracing::trace!(?outcome, position = ?self.avatar.position(), "integrated");
        outcome
    }

    /// Change ground speed; recomputes walk playback when it differs.
    pub fn set_linear_speed(&mut self, linear_speed: f32) {
        if linear_speed != self.linear_speed {
            self.linear_speed = linear_speed;
            self.refresh_playback_rate();
        }
    }

    /// The third-person camera owns visible rotation from now on.
    pub fn start_tracking_camera_rotation(&mut self) {
        if self.tracking_camera_rotation {
            return;
        }
        if matches!(
            self.rotation.as_ref().map(RotationTween::target),
            Some(RotationTarget::Avatar { .. })
        ) {
            self.rotation = None;
        }
        self.tracking_camera_rotation = true;
    }

    /// The avatar owns its own rotation from now on.
    pub fn stop_tracking_camera_rotation(&mut self) {
        if !self.tracking_camera_rotation {
            return;
        }
        if matches!(
            self.rotation.as_ref().map(RotationTween::target),
            Some(RotationTarget::CameraYaw { .. })
        ) {
            self.rotation = None;
        }
        self.tracking_camera_rotation = false;
    }

    /// Release everything the controller drives. Leaves the avatar where it is.
    pub fn dispose(&mut self) {
        self.stop_tracking_camera_rotation();
        self.rotation = None;
        self.state.reset();
    }

    fn start_movement(&mut self) {
        self.state.begin(self.clock.now());
        self.refresh_playback_rate();
        self.start_role(AnimationRole::Walk);
    }

    fn start_role(&mut self, role: AnimationRole) {
        let Some(clip) = self.catalog.clip(role) else {
            return;
        };
        if let Some(previous) = self.active_clip.as_deref() {
            if previous != clip.name {
                self.avatar.stop_animation(previous);
            }
        }
        self.avatar.start_animation(&clip.name, true);
        self.active_clip = Some(clip.name.clone());
    }

    fn refresh_playback_rate(&mut self) {
        let Some(walk) = self.catalog.walk() else {
            return;
        };
        let measured = self
            .stride
            .as_ref()
            .map(StrideTracker::max_observed)
            .and_then(|stride| {
                playback_rate(
                    stride,
                    walk.duration_seconds,
                    self.linear_speed,
                    self.config.unit_conversion,
                )
            });
        let rate = measured.unwrap_or(self.config.default_playback_rate);
        if rate != self.playback_rate {
            tracing::trace!(rate, clip = %walk.name, "walk playback rate");
        }
        self.playback_rate = rate;
        self.avatar.set_playback_rate(&walk.name, rate);
    }

    fn sample_stride(&mut self) {
        let grew = match self.stride.as_mut() {
            Some(stride) => stride.sample(&self.avatar).is_some(),
            None => false,
        };
        if grew {
            tracing::trace!(stride = ?self.stride_length(), "new maximum stride");
            self.refresh_playback_rate();
        }
    }

    fn timed_out(&self, now: Instant) -> bool {
        if self.state.seek().is_none() {
            return false;
        }
        self.state
            .started_at()
            .is_some_and(|started| now.saturating_duration_since(started) > self.config.movement_timeout())
    }

    fn turn_towards(&mut self, heading: Vec3, now: Instant) {
        let local_forward = if self.avatar.turned_around() {
            Vec3::Z
        } else {
            Vec3::NEG_Z
        };
        let forward = self.avatar.rotation() * local_forward;
        let Some(angle) = heading_angle(forward, heading) else {
            self.rotation = None;
            return;
        };
        let target = if self.tracking_camera_rotation {
            let from = self.view.orbit_yaw();
            RotationTarget::CameraYaw {
                from,
                to: from - angle,
            }
        } else {
            let from = self.avatar.rotation();
            RotationTarget::Avatar {
                from,
                to: (Quat::from_rotation_y(angle) * from).normalize(),
            }
        };
        self.rotation = Some(RotationTween::new(target, now, self.config.rotation_duration()));
    }

    fn advance_rotation(&mut self, now: Instant) {
        let Some(tween) = self.rotation.as_ref() else {
            return;
        };
        let sample = tween.sample(now);
        let finished = tween.is_finished(now);
        match sample {
            RotationSample::CameraYaw(yaw) => self.view.set_orbit_yaw(yaw),
            RotationSample::Avatar(rotation) => self.avatar.set_rotation(rotation),
        }
        if finished {
            self.rotation = None;
        }
    }

    /// Face the avatar away from the orbit camera.
    fn follow_camera(&mut self) {
        if !self.tracking_camera_rotation {
            return;
        }
        let reference = if self.avatar.turned_around() { 1.5 } else { 0.5 };
        let yaw = reference * PI - self.view.orbit_yaw();
        self.avatar.set_rotation(Quat::from_rotation_y(yaw));
    }
}
