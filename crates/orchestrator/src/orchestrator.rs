use std::f32::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use embody_anim::ClipInfo;
use embody_common::{Clock, Direction, ViewMode};
use embody_input::{Action, KeyBindings, KeyInput, PointerInput, map_pointer};
use embody_locomotion::{AvatarRig, LocomotionController, StepOutcome, ViewRig};
use glam::Vec3;

use crate::config::{ConfigError, EmbodimentConfig};
use crate::idle::IdleTimer;
use crate::network::{AnimationEvent, NetworkSink, NotificationFilter};
use crate::scheduler::{Channel, LocalScheduler, Scheduler, Subscription, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbodimentState {
    /// Not attached, or disposed.
    Detached,
    /// Attached while the first-person or immersive view is active.
    FirstPerson,
    /// Attached and driving the avatar.
    ThirdPerson,
}

/// A locally produced change to the avatar, as reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalChange {
    Position,
    Rotation,
    /// The user typed something; may trigger a free-text animation.
    Wrote(String),
}

/// Attaches a [`LocomotionController`] to input, the frame tick, an idle timer
/// and a network sink for as long as the third-person view is active.
pub struct EmbodimentOrchestrator<A, V, N, S> {
    controller: LocomotionController<A, V>,
    network: N,
    scheduler: S,
    clock: Rc<dyn Clock>,
    keys: KeyBindings,
    state: EmbodimentState,
    keyboard: Subscription,
    pointer: Subscription,
    frame: Subscription,
    idle: IdleTimer,
    filter: NotificationFilter,
    last_position: Vec3,
    disposed: bool,
}

impl<A: AvatarRig, V: ViewRig, N: NetworkSink, S: Scheduler> EmbodimentOrchestrator<A, V, N, S> {
    pub fn new(
        controller: LocomotionController<A, V>,
        network: N,
        scheduler: S,
        keys: KeyBindings,
        idle_timeout: Duration,
    ) -> Self {
        let clock = controller.clock();
        let idle = IdleTimer::new(idle_timeout, clock.now());
        let last_position = controller.avatar().position();
        Self {
            controller,
            network,
            scheduler,
            clock,
            keys,
            state: EmbodimentState::Detached,
            keyboard: Subscription::new(Channel::Keyboard),
            pointer: Subscription::new(Channel::Pointer),
            frame: Subscription::new(Channel::FrameTick),
            idle,
            filter: NotificationFilter::new(),
            last_position,
            disposed: false,
        }
    }

    /// Validate `config`, discover roles in `clips` and build the controller.
    pub fn from_config(
        avatar: A,
        view: V,
        clips: Vec<ClipInfo>,
        network: N,
        scheduler: S,
        config: &EmbodimentConfig,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.build_catalog(clips);
        let controller =
            LocomotionController::new(avatar, view, catalog, config.locomotion.clone(), clock);
        Ok(Self::new(
            controller,
            network,
            scheduler,
            config.keys.clone(),
            config.idle_timeout(),
        ))
    }

    pub fn state(&self) -> EmbodimentState {
        self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn controller(&self) -> &LocomotionController<A, V> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut LocomotionController<A, V> {
        &mut self.controller
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn idle_timer(&self) -> &IdleTimer {
        &self.idle
    }

    pub fn last_forwarded(&self) -> Option<&str> {
        self.filter.last()
    }

    /// Start following view changes. Ignored once disposed or when already attached.
    pub fn attach(&mut self) {
        if self.disposed || self.state != EmbodimentState::Detached {
            return;
        }
        self.state = EmbodimentState::FirstPerson;
        tracing::debug!("embodiment attached");
        self.on_view_changed();
    }

    /// React to the host switching the active camera.
    pub fn on_view_changed(&mut self) {
        if self.state == EmbodimentState::Detached {
            tracing::trace!("view change ignored while detached");
            return;
        }
        let active = self.controller.view().active_view();
        match (self.state, active) {
            (EmbodimentState::FirstPerson, ViewMode::ThirdPerson) => self.enter_third_person(),
            (EmbodimentState::ThirdPerson, ViewMode::ThirdPerson) => {}
            (EmbodimentState::ThirdPerson, next) => self.leave_third_person(next),
            (EmbodimentState::FirstPerson, ViewMode::FirstPerson) => {
                self.controller.avatar_mut().set_visible(false);
            }
            _ => {}
        }
    }

    pub fn on_key(&mut self, input: &KeyInput) -> Option<Action> {
        if !self.keyboard.is_active() {
            return None;
        }
        let action = self.keys.map(input)?;
        self.dispatch(action);
        Some(action)
    }

    pub fn on_pointer(&mut self, input: &PointerInput) -> Option<Action> {
        if !self.pointer.is_active() {
            return None;
        }
        let action = map_pointer(input)?;
        self.dispatch(action);
        Some(action)
    }

    /// Symbolic direction input (`"left"`, `"forward"`, ...) from an external adapter.
    pub fn on_direction(&mut self, symbol: &str, pressed: bool) {
        if !self.keyboard.is_active() {
            tracing::trace!(symbol, "direction input ignored outside third person");
            return;
        }
        match symbol.parse::<Direction>() {
            Ok(direction) if pressed => self.dispatch(Action::AddDirection(direction)),
            Ok(direction) => self.dispatch(Action::RemoveDirection(direction)),
            Err(err) => tracing::debug!(%err, "ignoring direction input"),
        }
    }

    #[cfg(feature = "vr")]
    pub fn on_teleport(&mut self, event: &embody_input::TeleportEvent) {
        self.dispatch(embody_input::map_teleport(event));
    }

    pub fn dispatch(&mut self, action: Action) {
        if self.disposed {
            return;
        }
        match action {
            Action::AddDirection(direction) => self.controller.add_vector(direction),
            Action::RemoveDirection(direction) => self.controller.remove_vector(direction),
            Action::MoveToTarget(point) => self.controller.move_to_target(point),
            Action::Stop => self.controller.stop(),
        }
    }

    pub fn move_to_target(&mut self, point: Vec3) {
        self.dispatch(Action::MoveToTarget(point));
    }

    pub fn add_vector(&mut self, direction: Direction) {
        self.dispatch(Action::AddDirection(direction));
    }

    pub fn remove_vector(&mut self, direction: Direction) {
        self.dispatch(Action::RemoveDirection(direction));
    }

    pub fn stop(&mut self) {
        self.dispatch(Action::Stop);
    }

    /// Frame tick. Returns `None` unless the frame subscription is live.
    ///
    /// A moved avatar is reported as a [`LocalChange::Position`].
    pub fn on_frame(&mut self, delta_seconds: f32, linear_speed: f32) -> Option<StepOutcome> {
        if !self.frame.is_active() {
            return None;
        }
        let outcome = self.controller.integrate(delta_seconds, linear_speed);
        let position = self.controller.avatar().position();
        if position != self.last_position {
            self.last_position = position;
            self.process_changes(&[LocalChange::Position]);
        }
        Some(outcome)
    }

    /// Interval callback. Returns whether the idle notification fired.
    pub fn on_interval(&mut self, id: SubscriptionId) -> bool {
        if !self.idle.owns(id) {
            return false;
        }
        self.check_idle()
    }

    /// Announce the idle clip once the quiet period has passed.
    pub fn check_idle(&mut self) -> bool {
        let now = self.clock.now();
        let online = self.network.is_online();
        if !self.idle.check(now, online, &mut self.scheduler) {
            return false;
        }
        tracing::debug!("no changes for the idle timeout");
        if let Some(name) = self.controller.catalog().idle().map(|c| c.name.clone()) {
            self.forward(&name, true);
        }
        true
    }

    /// Handle locally generated changes. Nothing is processed in the
    /// immersive view.
    pub fn process_changes(&mut self, changes: &[LocalChange]) {
        if self.state == EmbodimentState::Detached {
            return;
        }
        if self.controller.view().active_view() == ViewMode::Immersive {
            tracing::trace!(count = changes.len(), "changes ignored in immersive view");
            return;
        }
        let now = self.clock.now();
        for change in changes {
            self.idle.touch(now);
            match change {
                LocalChange::Position => {
                    self.idle.arm(&mut self.scheduler);
                    if let Some(name) = self.controller.catalog().walk().map(|c| c.name.clone()) {
                        self.forward(&name, true);
                    }
                    break;
                }
                LocalChange::Rotation => {}
                LocalChange::Wrote(text) => {
                    let resolved = self
                        .controller
                        .catalog()
                        .resolve(text)
                        .map(|c| c.name.clone());
                    if let Some(name) = resolved {
                        self.forward(&name, false);
                    }
                }
            }
        }
    }

    /// Cancel every subscription and release the controller. Idempotent;
    /// the orchestrator stays detached afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.unsubscribe_all();
        self.controller.dispose();
        self.state = EmbodimentState::Detached;
        self.disposed = true;
        tracing::debug!("embodiment disposed");
    }

    fn enter_third_person(&mut self) {
        let pose = self.controller.view().first_person_pose();
        self.controller.view_mut().set_orbit_yaw(1.5 * PI - pose.yaw);
        let avatar = self.controller.avatar_mut();
        avatar.set_position(pose.feet());
        avatar.set_visible(true);
        let head = avatar.head_position();
        self.controller.view_mut().set_orbit_target(head);

        self.keyboard.ensure(&mut self.scheduler);
        self.pointer.ensure(&mut self.scheduler);
        self.frame.ensure(&mut self.scheduler);
        self.controller.start_tracking_camera_rotation();
        self.controller.halt();

        self.last_position = self.controller.avatar().position();
        self.idle.touch(self.clock.now());
        self.idle.arm(&mut self.scheduler);
        self.state = EmbodimentState::ThirdPerson;
        tracing::info!(position = ?self.last_position, "entered third person");
    }

    fn leave_third_person(&mut self, next: ViewMode) {
        self.unsubscribe_all();
        self.controller.stop_tracking_camera_rotation();
        self.controller.stop();
        if next == ViewMode::FirstPerson {
            let position = self.controller.avatar().position();
            let orbit_yaw = self.controller.view().orbit_yaw();
            let mut pose = self.controller.view().first_person_pose();
            pose.position = position + Vec3::Y * pose.eye_height;
            pose.yaw = 1.5 * PI - orbit_yaw;
            self.controller.view_mut().set_first_person_pose(pose);
            self.controller.avatar_mut().set_visible(false);
        }
        self.state = EmbodimentState::FirstPerson;
        tracing::info!(view = %next, "left third person");
    }

    fn unsubscribe_all(&mut self) {
        self.keyboard.cancel(&mut self.scheduler);
        self.pointer.cancel(&mut self.scheduler);
        self.frame.cancel(&mut self.scheduler);
        self.idle.disarm(&mut self.scheduler);
    }

    fn forward(&mut self, name: &str, looped: bool) -> bool {
        if !self.controller.catalog().contains(name) {
            return false;
        }
        if !self.network.is_online() {
            tracing::trace!(clip = name, "offline, animation not forwarded");
            return false;
        }
        if !self.filter.admits(name) {
            tracing::trace!(clip = name, "duplicate animation suppressed");
            return false;
        }
        self.network.send_animation(&AnimationEvent::new(name, looped));
        self.filter.record(name);
        tracing::debug!(clip = name, looped, "animation forwarded");
        true
    }
}

impl<A: AvatarRig, V: ViewRig, N: NetworkSink> EmbodimentOrchestrator<A, V, N, LocalScheduler> {
    /// Deliver every due interval callback. Returns how many idle
    /// notifications fired.
    pub fn poll_intervals(&mut self) -> usize {
        let due = self.scheduler.due_intervals();
        due.into_iter().filter(|id| self.on_interval(*id)).count()
    }
}
