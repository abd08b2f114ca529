use std::time::{Duration, Instant};

use crate::scheduler::{Channel, Scheduler, Subscription, SubscriptionId};

/// One-shot quiet-period detector on a periodic wall-clock check.
///
/// Fires at most once per arming and disarms itself when it does. If nothing
/// re-arms it, idle detection stays off.
#[derive(Debug, Clone)]
pub struct IdleTimer {
    timeout: Duration,
    last_change: Instant,
    check: Subscription,
}

impl IdleTimer {
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            timeout,
            last_change: now,
            check: Subscription::new(Channel::Interval(timeout)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn last_change(&self) -> Instant {
        self.last_change
    }

    pub fn is_armed(&self) -> bool {
        self.check.is_active()
    }

    pub fn owns(&self, id: SubscriptionId) -> bool {
        self.check.owns(id)
    }

    /// Start the periodic check unless it is already running.
    pub fn arm<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.check.ensure(scheduler);
    }

    pub fn disarm<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.check.cancel(scheduler);
    }

    /// Note a state-changing event.
    pub fn touch(&mut self, now: Instant) {
        self.last_change = now;
    }

    /// Periodic check. Returns `true` exactly when the quiet period has been
    /// exceeded while `online`; the timer is disarmed in that case.
    pub fn check<S: Scheduler + ?Sized>(
        &mut self,
        now: Instant,
        online: bool,
        scheduler: &mut S,
    ) -> bool {
        if !self.is_armed() || !online {
            return false;
        }
        if now.saturating_duration_since(self.last_change) <= self.timeout {
            return false;
        }
        self.disarm(scheduler);
        true
    }
}
