use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use embody_common::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What a subscription listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Keyboard,
    Pointer,
    /// Once per rendered frame.
    FrameTick,
    /// Wall-clock period, independent of the frame tick.
    Interval(Duration),
}

/// Host-side registry of callbacks the orchestrator listens on.
pub trait Scheduler {
    fn subscribe(&mut self, channel: Channel) -> SubscriptionId;
    /// Returns `false` if `id` was not live.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
    fn is_subscribed(&self, id: SubscriptionId) -> bool;
}

/// Handle to at most one live subscription on a fixed channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    channel: Channel,
    id: Option<SubscriptionId>,
}

impl Subscription {
    pub fn new(channel: Channel) -> Self {
        Self { channel, id: None }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Whether `id` is this handle's live subscription.
    pub fn owns(&self, id: SubscriptionId) -> bool {
        self.id == Some(id)
    }

    /// Subscribe unless already live.
    pub fn ensure<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> SubscriptionId {
        match self.id {
            Some(id) => id,
            None => {
                let id = scheduler.subscribe(self.channel);
                self.id = Some(id);
                id
            }
        }
    }

    /// Unsubscribe. Safe to call any number of times; returns whether
    /// anything was cancelled.
    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        match self.id.take() {
            Some(id) => scheduler.unsubscribe(id),
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    channel: Channel,
    next_due: Option<Instant>,
}

/// In-process scheduler. The host polls [`due_intervals`](Self::due_intervals)
/// and routes events to the owners of the returned ids.
pub struct LocalScheduler {
    clock: Rc<dyn Clock>,
    next_id: u64,
    entries: BTreeMap<SubscriptionId, Entry>,
}

impl LocalScheduler {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn channel(&self, id: SubscriptionId) -> Option<Channel> {
        self.entries.get(&id).map(|e| e.channel)
    }

    /// Live subscriptions on `channel`, oldest first.
    pub fn subscribed(&self, channel: Channel) -> Vec<SubscriptionId> {
        self.entries
            .iter()
            .filter(|(_, e)| e.channel == channel)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Interval subscriptions whose period has elapsed. Each is rescheduled
    /// one period from now, so a late poll yields a single firing.
    pub fn due_intervals(&mut self) -> Vec<SubscriptionId> {
        let now = self.clock.now();
        let mut due = Vec::new();
        for (id, entry) in &mut self.entries {
            let (Channel::Interval(period), Some(next)) = (entry.channel, entry.next_due) else {
                continue;
            };
            if now >= next {
                entry.next_due = Some(now + period);
                due.push(*id);
            }
        }
        due
    }
}

impl Scheduler for LocalScheduler {
    fn subscribe(&mut self, channel: Channel) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let next_due = match channel {
            Channel::Interval(period) => Some(self.clock.now() + period),
            _ => None,
        };
        self.entries.insert(id, Entry { channel, next_due });
        tracing::trace!(id = id.0, ?channel, "subscribed");
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            tracing::trace!(id = id.0, "unsubscribed");
        }
        removed
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.entries.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embody_common::ManualClock;

    fn scheduler() -> (LocalScheduler, ManualClock) {
        let clock = ManualClock::new();
        (LocalScheduler::new(Rc::new(clock.clone())), clock)
    }

    #[test]
    fn ensure_subscribes_once() {
        let (mut s, _) = scheduler();
        let mut sub = Subscription::new(Channel::FrameTick);
        let a = sub.ensure(&mut s);
        let b = sub.ensure(&mut s);
        assert_eq!(a, b);
        assert_eq!(s.len(), 1);
        assert!(s.is_subscribed(a));
        assert_eq!(s.subscribed(Channel::FrameTick), vec![a]);
    }

    #[test]
    fn cancel_is_idempotent() {
        let (mut s, _) = scheduler();
        let mut sub = Subscription::new(Channel::Keyboard);
        let id = sub.ensure(&mut s);
        assert!(sub.cancel(&mut s));
        assert!(!sub.cancel(&mut s));
        assert!(!sub.is_active());
        assert!(!s.is_subscribed(id));
        assert!(s.is_empty());
    }

    #[test]
    fn resubscribe_gets_fresh_id() {
        let (mut s, _) = scheduler();
        let mut sub = Subscription::new(Channel::Pointer);
        let first = sub.ensure(&mut s);
        sub.cancel(&mut s);
        let second = sub.ensure(&mut s);
        assert_ne!(first, second);
        assert!(!sub.owns(first));
        assert!(sub.owns(second));
    }

    #[test]
    fn intervals_fire_once_per_period() {
        let (mut s, clock) = scheduler();
        let mut sub = Subscription::new(Channel::Interval(Duration::from_millis(200)));
        let id = sub.ensure(&mut s);
        let _frame = s.subscribe(Channel::FrameTick);

        clock.advance_millis(199);
        assert!(s.due_intervals().is_empty());
        clock.advance_millis(1);
        assert_eq!(s.due_intervals(), vec![id]);
        assert!(s.due_intervals().is_empty());

        clock.advance_millis(1000);
        assert_eq!(s.due_intervals(), vec![id]);
        assert!(s.due_intervals().is_empty());
    }

    #[test]
    fn cancelled_interval_never_fires() {
        let (mut s, clock) = scheduler();
        let mut sub = Subscription::new(Channel::Interval(Duration::from_millis(50)));
        sub.ensure(&mut s);
        sub.cancel(&mut s);
        clock.advance_millis(500);
        assert!(s.due_intervals().is_empty());
    }
}
