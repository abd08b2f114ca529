use std::collections::BTreeSet;
use std::time::Instant;

use embody_common::Direction;
use glam::Vec3;
use serde::Serialize;

/// Which movement style is in effect. Derived from [`MovementState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    Idle,
    Directional,
    Targeted,
}

/// A straight-line walk towards a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSeek {
    pub target: Vec3,
    /// Target minus avatar position when the request arrived.
    pub heading: Vec3,
    /// X and Z distances to the target on the previous moving frame.
    pub last_axis_distances: Option<(f32, f32)>,
}

/// Movement state of one avatar.
///
/// The direction set and the target seek are never populated together; the
/// controller clears one before filling the other.
#[derive(Debug, Clone, Default)]
pub struct MovementState {
    active: BTreeSet<Direction>,
    seek: Option<TargetSeek>,
    started_at: Option<Instant>,
    last_tick_at: Option<Instant>,
}

impl MovementState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> MovementMode {
        if !self.active.is_empty() {
            MovementMode::Directional
        } else if self.seek.is_some() {
            MovementMode::Targeted
        } else {
            MovementMode::Idle
        }
    }

    pub fn is_active(&self, direction: Direction) -> bool {
        self.active.contains(&direction)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.active.iter().copied()
    }

    /// Sum of the active directions' vectors.
    pub fn direction_vector(&self) -> Vec3 {
        self.active.iter().map(|d| d.vector()).sum()
    }

    pub fn seek(&self) -> Option<&TargetSeek> {
        self.seek.as_ref()
    }

    pub fn target(&self) -> Option<Vec3> {
        self.seek.map(|s| s.target)
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn last_tick_at(&self) -> Option<Instant> {
        self.last_tick_at
    }

    pub(crate) fn insert(&mut self, direction: Direction) -> bool {
        debug_assert!(self.seek.is_none(), "seek must be cleared before directional input");
        self.active.insert(direction)
    }

    pub(crate) fn remove(&mut self, direction: Direction) -> bool {
        self.active.remove(&direction)
    }

    /// Open a movement episode. Keeps the start time of an episode already running.
    pub(crate) fn begin(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.last_tick_at = Some(now);
    }

    pub(crate) fn set_seek(&mut self, seek: TargetSeek) {
        debug_assert!(self.active.is_empty(), "seek while directions are held");
        self.seek = Some(seek);
    }

    /// Point an existing seek at a new target and restart its time window.
    pub(crate) fn retarget(&mut self, target: Vec3, heading: Vec3, now: Instant) {
        if let Some(seek) = self.seek.as_mut() {
            seek.target = target;
            seek.heading = heading;
            seek.last_axis_distances = None;
            self.started_at = Some(now);
            self.last_tick_at = Some(now);
        }
    }

    pub(crate) fn record_axis_distances(&mut self, dx: f32, dz: f32) {
        if let Some(seek) = self.seek.as_mut() {
            seek.last_axis_distances = Some((dx, dz));
        }
    }

    pub(crate) fn touch(&mut self, now: Instant) {
        self.last_tick_at = Some(now);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
