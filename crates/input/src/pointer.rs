use glam::Vec3;

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// What the scene pick under the pointer hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub point: Vec3,
    /// Whether the picked mesh is walkable floor.
    pub on_floor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub button: PointerButton,
    pub phase: PointerPhase,
    pub pick: Option<PickHit>,
}

impl PointerInput {
    /// Primary-button release with the given pick result.
    pub fn click(pick: Option<PickHit>) -> Self {
        Self {
            button: PointerButton::Primary,
            phase: PointerPhase::Up,
            pick,
        }
    }
}

/// Click-to-move: a primary release over floor walks to the picked point.
pub fn map_pointer(input: &PointerInput) -> Option<Action> {
    if input.button != PointerButton::Primary || input.phase != PointerPhase::Up {
        return None;
    }
    match input.pick {
        Some(hit) if hit.on_floor => Some(Action::MoveToTarget(hit.point)),
        _ => None,
    }
}
