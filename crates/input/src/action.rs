use embody_common::Direction;
use glam::Vec3;

/// A locomotion request that any input source (keyboard, pointer, VR) can produce.
///
/// The orchestrator consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Start holding a direction.
    AddDirection(Direction),
    /// Release a held direction.
    RemoveDirection(Direction),
    /// Walk in a straight line to a world-space point.
    MoveToTarget(Vec3),
    /// Stop and idle.
    Stop,
}

impl Action {
    /// The direction this action presses or releases, if any.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::AddDirection(d) | Action::RemoveDirection(d) => Some(*d),
            Action::MoveToTarget(_) | Action::Stop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_of_key_actions() {
        assert_eq!(
            Action::AddDirection(Direction::Up).direction(),
            Some(Direction::Up)
        );
        assert_eq!(
            Action::RemoveDirection(Direction::Back).direction(),
            Some(Direction::Back)
        );
    }

    #[test]
    fn non_key_actions_have_no_direction() {
        assert_eq!(Action::MoveToTarget(Vec3::ONE).direction(), None);
        assert_eq!(Action::Stop.direction(), None);
    }
}
