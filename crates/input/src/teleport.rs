//! VR teleport pointer. Lands the avatar by walking it, same as a desktop click.

use glam::Vec3;

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportEvent {
    pub destination: Vec3,
}

pub fn map_teleport(event: &TeleportEvent) -> Action {
    Action::MoveToTarget(event.destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teleport_is_move_to_target() {
        let event = TeleportEvent {
            destination: Vec3::new(1.0, 0.0, 4.0),
        };
        assert_eq!(map_teleport(&event), Action::MoveToTarget(event.destination));
    }
}
