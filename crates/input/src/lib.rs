//! Input mapping: raw keyboard, pointer and VR events become locomotion actions.
//!
//! # Invariants
//! - Desktop and VR produce the same [`Action`] values.
//! - The `vr` feature only adds a mapping; it never forks movement logic.
//! - Mapping is pure. Nothing here touches the avatar.

pub mod action;
pub mod keymap;
pub mod pointer;
#[cfg(feature = "vr")]
pub mod teleport;

pub use action::Action;
pub use keymap::{KeyBindings, KeyInput, KeyState};
pub use pointer::{PickHit, PointerButton, PointerInput, PointerPhase, map_pointer};
#[cfg(feature = "vr")]
pub use teleport::{TeleportEvent, map_teleport};

pub fn crate_info() -> &'static str {
    "embody-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
