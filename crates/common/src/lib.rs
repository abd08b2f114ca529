//! Shared types for avatar locomotion and embodiment.
//!
//! # Invariants
//! - Direction vectors are fixed per direction; summing a set of them is
//!   order-independent.
//! - Time is always read through a [`Clock`] so callers and tests control it.

pub mod clock;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{Direction, FirstPersonPose, UnknownDirection, ViewMode};

pub fn crate_info() -> &'static str {
    "embody-common v0.1.0"
}
