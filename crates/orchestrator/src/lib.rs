//! Embodiment: switches avatar locomotion on and off with the active camera.
//!
//! The orchestrator owns a [`LocomotionController`](embody_locomotion::LocomotionController)
//! and wires it to input, the frame tick, an idle timer and a network sink
//! while the third-person view is active.
//!
//! # Invariants
//! - Input, frame and idle callbacks only act while their subscription is live.
//! - Leaving third person or disposing leaves no live subscription behind.
//! - An animation is forwarded only if the avatar has it, the sink is online,
//!   and it differs from the last forwarded one.
//! - The idle timer fires at most once per arming.

pub mod config;
pub mod idle;
pub mod network;
pub mod orchestrator;
pub mod scheduler;

pub use config::{ConfigError, EmbodimentConfig};
pub use idle::IdleTimer;
pub use network::{AnimationEvent, NetworkSink, NotificationFilter, RecordingSink};
pub use orchestrator::{EmbodimentOrchestrator, EmbodimentState, LocalChange};
pub use scheduler::{Channel, LocalScheduler, Scheduler, Subscription, SubscriptionId};

pub fn crate_info() -> &'static str {
    "embody-orchestrator v0.1.0"
}
