//! Developer tooling: read-only views of locomotion state for logs and the CLI.
//!
//! # Invariants
//! - Inspection never mutates the controller.

pub mod inspector;

pub use inspector::{LocomotionInspector, LocomotionSummary};

pub fn crate_info() -> &'static str {
    "embody-tools v0.1.0"
}
