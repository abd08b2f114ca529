//! Animation catalog: binds semantic motion roles to whatever clips an avatar ships with.
//!
//! Clip names are arbitrary, so roles are found by substring heuristics. The
//! scan runs once when the avatar is attached and yields a plain role-to-clip
//! mapping; unbound clips form a pool for free-text lookup.
//!
//! # Invariants
//! - Each role is bound to at most one clip; bindings never change after discovery.
//! - Discovery is deterministic for a given clip order and rule set.
//! - Free-text lookup is opt-in and may return nothing even with a populated pool.

mod catalog;
mod clip;
mod improvise;
mod rules;

pub use catalog::{AnimationCatalog, CatalogReport};
pub use clip::ClipInfo;
pub use improvise::{Disabled, Improviser, WordMatch};
pub use rules::{
    default_rules, validate_rules, AnimationRole, MatchRule, RoleRule, RuleError, TieBreak,
};

pub fn crate_info() -> &'static str {
    "embody-anim v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("anim"));
    }
}
