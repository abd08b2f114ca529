use std::collections::BTreeMap;

use serde::Serialize;

use crate::clip::ClipInfo;
use crate::improvise::{Disabled, Improviser};
use crate::rules::{AnimationRole, RoleRule};

/// Role bindings discovered for one avatar, plus the pool of unbound clips.
///
/// Built once by [`AnimationCatalog::discover`] and read-only afterwards.
#[derive(Debug)]
pub struct AnimationCatalog {
    clips: Vec<ClipInfo>,
    bindings: BTreeMap<AnimationRole, usize>,
    fallback: Vec<usize>,
    improviser: Box<dyn Improviser>,
}

/// Serializable view of a catalog, for logs and tooling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogReport {
    pub bindings: BTreeMap<AnimationRole, String>,
    pub fallback: Vec<String>,
}

impl AnimationCatalog {
    /// Scan `clips` once against `rules` and freeze the result.
    ///
    /// Clips are visited in order; for each clip every rule decides whether
    /// the clip takes over its role. Clips that match no rule at all form the
    /// fallback pool; a clip that matched but lost its role stays out of it.
    pub fn discover(clips: Vec<ClipInfo>, rules: &[RoleRule]) -> Self {
        let (bindings, fallback) = scan(&clips, rules);
        let catalog = Self {
            clips,
            bindings,
            fallback,
            improviser: Box::new(Disabled),
        };
        tracing::debug!(report = ?catalog.report(), "animations recognized");
        catalog
    }

    /// Replace the free-text strategy. Bindings are unaffected.
    pub fn with_improviser(mut self, improviser: impl Improviser + 'static) -> Self {
        self.improviser = Box::new(improviser);
        self
    }

    /// Clip bound to `role`, if any.
    pub fn clip(&self, role: AnimationRole) -> Option<&ClipInfo> {
        self.bindings.get(&role).map(|&i| &self.clips[i])
    }

    pub fn walk(&self) -> Option<&ClipInfo> {
        self.clip(AnimationRole::Walk)
    }

    pub fn idle(&self) -> Option<&ClipInfo> {
        self.clip(AnimationRole::Idle)
    }

    /// Whether the avatar has a clip with exactly this name.
    pub fn contains(&self, name: &str) -> bool {
        self.clips.iter().any(|c| c.name == name)
    }

    /// Every clip the avatar exposes, in provider order.
    pub fn clips(&self) -> &[ClipInfo] {
        &self.clips
    }

    /// Clips not bound to any role.
    pub fn fallback(&self) -> impl Iterator<Item = &ClipInfo> {
        self.fallback.iter().map(|&i| &self.clips[i])
    }

    /// Free-text lookup in the fallback pool through the configured strategy.
    pub fn resolve(&self, text: &str) -> Option<&ClipInfo> {
        let pool: Vec<&ClipInfo> = self.fallback().collect();
        self.improviser.resolve(text, &pool)
    }

    pub fn report(&self) -> CatalogReport {
        CatalogReport {
            bindings: self
                .bindings
                .iter()
                .map(|(role, &i)| (*role, self.clips[i].name.clone()))
                .collect(),
            fallback: self.fallback().map(|c| c.name.clone()).collect(),
        }
    }
}

fn scan(clips: &[ClipInfo], rules: &[RoleRule]) -> (BTreeMap<AnimationRole, usize>, Vec<usize>) {
    let rules: Vec<(AnimationRole, _)> = rules
        .iter()
        .map(|r| (r.role, r.rule.normalized()))
        .collect();
    let names: Vec<String> = clips.iter().map(|c| c.name.to_lowercase()).collect();

    let mut bindings = BTreeMap::new();
    let mut unmatched = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let mut matched = false;
        for (role, rule) in &rules {
            matched |= rule.matches(name);
            let bound = bindings.get(role).map(|&b: &usize| names[b].as_str());
            if rule.replaces(name, bound) {
                bindings.insert(*role, i);
            }
        }
        if !matched {
            unmatched.push(i);
        }
    }
    (bindings, unmatched)
}
