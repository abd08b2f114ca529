use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic motion category the locomotion controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationRole {
    Walk,
    WalkLeft,
    WalkRight,
    WalkBack,
    Idle,
    Run,
}

impl AnimationRole {
    pub const ALL: [AnimationRole; 6] = [
        AnimationRole::Walk,
        AnimationRole::WalkLeft,
        AnimationRole::WalkRight,
        AnimationRole::WalkBack,
        AnimationRole::Idle,
        AnimationRole::Run,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::WalkLeft => "walkLeft",
            Self::WalkRight => "walkRight",
            Self::WalkBack => "walkBack",
            Self::Idle => "idle",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for AnimationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// How a later match competes with an existing binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// A shorter name wins.
    ShortestName,
    /// Only a name carrying the preferred substring wins.
    #[default]
    PreferredSubstring,
}

/// Substring heuristic deciding which clip a role binds to.
///
/// All substrings are compared against the lower-cased clip name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    pub required: String,
    #[serde(default)]
    pub preferred: Option<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl MatchRule {
    pub fn new(required: impl Into<String>) -> Self {
        Self {
            required: required.into(),
            preferred: None,
            avoid: Vec::new(),
            tie_break: TieBreak::PreferredSubstring,
        }
    }

    pub fn prefer(mut self, preferred: impl Into<String>) -> Self {
        self.preferred = Some(preferred.into());
        self
    }

    pub fn avoiding(mut self, words: &[&str]) -> Self {
        self.avoid.extend(words.iter().map(|w| w.to_string()));
        self
    }

    pub fn shortest(mut self) -> Self {
        self.tie_break = TieBreak::ShortestName;
        self
    }

    /// Copy of the rule with every substring lower-cased.
    pub fn normalized(&self) -> Self {
        Self {
            required: self.required.to_lowercase(),
            preferred: self.preferred.as_ref().map(|p| p.to_lowercase()),
            avoid: self.avoid.iter().map(|w| w.to_lowercase()).collect(),
            tie_break: self.tie_break,
        }
    }

    /// Whether `name` (lower-cased) carries the required substring.
    pub fn matches(&self, name: &str) -> bool {
        name.contains(self.required.as_str())
    }

    /// Whether `candidate` takes the role away from the currently `bound` clip.
    ///
    /// Both names are lower-cased. An avoided word in the candidate vetoes the
    /// decision regardless of what the tie-break said.
    pub fn replaces(&self, candidate: &str, bound: Option<&str>) -> bool {
        if !self.matches(candidate) {
            return false;
        }
        let replace = match bound {
            None => true,
            Some(bound) => {
                let preferred = self
                    .preferred
                    .as_deref()
                    .is_some_and(|p| candidate.contains(p) && !bound.contains(p));
                let shorter =
                    self.tie_break == TieBreak::ShortestName && candidate.len() < bound.len();
                preferred || shorter
            }
        };
        let vetoed = self.avoid.iter().any(|w| candidate.contains(w.as_str()));
        replace && !vetoed
    }
}

/// A rule paired with the role it fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    pub role: AnimationRole,
    #[serde(flatten)]
    pub rule: MatchRule,
}

impl RoleRule {
    pub fn new(role: AnimationRole, rule: MatchRule) -> Self {
        Self { role, rule }
    }
}

/// Errors from rule validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule for {0} has an empty required substring")]
    EmptyRequired(AnimationRole),
    #[error("role {0} has more than one rule")]
    DuplicateRole(AnimationRole),
}

/// Check a rule set before discovery.
pub fn validate_rules(rules: &[RoleRule]) -> Result<(), RuleError> {
    let mut seen = BTreeSet::new();
    for r in rules {
        if r.rule.required.trim().is_empty() {
            return Err(RuleError::EmptyRequired(r.role));
        }
        if !seen.insert(r.role) {
            return Err(RuleError::DuplicateRole(r.role));
        }
    }
    Ok(())
}

/// Rules that recognize the common clip naming schemes.
pub fn default_rules() -> Vec<RoleRule> {
    vec![
        RoleRule::new(
            AnimationRole::Walk,
            MatchRule::new("walk")
                .prefer("place")
                .avoiding(&["left", "right", "back"]),
        ),
        RoleRule::new(AnimationRole::WalkLeft, MatchRule::new("walk").prefer("left")),
        RoleRule::new(AnimationRole::WalkRight, MatchRule::new("walk").prefer("right")),
        RoleRule::new(AnimationRole::WalkBack, MatchRule::new("walk").prefer("back")),
        RoleRule::new(AnimationRole::Idle, MatchRule::new("idle").shortest()),
        RoleRule::new(AnimationRole::Run, MatchRule::new("run").shortest()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_binds() {
        let rule = MatchRule::new("idle").shortest();
        assert!(rule.replaces("idle_long", None));
        assert!(!rule.replaces("walk", None));
    }

    #[test]
    fn shortest_name_replaces() {
        let rule = MatchRule::new("idle").shortest();
        assert!(rule.replaces("idle", Some("idle_long")));
        assert!(!rule.replaces("idle_longer", Some("idle_long")));
    }

    #[test]
    fn preferred_substring_replaces_only_when_new() {
        let rule = MatchRule::new("walk").prefer("left");
        assert!(rule.replaces("walk_left", Some("walk")));
        assert!(!rule.replaces("walk_left_fast", Some("walk_left")));
        assert!(!rule.replaces("walk_slow", Some("walk")));
    }

    #[test]
    fn avoid_vetoes_even_first_match() {
        let rule = MatchRule::new("walk").avoiding(&["left"]);
        assert!(!rule.replaces("walk_left", None));
    }

    #[test]
    fn normalized_lowercases_everything() {
        let rule = MatchRule::new("WALK").prefer("Place").avoiding(&["LEFT"]);
        let n = rule.normalized();
        assert_eq!(n.required, "walk");
        assert_eq!(n.preferred.as_deref(), Some("place"));
        assert_eq!(n.avoid, vec!["left".to_string()]);
    }

    #[test]
    fn default_rules_are_valid() {
        let rules = default_rules();
        assert_eq!(rules.len(), AnimationRole::ALL.len());
        assert_eq!(validate_rules(&rules), Ok(()));
    }

    #[test]
    fn validation_rejects_duplicates_and_empty() {
        let dup = vec![
            RoleRule::new(AnimationRole::Idle, MatchRule::new("idle")),
            RoleRule::new(AnimationRole::Idle, MatchRule::new("rest")),
        ];
        assert_eq!(
            validate_rules(&dup),
            Err(RuleError::DuplicateRole(AnimationRole::Idle))
        );

        let empty = vec![RoleRule::new(AnimationRole::Run, MatchRule::new("  "))];
        assert_eq!(
            validate_rules(&empty),
            Err(RuleError::EmptyRequired(AnimationRole::Run))
        );
    }

    #[test]
    fn role_rule_deserializes_flat() {
        let json = r#"{"role":"walkLeft","required":"walk","preferred":"left"}"#;
        let rule: RoleRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.role, AnimationRole::WalkLeft);
        assert_eq!(rule.rule.tie_break, TieBreak::PreferredSubstring);
        assert!(rule.rule.avoid.is_empty());
    }
}
