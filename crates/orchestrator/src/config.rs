use std::path::Path;
use std::time::Duration;

use embody_anim::{AnimationCatalog, ClipInfo, RoleRule, RuleError, WordMatch, default_rules, validate_rules};
use embody_input::KeyBindings;
use embody_locomotion::LocomotionConfig;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating an [`EmbodimentConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid role rules: {0}")]
    Rule(#[from] RuleError),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything needed to embody one avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbodimentConfig {
    /// Quiet period after which the idle animation is announced.
    pub idle_timeout_ms: u64,
    /// Enable free-text animation lookup.
    pub improvise: bool,
    pub locomotion: LocomotionConfig,
    pub roles: Vec<RoleRule>,
    pub keys: KeyBindings,
}

impl Default for EmbodimentConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 200,
            improvise: false,
            locomotion: LocomotionConfig::default(),
            roles: default_rules(),
            keys: KeyBindings::default(),
        }
    }
}

impl EmbodimentConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        tracing::debug!(path = %path.display(), "loaded embodiment config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout_ms == 0 {
            return Err(invalid("idle_timeout_ms", "must be positive"));
        }
        let loco = &self.locomotion;
        if loco.movement_timeout_ms == 0 {
            return Err(invalid("locomotion.movement_timeout_ms", "must be positive"));
        }
        if !(loco.arrival_tolerance > 0.0) {
            return Err(invalid(
                "locomotion.arrival_tolerance",
                format!("must be positive, got {}", loco.arrival_tolerance),
            ));
        }
        if !(loco.unit_conversion > 0.0) {
            return Err(invalid(
                "locomotion.unit_conversion",
                format!("must be positive, got {}", loco.unit_conversion),
            ));
        }
        if !(loco.default_playback_rate > 0.0) {
            return Err(invalid(
                "locomotion.default_playback_rate",
                format!("must be positive, got {}", loco.default_playback_rate),
            ));
        }
        if loco.left_effector.is_empty() || loco.right_effector.is_empty() {
            return Err(invalid("locomotion effectors", "names must not be empty"));
        }
        validate_rules(&self.roles)?;
        Ok(())
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Run role discovery over `clips` with the configured rules.
    pub fn build_catalog(&self, clips: Vec<ClipInfo>) -> AnimationCatalog {
        let catalog = AnimationCatalog::discover(clips, &self.roles);
        if self.improvise {
            catalog.with_improviser(WordMatch)
        } else {
            catalog
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embody_anim::{AnimationRole, MatchRule};
    use embody_common::Direction;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EmbodimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.idle_timeout(), Duration::from_millis(200));
        assert!(!config.improvise);
        assert_eq!(config.roles.len(), 6);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = EmbodimentConfig::from_yaml_str(
            "idle_timeout_ms: 350\nlocomotion:\n  arrival_tolerance: 0.5\n  gravity: [0.0, -1.0, 0.0]\n",
        )
        .unwrap();
        assert_eq!(config.idle_timeout_ms, 350);
        assert_eq!(config.locomotion.arrival_tolerance, 0.5);
        assert_eq!(config.locomotion.gravity, glam::Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(config.locomotion.movement_timeout_ms, 5000);
        assert_eq!(config.keys, KeyBindings::default());
    }

    #[test]
    fn yaml_roles_and_keys() {
        let yaml = r#"
roles:
  - role: walk
    required: stroll
  - role: idle
    required: rest
    tie_break: shortest-name
keys:
  k: forward
"#;
        let config = EmbodimentConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.roles[0], RoleRule::new(AnimationRole::Walk, MatchRule::new("stroll")));
        assert_eq!(config.roles[1].rule, MatchRule::new("rest").shortest());
        assert_eq!(config.keys.get("k"), Some(Direction::Forward));
        assert_eq!(config.keys.len(), 1);
    }

    #[test]
    fn rejects_bad_values() {
        let err = EmbodimentConfig::from_yaml_str("idle_timeout_ms: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "idle_timeout_ms", .. }));

        let err =
            EmbodimentConfig::from_yaml_str("locomotion:\n  unit_conversion: -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = EmbodimentConfig::from_yaml_str(
            "roles:\n  - role: run\n    required: run\n  - role: run\n    required: sprint\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Rule(RuleError::DuplicateRole(AnimationRole::Run))));
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        assert!(matches!(
            EmbodimentConfig::from_yaml_str("idle_timeout_ms: [").unwrap_err(),
            ConfigError::Yaml(_)
        ));
        assert!(matches!(
            EmbodimentConfig::from_json_str("{").unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("embody.json");
        let mut f = std::fs::File::create(&json_path).unwrap();
        write!(f, r#"{{"improvise": true, "idle_timeout_ms": 100}}"#).unwrap();
        let config = EmbodimentConfig::load(&json_path).unwrap();
        assert!(config.improvise);
        assert_eq!(config.idle_timeout_ms, 100);

        let yaml_path = dir.path().join("embody.yaml");
        std::fs::write(&yaml_path, "improvise: true\n").unwrap();
        assert!(EmbodimentConfig::load(&yaml_path).unwrap().improvise);

        assert!(matches!(
            EmbodimentConfig::load(dir.path().join("missing.yaml")).unwrap_err(),
            ConfigError::Io(_)
        ));
    }

    #[test]
    fn build_catalog_installs_improviser_when_enabled() {
        let clips = || vec![ClipInfo::new("idle", 1.0), ClipInfo::new("Dance_Salsa", 2.0)];

        let plain = EmbodimentConfig::default().build_catalog(clips());
        assert!(plain.resolve("let us dance").is_none());

        let config = EmbodimentConfig {
            improvise: true,
            ..EmbodimentConfig::default()
        };
        let catalog = config.build_catalog(clips());
        assert_eq!(catalog.resolve("let us dance").map(|c| c.name.as_str()), Some("Dance_Salsa"));
        assert_eq!(catalog.idle().map(|c| c.name.as_str()), Some("idle"));
    }
}
