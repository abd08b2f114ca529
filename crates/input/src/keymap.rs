use std::collections::BTreeMap;

use embody_common::Direction;
use serde::{Deserialize, Serialize};

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyState {
    Down,
    Up,
}

/// A key event as reported by the host, keyed by its `key` string
/// (`"w"`, `"ArrowUp"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub state: KeyState,
}

impl KeyInput {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: KeyState::Down,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: KeyState::Up,
        }
    }
}

/// Key string to direction table. Matching is exact, so upper and lower
/// case letters are bound separately.
///
/// Deserializing replaces the whole table; unlisted keys are unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<String, Direction>,
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, key: impl Into<String>, direction: Direction) -> &mut Self {
        self.keys.insert(key.into(), direction);
        self
    }

    pub fn unbind(&mut self, key: &str) -> Option<Direction> {
        self.keys.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<Direction> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.keys.iter().map(|(k, d)| (k.as_str(), *d))
    }

    /// Key-down presses the bound direction, key-up releases it.
    pub fn map(&self, input: &KeyInput) -> Option<Action> {
        let Some(direction) = self.get(&input.key) else {
            tracing::trace!(key = %input.key, "unbound key");
            return None;
        };
        Some(match input.state {
            KeyState::Down => Action::AddDirection(direction),
            KeyState::Up => Action::RemoveDirection(direction),
        })
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (keys, direction) in [
            (["a", "A", "ArrowLeft"], Direction::Left),
            (["d", "D", "ArrowRight"], Direction::Right),
            (["w", "W", "ArrowUp"], Direction::Forward),
            (["s", "S", "ArrowDown"], Direction::Back),
        ] {
            for key in keys {
                bindings.bind(key, direction);
            }
        }
        bindings.bind("PageUp", Direction::Up).bind(" ", Direction::Up);
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let keys = KeyBindings::default();
        assert_eq!(keys.len(), 14);
        assert_eq!(keys.get("a"), Some(Direction::Left));
        assert_eq!(keys.get("D"), Some(Direction::Right));
        assert_eq!(keys.get("ArrowUp"), Some(Direction::Forward));
        assert_eq!(keys.get("s"), Some(Direction::Back));
        assert_eq!(keys.get(" "), Some(Direction::Up));
        assert_eq!(keys.get("PageUp"), Some(Direction::Up));
        assert_eq!(keys.get("q"), None);
    }

    #[test]
    fn down_adds_up_removes() {
        let keys = KeyBindings::default();
        assert_eq!(
            keys.map(&KeyInput::down("w")),
            Some(Action::AddDirection(Direction::Forward))
        );
        assert_eq!(
            keys.map(&KeyInput::up("W")),
            Some(Action::RemoveDirection(Direction::Forward))
        );
        assert_eq!(keys.map(&KeyInput::down("Escape")), None);
    }

    #[test]
    fn rebinding() {
        let mut keys = KeyBindings::default();
        keys.bind("j", Direction::Left);
        assert_eq!(keys.unbind("a"), Some(Direction::Left));
        assert_eq!(keys.get("a"), None);
        assert_eq!(keys.get("j"), Some(Direction::Left));
    }

    #[test]
    fn yaml_table_replaces_defaults() {
        let keys: KeyBindings = serde_yaml::from_str("h: left\nl: right\n").unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get("h"), Some(Direction::Left));
        assert_eq!(keys.get("w"), None);
    }
}
