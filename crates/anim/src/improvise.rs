use std::fmt;

use crate::clip::ClipInfo;

/// Strategy for picking an ad-hoc clip from free text (e.g. a chat line).
///
/// Kept apart from the movement state machine; callers must treat `None` as
/// the normal answer.
pub trait Improviser: fmt::Debug {
    fn resolve<'a>(&self, text: &str, pool: &[&'a ClipInfo]) -> Option<&'a ClipInfo>;
}

/// Never improvises. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disabled;

impl Improviser for Disabled {
    fn resolve<'a>(&self, _text: &str, _pool: &[&'a ClipInfo]) -> Option<&'a ClipInfo> {
        None
    }
}

/// Picks the first pooled clip whose name contains a word of the text.
///
/// Words are whitespace separated and lower-cased; single-character words are
/// skipped. Words are tried in order, so earlier words win.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordMatch;

impl Improviser for WordMatch {
    fn resolve<'a>(&self, text: &str, pool: &[&'a ClipInfo]) -> Option<&'a ClipInfo> {
        text.split_whitespace()
            .filter(|w| w.chars().count() > 1)
            .map(str::to_lowercase)
            .find_map(|word| {
                pool.iter()
                    .copied()
                    .find(|clip| clip.name.to_lowercase().contains(&word))
            })
    }
}
