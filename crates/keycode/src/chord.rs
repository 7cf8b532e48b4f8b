use std::{collections::BTreeSet, fmt, iter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Key, Modifier};

/// Error returned when a combination string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid key combination '{0}'")]
pub struct ChordParseError(pub String);

/// A key combination: a set of modifiers plus a single non-modifier key.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Chord {
    /// Set of modifier keys held down for this combination.
    pub modifiers: BTreeSet<Modifier>,
    /// The non-modifier key that completes the combination.
    pub key: Key,
}

impl Chord {
    /// Build a combination from parts.
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: Key) -> Self {
        Self {
            modifiers: modifiers.into_iter().collect(),
            key,
        }
    }

    /// Parses a combination specification such as `"<ctrl>+<alt>+1"`.
    ///
    /// - Case-insensitive for both modifiers and the key.
    /// - Components are separated by `+`; the last component is the key and
    ///   every earlier component must be a modifier.
    /// - Any component may be wrapped in angle brackets (`<ctrl>`, `<f5>`).
    /// - The final key must not itself be a modifier.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key_raw = parts.pop()?;
        let key = Key::from_spec(unwrap_component(key_raw)?)?;
        if key.is_modifier() {
            return None;
        }
        let mut modifiers = BTreeSet::new();
        for part in parts {
            modifiers.insert(Modifier::from_spec(unwrap_component(part)?)?);
        }
        Some(Self { modifiers, key })
    }

    /// All keys that must be held for this combination, modifiers first.
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.modifiers
            .iter()
            .map(|m| Key::from(*m))
            .chain(iter::once(self.key))
    }

    /// True if `key` is one of the keys of this combination.
    pub fn contains(&self, key: Key) -> bool {
        self.key == key || Modifier::try_from(key).is_ok_and(|m| self.modifiers.contains(&m))
    }

    /// Returns the canonical string form, e.g. `<ctrl>+<alt>+1`.
    ///
    /// Modifiers appear in canonical order (ctrl, alt, shift, cmd). Keys whose
    /// spec is longer than one character are wrapped in angle brackets.
    pub fn to_string_canonical(&self) -> String {
        let mut out: Vec<String> = self
            .modifiers
            .iter()
            .map(|m| format!("<{}>", m.to_spec()))
            .collect();
        let spec = self.key.to_spec();
        if spec.chars().count() > 1 {
            out.push(format!("<{spec}>"));
        } else {
            out.push(spec);
        }
        out.join("+")
    }
}

/// Strip optional angle brackets from a combination component.
fn unwrap_component(part: &str) -> Option<&str> {
    let inner = match part.strip_prefix('<') {
        Some(rest) => rest.strip_suffix('>')?,
        None => part,
    };
    (!inner.is_empty()).then_some(inner)
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}

impl TryFrom<String> for Chord {
    type Error = ChordParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ChordParseError(value))
    }
}

impl From<Chord> for String {
    fn from(c: Chord) -> Self {
        c.to_string_canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bracketed_chord() {
        let c = Chord::parse("<ctrl>+<alt>+1").expect("parse");
        assert!(c.modifiers.contains(&Modifier::Control));
        assert!(c.modifiers.contains(&Modifier::Alt));
        assert_eq!(c.key, Key::Digit1);
        assert_eq!(c.to_string(), "<ctrl>+<alt>+1");
    }

    #[test]
    fn parse_is_case_and_space_insensitive() {
        let a = Chord::parse("<CTRL> + <ALT> + C").expect("parse");
        let b = Chord::parse("alt+ctrl+c").expect("parse");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "<ctrl>+<alt>+c");
    }

    #[test]
    fn named_keys_are_bracketed() {
        let c = Chord::parse("shift+f5").expect("parse");
        assert_eq!(c.to_string(), "<shift>+<f5>");
        let c = Chord::parse("<cmd>+<space>").expect("parse");
        assert_eq!(c.key, Key::Space);
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(Chord::parse(""), None);
        assert_eq!(Chord::parse("ctrl+"), None);
        assert_eq!(Chord::parse("a+b"), None);
        assert_eq!(Chord::parse("<ctrl>+<shift>"), None);
        assert_eq!(Chord::parse("<>+a"), None);
        assert_eq!(Chord::parse("ctrl>+a"), None);
        assert_eq!(Chord::parse("<ctrl>+<bogus>"), None);
    }

    #[test]
    fn punctuation_keys() {
        let c = Chord::parse("ctrl+,").expect("parse");
        assert_eq!(c.key, Key::Comma);
        assert_eq!(c.to_string(), "<ctrl>+,");
        let c = Chord::parse("<alt>+/").expect("parse");
        assert_eq!(c.key, Key::Slash);
    }

    #[test]
    fn keys_and_contains() {
        let c = Chord::parse("<ctrl>+<alt>+a").expect("parse");
        let keys: Vec<Key> = c.keys().collect();
        assert_eq!(keys, vec![Key::Control, Key::Alt, Key::A]);
        assert!(c.contains(Key::Alt));
        assert!(!c.contains(Key::Shift));
    }

    #[test]
    fn roundtrip_through_string() {
        for s in ["<ctrl>+<alt>+1", "cmd+shift+k", "<esc>", "page_down"] {
            let c = Chord::parse(s).expect("parse");
            let back = Chord::parse(&c.to_string()).expect("reparse");
            assert_eq!(c, back, "idempotent for {s}");
        }
    }
}
