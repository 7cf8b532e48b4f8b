use std::convert::TryFrom;

use crate::Key;

/// Modifier keys that can be part of a combination.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[allow(missing_docs)]
pub enum Modifier {
    Control,
    Alt,
    Shift,
    Command,
}

impl From<Modifier> for Key {
    fn from(m: Modifier) -> Self {
        match m {
            Modifier::Control => Self::Control,
            Modifier::Alt => Self::Alt,
            Modifier::Shift => Self::Shift,
            Modifier::Command => Self::Command,
        }
    }
}

impl TryFrom<Key> for Modifier {
    type Error = ();
    fn try_from(k: Key) -> Result<Self, Self::Error> {
        match k {
            Key::Control => Ok(Self::Control),
            Key::Alt => Ok(Self::Alt),
            Key::Shift => Ok(Self::Shift),
            Key::Command => Ok(Self::Command),
            _ => Err(()),
        }
    }
}

impl Modifier {
    /// Parses a modifier specification string via key specs, then converts.
    ///
    /// Accepts everything `Key::from_spec` accepts; fails if the parsed key is
    /// not a modifier.
    pub fn from_spec(s: &str) -> Option<Self> {
        Key::from_spec(s).and_then(|k| Self::try_from(k).ok())
    }

    /// Returns the canonical spec string for this modifier (`ctrl`, `alt`,
    /// `shift`, `cmd`).
    pub fn to_spec(self) -> String {
        Key::from(self).to_spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_modifiers() {
        let mods = [
            Modifier::Control,
            Modifier::Alt,
            Modifier::Shift,
            Modifier::Command,
        ];
        for m in mods {
            let k: Key = m.into();
            let back = Modifier::try_from(k).expect("should map back");
            assert_eq!(m, back);
        }
        assert!(Modifier::try_from(Key::A).is_err());
    }

    #[test]
    fn modifier_specs() {
        assert_eq!(Modifier::from_spec("ctrl"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("control"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("option"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_spec("cmd"), Some(Modifier::Command));
        assert_eq!(Modifier::from_spec("a"), None);

        assert_eq!(Modifier::Control.to_spec(), "ctrl");
        assert_eq!(Modifier::Command.to_spec(), "cmd");
        assert_eq!(Modifier::Shift.to_spec(), "shift");
    }
}
