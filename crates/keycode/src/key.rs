use std::fmt;

/// Declares the `Key` enum together with its canonical variant names.
macro_rules! define_keys {
    ( $( $variant:ident, )* ) => {
        /// Abstract identity of a physical key.
        ///
        /// Variants are layout-independent names. Modifier keys do not
        /// distinguish left and right sides.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[allow(missing_docs)]
        pub enum Key {
            $( $variant, )*
        }

        impl Key {
            /// Every key identity, in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )* ];

            /// Returns the enum variant name (e.g. `"PageUp"`).
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                }
            }

            /// Looks up a key by its variant name, ignoring ASCII case.
            pub fn from_name(s: &str) -> Option<Self> {
                $(
                    if s.eq_ignore_ascii_case(stringify!($variant)) {
                        return Some(Self::$variant);
                    }
                )*
                None
            }
        }
    };
}

define_keys! {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Space,
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Minus,
    Equal,
    Grave,
    LeftBracket,
    RightBracket,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Backslash,
    Control,
    Alt,
    Shift,
    Command,
}

impl Key {
    /// True for keys that act as combination modifiers.
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::Control | Self::Alt | Self::Shift | Self::Command)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Key::from_name("pageup"), Some(Key::PageUp));
        assert_eq!(Key::from_name("DIGIT7"), Some(Key::Digit7));
        assert_eq!(Key::from_name("nope"), None);
    }

    #[test]
    fn modifier_classification() {
        let mods: Vec<Key> = Key::ALL.iter().copied().filter(|k| k.is_modifier()).collect();
        assert_eq!(mods, vec![Key::Control, Key::Alt, Key::Shift, Key::Command]);
    }
}
