use crate::Key;

// Central mapping between enum variants and spec strings for shorthand/non-name specs.
// Entries here are emitted by `to_spec` and accepted verbatim by `from_spec`.
macro_rules! key_spec_map {
    ($m:ident, $arg:tt) => {
        $m! { $arg,
            Digit0 => "0",
            Digit1 => "1",
            Digit2 => "2",
            Digit3 => "3",
            Digit4 => "4",
            Digit5 => "5",
            Digit6 => "6",
            Digit7 => "7",
            Digit8 => "8",
            Digit9 => "9",
            Minus => "-",
            Equal => "=",
            LeftBracket => "[",
            RightBracket => "]",
            Backslash => "\\",
            Semicolon => ";",
            Quote => "'",
            Comma => ",",
            Period => ".",
            Slash => "/",
            Grave => "`",
            Escape => "esc",
            Control => "ctrl",
            Command => "cmd",
            PageUp => "page_up",
            PageDown => "page_down",
        }
    };
}

macro_rules! to_spec_match {
    ( $key:expr, $( $k:ident => $s:expr, )* ) => {
        match $key {
            $( Key::$k => $s, )*
            _ => $key.name(),
        }
    }
}

macro_rules! from_spec_match {
    ( $s:expr, $( $k:ident => $v:expr, )* ) => {{
        match $s {
            $( $v => Some(Key::$k), )*
            _ => None,
        }
    }}
}

// Aliases that only apply to parsing specs (not emitted by to_spec).
macro_rules! key_spec_aliases {
    ($m:ident, $arg:expr) => {
        $m! { $arg,
            // modifiers
            Control => "control",
            Alt => "opt",
            Alt => "option",
            Alt => "alt_l",
            Alt => "alt_r",
            Control => "ctrl_l",
            Control => "ctrl_r",
            Shift => "shift_l",
            Shift => "shift_r",
            Command => "command",
            Command => "cmd_l",
            Command => "cmd_r",
            Command => "super",
            Command => "win",
            Command => "meta",

            // enter/delete variants
            Enter => "return",
            Enter => "ret",
            Delete => "del",
            Escape => "escape",
            Space => " ",

            // spelled-out punctuation
            Backslash => "backslash",
            Comma => "comma",
            Period => "period",
            Slash => "slash",
            Minus => "minus",
            Equal => "equal",
            Semicolon => "semicolon",
            Quote => "quote",
            Grave => "grave",
            LeftBracket => "leftbracket",
            RightBracket => "rightbracket",

            // navigation
            PageUp => "pgup",
            PageDown => "pgdn",
        }
    };
}

/// Parses a key specification into a `Key`.
///
/// First tries a case-insensitive enum name (via `Key::from_name`). If that
/// fails, falls back to the shorthand specs defined in `key_spec_map`, then to
/// the parse-only aliases.
pub fn from_spec(s: &str) -> Option<Key> {
    if let Some(k) = Key::from_name(s) {
        return Some(k);
    }
    if let some @ Some(_) = key_spec_map!(from_spec_match, s) {
        return some;
    }
    let lowered = s.to_ascii_lowercase();
    let lowered = lowered.as_str();
    if let some @ Some(_) = key_spec_map!(from_spec_match, lowered) {
        return some;
    }
    key_spec_aliases!(from_spec_match, lowered)
}

/// Returns the key specification string for a `Key`.
///
/// Uses the shorthand map first (digits, punctuation, short modifier names),
/// then falls back to the lowercased enum variant name.
pub fn to_spec(key: Key) -> String {
    let s = key_spec_map!(to_spec_match, key);
    s.to_ascii_lowercase()
}

impl Key {
    /// Parses a key specification string into a `Key`.
    ///
    /// - Accepts enum variant names case-insensitively (`a`, `F5`, `PageUp`).
    /// - Accepts symbol shorthands for digits and punctuation.
    /// - Accepts common alias words: esc, ctrl, opt, cmd, super, return,
    ///   del, pgup, pgdn and similar. Returns `None` if nothing matches.
    pub fn from_spec(s: &str) -> Option<Self> {
        from_spec(s)
    }

    /// Returns the key specification string for this `Key`.
    pub fn to_spec(self) -> String {
        to_spec(self)
    }
}
