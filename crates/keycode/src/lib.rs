//! keycode: Abstract key identities and combination specs for hotcue.
//!
//! - `Key`: Enum of the key identities the platform layer reports. Platform
//!   hooks normalize their native codes into this set before events reach the
//!   engine.
//! - `Modifier`: The subset of keys that participate in combinations as
//!   modifiers, with conversions to/from `Key`.
//! - `Chord`: A key combination (set of modifiers plus one key), parsed from
//!   the `<ctrl>+<alt>+1` syntax used in configuration files.
//! - Spec helpers: `Key::from_spec`, `Key::to_spec`, and
//!   `Modifier::from_spec`, `Modifier::to_spec`.

mod key;
pub use key::Key;

mod spec;

mod modifiers;
pub use modifiers::Modifier;

mod chord;
pub use chord::{Chord, ChordParseError};
