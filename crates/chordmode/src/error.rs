use config::ShortcutId;
use keycode::Chord;
use thiserror::Error;

/// Error building a shortcut table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TableError {
    /// A shortcut has no sound and no overlay.
    #[error("Shortcut {id} has neither a sound nor an overlay")]
    NoAction { id: ShortcutId },
    /// A suffix sequence with no keys.
    #[error("Shortcut {id} has an empty suffix sequence")]
    EmptySuffix { id: ShortcutId },
    /// Two shortcuts share a direct hotkey.
    #[error("Hotkey {chord} is declared by both shortcut {first} and shortcut {second}")]
    DuplicateHotkey {
        chord: Chord,
        first: ShortcutId,
        second: ShortcutId,
    },
    /// Two shortcuts share a suffix sequence.
    #[error("Suffix '{suffix}' is declared by both shortcut {first} and shortcut {second}")]
    DuplicateSuffix {
        suffix: String,
        first: ShortcutId,
        second: ShortcutId,
    },
    /// Two shortcuts share an id.
    #[error("Shortcut id {id} is used more than once")]
    DuplicateId { id: ShortcutId },
}
