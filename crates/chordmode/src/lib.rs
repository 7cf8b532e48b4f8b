//! Shortcut matching for hotcue: the immutable [`ShortcutTable`] and the chord
//! [`State`] machine that turns key events into [`Trigger`]s.
//!
//! Everything here is synchronous and clock-free. Time only enters through
//! the timestamps carried by [`KeyEvent`]s and the `now_ms` passed to
//! [`State::expire`], so callers can drive the machine deterministically.

mod error;
mod event;
mod held;
mod state;
mod table;


pub use config::{
    ActionSpec, ActivatorMode, ActivatorSpec, Model, OverlaySpec, ShortcutId, ShortcutSpec,
    TriggerSpec,
};
pub use error::TableError;
pub use event::KeyEvent;
pub use held::HeldKeys;
pub use state::{ChordState, DisarmReason, KeyResponse, Phase, State, Step, Trigger};
pub use table::{MIN_TIMEOUT_MS, ShortcutTable, SuffixLookup};
