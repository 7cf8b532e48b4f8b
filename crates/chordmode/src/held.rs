use std::collections::BTreeSet;

use keycode::{Chord, Key, Modifier};

/// Tracks which keys are held down so combinations complete once per press.
#[derive(Debug, Default, Clone)]
pub struct HeldKeys {
    /// Keys down, including modifiers.
    held: BTreeSet<Key>,
}

impl HeldKeys {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return true if the key is currently considered down.
    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Record a key down; returns true for the first down, false for repeats.
    pub fn on_key_down(&mut self, key: Key) -> bool {
        self.held.insert(key)
    }

    /// Record a key up; returns true if the key was held.
    pub fn on_key_up(&mut self, key: Key) -> bool {
        self.held.remove(&key)
    }

    /// Modifiers currently held.
    pub fn modifiers(&self) -> BTreeSet<Modifier> {
        self.held
            .iter()
            .filter_map(|k| Modifier::try_from(*k).ok())
            .collect()
    }

    /// True if pressing `pressed` completes `chord`.
    ///
    /// The pressed key must belong to the chord, every chord key must be held,
    /// and the held modifiers must equal the chord's modifiers exactly. Extra
    /// held non-modifier keys do not prevent completion.
    pub fn completes(&self, chord: &Chord, pressed: Key) -> bool {
        chord.contains(pressed)
            && chord.keys().all(|k| self.held.contains(&k))
            && self.modifiers() == chord.modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(s: &str) -> Chord {
        Chord::parse(s).expect("chord")
    }

    #[test]
    fn repeats_are_reported() {
        let mut h = HeldKeys::new();
        assert!(h.on_key_down(Key::A));
        assert!(!h.on_key_down(Key::A));
        assert!(h.on_key_up(Key::A));
        assert!(!h.on_key_up(Key::A));
        assert!(h.is_empty());
    }

    #[test]
    fn completion_in_any_order() {
        let c = chord("<ctrl>+<alt>+1");
        let mut h = HeldKeys::new();
        h.on_key_down(Key::Digit1);
        assert!(!h.completes(&c, Key::Digit1));
        h.on_key_down(Key::Control);
        assert!(!h.completes(&c, Key::Control));
        h.on_key_down(Key::Alt);
        assert!(h.completes(&c, Key::Alt));
    }

    #[test]
    fn extra_modifier_blocks_completion() {
        let c = chord("<ctrl>+1");
        let mut h = HeldKeys::new();
        h.on_key_down(Key::Control);
        h.on_key_down(Key::Shift);
        h.on_key_down(Key::Digit1);
        assert!(!h.completes(&c, Key::Digit1));
        h.on_key_up(Key::Shift);
        assert!(h.completes(&c, Key::Digit1));
    }

    #[test]
    fn unrelated_key_does_not_complete() {
        let c = chord("<ctrl>+1");
        let mut h = HeldKeys::new();
        h.on_key_down(Key::Control);
        h.on_key_down(Key::Digit1);
        h.on_key_down(Key::B);
        assert!(!h.completes(&c, Key::B));
        assert!(h.is_down(Key::B));
    }
}
