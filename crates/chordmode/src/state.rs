use config::{ActivatorMode, ShortcutId};
use keycode::Key;
use tracing::{debug, trace};

use crate::{HeldKeys, KeyEvent, ShortcutTable};

/// Phase of the activator/suffix chord window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Not armed; only direct hotkeys and the activator are live.
    #[default]
    Idle,
    /// Activator pressed; waiting for the first suffix key.
    Armed,
    /// At least one suffix key typed; the typed prefix can still grow.
    PartialMatch,
}

/// Decision to fire one shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    /// Shortcut to fire.
    pub shortcut: ShortcutId,
    /// Timestamp of the key event that fired it.
    pub fired_at_ms: u64,
}

/// Why the chord window closed without firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisarmReason {
    /// Escape pressed while armed.
    Cancelled,
    /// The arming window elapsed.
    Timeout,
    /// The typed prefix matches no suffix.
    NoMatch,
}

impl DisarmReason {
    /// Short name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
            Self::NoMatch => "no_match",
        }
    }
}

/// Result of handling one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum KeyResponse {
    /// Nothing happened.
    Ignored,
    /// A direct hotkey fired; the chord phase is unchanged.
    Fired(Trigger),
    /// The activator armed the chord window until `deadline_ms`.
    Armed { deadline_ms: u64 },
    /// The typed prefix is valid but not final. `ambiguous` is set when the
    /// prefix is itself a complete suffix that is waiting on longer ones.
    Partial { prefix: Vec<Key>, ambiguous: bool },
    /// A suffix sequence completed; the machine is idle again.
    Matched(Trigger),
    /// The chord window closed without firing.
    Disarmed(DisarmReason),
}

impl KeyResponse {
    /// The trigger carried by this response, if any.
    pub fn trigger(&self) -> Option<Trigger> {
        match self {
            Self::Fired(t) | Self::Matched(t) => Some(*t),
            _ => None,
        }
    }
}

/// Outcome of [`State::handle_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The arming window had already elapsed when the event arrived and was
    /// closed before the event was processed.
    pub timed_out: bool,
    /// What the event itself did.
    pub response: KeyResponse,
}

/// Runtime state of the chord window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordState {
    /// Current phase.
    pub phase: Phase,
    /// Timestamp of the arming key event; meaningful only while armed.
    pub armed_at_ms: u64,
    /// Arming window length captured at arm time.
    pub timeout_ms: u64,
    /// Suffix keys typed since arming.
    pub matched_prefix: Vec<Key>,
}

impl ChordState {
    /// Deadline of the current arming window, if armed.
    pub fn deadline_ms(&self) -> Option<u64> {
        match self.phase {
            Phase::Idle => None,
            _ => Some(self.armed_at_ms.saturating_add(self.timeout_ms)),
        }
    }
}

/// The chord state machine: held keys plus the chord window.
///
/// Owned by a single engine loop. It never fails; unrecognized events are
/// ignored.
#[derive(Debug, Default)]
pub struct State {
    /// Chord window.
    chord: ChordState,
    /// Keys currently down.
    held: HeldKeys,
}

impl State {
    /// Create an idle machine with no keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.chord.phase
    }

    /// True when not armed.
    pub fn is_idle(&self) -> bool {
        self.chord.phase == Phase::Idle
    }

    /// Chord window details.
    pub fn chord(&self) -> &ChordState {
        &self.chord
    }

    /// Keys currently held.
    pub fn held(&self) -> &HeldKeys {
        &self.held
    }

    /// Close the chord window if it has run for at least its timeout at
    /// `now_ms`. Returns true if it was closed.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        match self.chord.deadline_ms() {
            Some(deadline) if now_ms >= deadline => {
                self.disarm();
                true
            }
            _ => false,
        }
    }

    /// Return to idle without touching the held keys.
    pub fn reset(&mut self) {
        self.disarm();
    }

    /// Process one key event against `table`.
    pub fn handle_key(&mut self, table: &ShortcutTable, ev: &KeyEvent) -> Step {
        let timed_out = self.expire(ev.timestamp_ms);
        let response = if ev.is_down {
            self.key_down(table, ev.key, ev.timestamp_ms)
        } else {
            self.held.on_key_up(ev.key);
            KeyResponse::Ignored
        };
        Step {
            timed_out,
            response,
        }
    }

    /// Handle a key-down after expiry has been checked.
    fn key_down(&mut self, table: &ShortcutTable, key: Key, now_ms: u64) -> KeyResponse {
        if !self.held.on_key_down(key) {
            trace!(key = %key, "key_repeat_ignored");
            return KeyResponse::Ignored;
        }

        if let Some(sc) = table.direct_completed(&self.held, key) {
            return KeyResponse::Fired(Trigger {
                shortcut: sc.id,
                fired_at_ms: now_ms,
            });
        }

        match self.chord.phase {
            Phase::Idle => self.try_arm(table, key, now_ms),
            Phase::Armed | Phase::PartialMatch => self.suffix_key(table, key, now_ms),
        }
    }

    /// Arm if `key` completes the activator.
    fn try_arm(&mut self, table: &ShortcutTable, key: Key, now_ms: u64) -> KeyResponse {
        let Some(act) = table.activator() else {
            return KeyResponse::Ignored;
        };
        if !self.held.completes(&act.chord, key) {
            return KeyResponse::Ignored;
        }
        match act.mode {
            ActivatorMode::Hold => {
                debug!(activator = %act.chord, "activator_hold_ignored");
                KeyResponse::Ignored
            }
            ActivatorMode::Press => {
                self.chord = ChordState {
                    phase: Phase::Armed,
                    armed_at_ms: now_ms,
                    timeout_ms: act.timeout_ms,
                    matched_prefix: Vec::new(),
                };
                KeyResponse::Armed {
                    deadline_ms: now_ms.saturating_add(act.timeout_ms),
                }
            }
        }
    }

    /// Handle a key-down while armed.
    fn suffix_key(&mut self, table: &ShortcutTable, key: Key, now_ms: u64) -> KeyResponse {
        if key == Key::Escape {
            self.disarm();
            return KeyResponse::Disarmed(DisarmReason::Cancelled);
        }
        let is_activator_key = table.activator().is_some_and(|a| a.chord.key == key);
        if is_activator_key || key.is_modifier() {
            return KeyResponse::Ignored;
        }

        self.chord.matched_prefix.push(key);
        let lookup = table.suffix_lookup(&self.chord.matched_prefix);
        match (lookup.exact_match, lookup.has_longer_prefix_matches) {
            (Some(sc), false) => {
                let trigger = Trigger {
                    shortcut: sc.id,
                    fired_at_ms: now_ms,
                };
                self.disarm();
                KeyResponse::Matched(trigger)
            }
            (exact, true) => {
                self.chord.phase = Phase::PartialMatch;
                KeyResponse::Partial {
                    prefix: self.chord.matched_prefix.clone(),
                    ambiguous: exact.is_some(),
                }
            }
            (None, false) => {
                self.disarm();
                KeyResponse::Disarmed(DisarmReason::NoMatch)
            }
        }
    }

    /// Return to idle.
    fn disarm(&mut self) {
        self.chord = ChordState::default();
    }
}
