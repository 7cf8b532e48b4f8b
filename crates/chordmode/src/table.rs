//! Immutable lookup structure built from a validated [`Model`].

use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
};

use config::{ActivatorMode, ActivatorSpec, Model, ShortcutId, ShortcutSpec, TriggerSpec};
use keycode::{Chord, Key};
use tracing::warn;

use crate::{HeldKeys, TableError};

/// Shortest arming window accepted; smaller timeouts are raised to this.
pub const MIN_TIMEOUT_MS: u64 = 100;

/// Result of looking up a (partial) suffix sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixLookup<'a> {
    /// Shortcut whose sequence equals the queried one.
    pub exact_match: Option<&'a ShortcutSpec>,
    /// True if some longer sequence starts with the queried one.
    pub has_longer_prefix_matches: bool,
}

impl SuffixLookup<'_> {
    /// True when the sequence neither matches nor can be extended to a match.
    pub fn is_dead_end(&self) -> bool {
        self.exact_match.is_none() && !self.has_longer_prefix_matches
    }
}

/// Validated mapping of direct hotkeys, suffix sequences and the activator.
///
/// Built once per configuration and never mutated; a config change builds a
/// new table which the engine swaps in while idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutTable {
    /// Shortcuts in configuration order.
    shortcuts: Vec<ShortcutSpec>,
    /// Index into `shortcuts` by id.
    by_id: HashMap<ShortcutId, usize>,
    /// Direct hotkeys.
    direct: BTreeMap<Chord, ShortcutId>,
    /// Suffix sequences; ordered so sequences sharing a prefix are adjacent.
    suffixes: BTreeMap<Vec<Key>, ShortcutId>,
    /// Activator, with its timeout already clamped.
    activator: Option<ActivatorSpec>,
}

impl ShortcutTable {
    /// A table with no activator and no shortcuts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a validated model.
    pub fn from_model(model: Model) -> Result<Self, TableError> {
        Self::new(model.activator, model.shortcuts)
    }

    /// Build a table, rejecting empty or duplicate triggers and shortcuts
    /// without an action. Suspicious but usable setups only log a warning.
    pub fn new(
        activator: Option<ActivatorSpec>,
        shortcuts: Vec<ShortcutSpec>,
    ) -> Result<Self, TableError> {
        let mut by_id = HashMap::new();
        let mut direct = BTreeMap::new();
        let mut suffixes = BTreeMap::new();

        for (idx, sc) in shortcuts.iter().enumerate() {
            if by_id.insert(sc.id, idx).is_some() {
                return Err(TableError::DuplicateId { id: sc.id });
            }
            if sc.action.is_empty() {
                return Err(TableError::NoAction { id: sc.id });
            }
            match &sc.trigger {
                TriggerSpec::Direct(chord) => {
                    if let Some(first) = direct.insert(chord.clone(), sc.id) {
                        return Err(TableError::DuplicateHotkey {
                            chord: chord.clone(),
                            first,
                            second: sc.id,
                        });
                    }
                }
                TriggerSpec::Suffix(seq) => {
                    if seq.is_empty() {
                        return Err(TableError::EmptySuffix { id: sc.id });
                    }
                    if let Some(first) = suffixes.insert(seq.clone(), sc.id) {
                        return Err(TableError::DuplicateSuffix {
                            suffix: sc.label(),
                            first,
                            second: sc.id,
                        });
                    }
                }
            }
        }

        let activator = activator.map(|mut act| {
            if act.timeout_ms < MIN_TIMEOUT_MS {
                warn!(
                    timeout_ms = act.timeout_ms,
                    min_ms = MIN_TIMEOUT_MS,
                    "activator_timeout_clamped"
                );
                act.timeout_ms = MIN_TIMEOUT_MS;
            }
            if act.mode == ActivatorMode::Hold {
                warn!(activator = %act.chord, "activator_hold_never_arms");
            }
            if let Some(id) = direct.get(&act.chord) {
                warn!(activator = %act.chord, shortcut = %id, "activator_shadowed_by_hotkey");
            }
            act
        });

        if activator.is_none() && !suffixes.is_empty() {
            warn!(count = suffixes.len(), "suffixes_without_activator");
        }
        for (seq, id) in &suffixes {
            let unreachable = seq.iter().any(|k| {
                *k == Key::Escape
                    || k.is_modifier()
                    || activator.as_ref().is_some_and(|a| a.chord.key == *k)
            });
            if unreachable {
                warn!(shortcut = %id, "suffix_unreachable");
            }
        }

        Ok(Self {
            shortcuts,
            by_id,
            direct,
            suffixes,
            activator,
        })
    }

    /// Activator definition, if any.
    pub fn activator(&self) -> Option<&ActivatorSpec> {
        self.activator.as_ref()
    }

    /// All shortcuts in configuration order.
    pub fn shortcuts(&self) -> impl Iterator<Item = &ShortcutSpec> {
        self.shortcuts.iter()
    }

    /// Number of shortcuts.
    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    /// True if the table has no shortcuts.
    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Number of direct hotkeys.
    pub fn direct_count(&self) -> usize {
        self.direct.len()
    }

    /// Number of suffix sequences.
    pub fn suffix_count(&self) -> usize {
        self.suffixes.len()
    }

    /// Look up a shortcut by id.
    pub fn shortcut(&self, id: ShortcutId) -> Option<&ShortcutSpec> {
        self.by_id.get(&id).and_then(|i| self.shortcuts.get(*i))
    }

    /// Shortcut registered for exactly this combination.
    pub fn direct_match(&self, chord: &Chord) -> Option<&ShortcutSpec> {
        self.direct.get(chord).and_then(|id| self.shortcut(*id))
    }

    /// Direct hotkey completed by pressing `pressed` with `held` down.
    ///
    /// When several would complete at once the lowest id wins, so at most one
    /// shortcut fires per event.
    pub fn direct_completed(&self, held: &HeldKeys, pressed: Key) -> Option<&ShortcutSpec> {
        self.direct
            .iter()
            .filter(|(chord, _)| held.completes(chord, pressed))
            .map(|(_, id)| *id)
            .min()
            .and_then(|id| self.shortcut(id))
    }

    /// Look up a suffix sequence typed after arming.
    pub fn suffix_lookup(&self, seq: &[Key]) -> SuffixLookup<'_> {
        let exact_match = self.suffixes.get(seq).and_then(|id| self.shortcut(*id));
        // Sequences sharing `seq` as a prefix sort directly after it.
        let has_longer_prefix_matches = self
            .suffixes
            .range::<[Key], _>((Bound::Excluded(seq), Bound::Unbounded))
            .next()
            .is_some_and(|(k, _)| k.starts_with(seq));
        SuffixLookup {
            exact_match,
            has_longer_prefix_matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use config::ActionSpec;

    use super::*;

    fn action() -> ActionSpec {
        ActionSpec {
            sound: Some(PathBuf::from("a.wav")),
            overlay: None,
        }
    }

    fn direct(id: u32, chord: &str) -> ShortcutSpec {
        ShortcutSpec {
            id: ShortcutId(id),
            trigger: TriggerSpec::Direct(Chord::parse(chord).expect("chord")),
            action: action(),
        }
    }

    fn suffix(id: u32, keys: &[Key]) -> ShortcutSpec {
        ShortcutSpec {
            id: ShortcutId(id),
            trigger: TriggerSpec::Suffix(keys.to_vec()),
            action: action(),
        }
    }

    fn activator(timeout_ms: u64) -> ActivatorSpec {
        ActivatorSpec {
            chord: Chord::parse("<ctrl>+<alt>+a").expect("chord"),
            mode: ActivatorMode::Press,
            timeout_ms,
        }
    }

    #[test]
    fn lookup_exact_and_prefix() {
        let table = ShortcutTable::new(
            Some(activator(1500)),
            vec![
                suffix(0, &[Key::G]),
                suffix(1, &[Key::G, Key::H]),
                suffix(2, &[Key::B]),
                suffix(3, &[Key::C, Key::D]),
            ],
        )
        .expect("table");

        let g = table.suffix_lookup(&[Key::G]);
        assert_eq!(g.exact_match.map(|s| s.id), Some(ShortcutId(0)));
        assert!(g.has_longer_prefix_matches);

        let gh = table.suffix_lookup(&[Key::G, Key::H]);
        assert_eq!(gh.exact_match.map(|s| s.id), Some(ShortcutId(1)));
        assert!(!gh.has_longer_prefix_matches);

        let b = table.suffix_lookup(&[Key::B]);
        assert_eq!(b.exact_match.map(|s| s.id), Some(ShortcutId(2)));
        assert!(!b.has_longer_prefix_matches);

        let c = table.suffix_lookup(&[Key::C]);
        assert!(c.exact_match.is_none());
        assert!(c.has_longer_prefix_matches);

        assert!(table.suffix_lookup(&[Key::Z]).is_dead_end());
        assert!(table.suffix_lookup(&[Key::G, Key::Z]).is_dead_end());
        assert!(table.suffix_lookup(&[]).has_longer_prefix_matches);
    }

    #[test]
    fn rejects_duplicate_hotkey() {
        let err = ShortcutTable::new(None, vec![direct(0, "<ctrl>+1"), direct(1, "ctrl+1")])
            .expect_err("duplicate");
        assert!(matches!(
            err,
            TableError::DuplicateHotkey {
                first: ShortcutId(0),
                second: ShortcutId(1),
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicate_suffix() {
        let err = ShortcutTable::new(
            Some(activator(1500)),
            vec![suffix(0, &[Key::G]), suffix(1, &[Key::G])],
        )
        .expect_err("duplicate");
        assert!(matches!(err, TableError::DuplicateSuffix { .. }));
        assert!(err.to_string().contains("activator > g"));
    }

    #[test]
    fn rejects_empty_suffix_and_missing_action() {
        let err = ShortcutTable::new(Some(activator(1500)), vec![suffix(0, &[])])
            .expect_err("empty");
        assert_eq!(err, TableError::EmptySuffix { id: ShortcutId(0) });

        let mut sc = direct(0, "<ctrl>+1");
        sc.action = ActionSpec::default();
        let err = ShortcutTable::new(None, vec![sc]).expect_err("no action");
        assert_eq!(err, TableError::NoAction { id: ShortcutId(0) });
    }

    #[test]
    fn rejects_duplicate_id() {
        let err = ShortcutTable::new(None, vec![direct(3, "<ctrl>+1"), direct(3, "<ctrl>+2")])
            .expect_err("dup id");
        assert_eq!(err, TableError::DuplicateId { id: ShortcutId(3) });
    }

    #[test]
    fn activator_equal_to_hotkey_is_allowed() {
        let table = ShortcutTable::new(
            Some(activator(1500)),
            vec![direct(0, "<ctrl>+<alt>+a")],
        )
        .expect("warning only");
        let act = table.activator().expect("activator");
        assert_eq!(
            table.direct_match(&act.chord).map(|s| s.id),
            Some(ShortcutId(0))
        );
    }

    #[test]
    fn short_timeout_is_clamped() {
        let table = ShortcutTable::new(Some(activator(10)), vec![]).expect("table");
        assert_eq!(
            table.activator().map(|a| a.timeout_ms),
            Some(MIN_TIMEOUT_MS)
        );
    }

    #[test]
    fn direct_completion_prefers_lowest_id() {
        let table = ShortcutTable::new(
            None,
            vec![direct(0, "<ctrl>+1"), direct(1, "<ctrl>+2")],
        )
        .expect("table");
        let mut held = HeldKeys::new();
        held.on_key_down(Key::Control);
        held.on_key_down(Key::Digit2);
        held.on_key_down(Key::Digit1);
        assert_eq!(
            table.direct_completed(&held, Key::Digit1).map(|s| s.id),
            Some(ShortcutId(0))
        );
        assert_eq!(
            table.direct_completed(&held, Key::Control).map(|s| s.id),
            Some(ShortcutId(0))
        );
    }

    #[test]
    fn lookup_by_id_and_counts() {
        let table = ShortcutTable::new(
            Some(activator(1500)),
            vec![direct(0, "<ctrl>+1"), suffix(1, &[Key::G])],
        )
        .expect("table");
        assert_eq!(table.len(), 2);
        assert_eq!(table.direct_count(), 1);
        assert_eq!(table.suffix_count(), 1);
        assert_eq!(
            table.shortcut(ShortcutId(1)).map(ShortcutSpec::label),
            Some("activator > g".to_string())
        );
        assert!(table.shortcut(ShortcutId(9)).is_none());
        assert!(ShortcutTable::empty().is_empty());
    }
}
