//! Validated shortcut model consumed by the matching engine.

use std::{fmt, path::PathBuf};

use keycode::{Chord, Key};
use serde::{Deserialize, Serialize};

/// Stable identifier of a shortcut within one table: its index in the
/// configuration's `shortcuts` array.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ShortcutId(pub u32);

impl fmt::Display for ShortcutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a shortcut is triggered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TriggerSpec {
    /// A combination that fires on its own.
    Direct(Chord),
    /// A key sequence typed after the activator has armed the chord window.
    Suffix(Vec<Key>),
}

/// Placement and lifetime of an overlay asset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverlaySpec {
    /// Image or animation to display.
    pub file: PathBuf,
    /// Screen x coordinate.
    pub x: i32,
    /// Screen y coordinate.
    pub y: i32,
    /// Auto-hide delay; `0` keeps the overlay until dismissed or replaced.
    pub duration_ms: u64,
    /// Optional target width.
    pub width: Option<u32>,
    /// Optional target height.
    pub height: Option<u32>,
}

impl OverlaySpec {
    /// Target size, only when both dimensions are configured.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    /// True when the overlay stays up until dismissed or replaced.
    pub fn is_persistent(&self) -> bool {
        self.duration_ms == 0
    }
}

/// Side effects of firing a shortcut.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ActionSpec {
    /// Sound file to play.
    pub sound: Option<PathBuf>,
    /// Overlay to show.
    pub overlay: Option<OverlaySpec>,
}

impl ActionSpec {
    /// True if neither a sound nor an overlay is configured.
    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.overlay.is_none()
    }
}

/// One configured shortcut.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShortcutSpec {
    /// Stable id within the table.
    pub id: ShortcutId,
    /// Trigger gesture.
    pub trigger: TriggerSpec,
    /// What happens when it fires.
    pub action: ActionSpec,
}

impl ShortcutSpec {
    /// Human label used in logs, e.g. `<ctrl>+<alt>+1` or `activator > g h`.
    pub fn label(&self) -> String {
        match &self.trigger {
            TriggerSpec::Direct(chord) => chord.to_string(),
            TriggerSpec::Suffix(seq) => {
                let tokens: Vec<String> = seq.iter().map(|k| k.to_spec()).collect();
                format!("activator > {}", tokens.join(" "))
            }
        }
    }
}

/// Activator behaviour.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivatorMode {
    /// Pressing the activator arms the chord window.
    #[default]
    Press,
    /// Reserved: accepted in configuration, never arms.
    Hold,
}

/// The optional activator that arms suffix matching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActivatorSpec {
    /// Combination that arms the chord window.
    pub chord: Chord,
    /// Press or (reserved) hold.
    pub mode: ActivatorMode,
    /// Arming window length.
    pub timeout_ms: u64,
}

/// Validated configuration: optional activator plus shortcuts in file order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Model {
    /// Optional activator definition.
    pub activator: Option<ActivatorSpec>,
    /// Shortcuts; `shortcuts[i].id == ShortcutId(i)`.
    pub shortcuts: Vec<ShortcutSpec>,
}
