//! Serde view of the on-disk JSON configuration.

use std::path::{Path, PathBuf};

use keycode::{Chord, Key};
use serde::{Deserialize, Serialize};

use crate::{
    CONFIG_VERSION, Error,
    model::{
        ActionSpec, ActivatorMode, ActivatorSpec, Model, OverlaySpec, ShortcutId, ShortcutSpec,
        TriggerSpec,
    },
};

/// Default arming window for the activator.
pub const DEFAULT_TIMEOUT_MS: u64 = 1500;
/// Default overlay display time.
pub const DEFAULT_OVERLAY_MS: u64 = 1500;

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_duration() -> u64 {
    DEFAULT_OVERLAY_MS
}

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Schema version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// Optional activator definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activator: Option<RawActivator>,
    /// Shortcut entries.
    #[serde(default)]
    pub shortcuts: Vec<RawShortcut>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            activator: None,
            shortcuts: Vec::new(),
        }
    }
}

/// Activator entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawActivator {
    /// Combination that arms suffix matching.
    pub hotkey: Chord,
    /// `press` (default) or `hold`.
    #[serde(default)]
    pub mode: ActivatorMode,
    /// Arming window in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Suffix given either as a single token or a list of tokens.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawSuffix {
    /// `"suffix": "g"`
    One(String),
    /// `"suffix": ["g", "h"]`
    Many(Vec<String>),
}

impl RawSuffix {
    /// Token strings in order.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::One(s) => vec![s.as_str()],
            Self::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }

    /// Collapse a single-element list into the plain string form.
    pub fn normalized(self) -> Self {
        match self {
            Self::Many(mut v) if v.len() == 1 => Self::One(v.remove(0)),
            other => other,
        }
    }
}

/// Shortcut entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawShortcut {
    /// Direct hotkey combination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<Chord>,
    /// Suffix sequence typed after the activator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<RawSuffix>,
    /// Sound file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Overlay definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<RawOverlay>,
}

/// Overlay entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawOverlay {
    /// Asset path.
    pub file: String,
    /// Screen x coordinate.
    #[serde(default)]
    pub x: i32,
    /// Screen y coordinate.
    #[serde(default)]
    pub y: i32,
    /// Display time in milliseconds (`0` = until dismissed).
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// Optional width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Optional height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Resolve an asset path against the config directory.
fn resolve(base: Option<&Path>, raw: &str) -> PathBuf {
    let p = PathBuf::from(raw);
    match base {
        Some(dir) if p.is_relative() => dir.join(p),
        _ => p,
    }
}

/// Build a validation error for the shortcut at `index`.
fn invalid(index: usize, message: String) -> Error {
    Error::Validation {
        path: None,
        index: Some(index),
        message,
    }
}

impl RawShortcut {
    fn into_spec(self, index: usize, base: Option<&Path>) -> Result<ShortcutSpec, Error> {
        let trigger = match (self.hotkey, self.suffix) {
            (Some(chord), None) => TriggerSpec::Direct(chord),
            (None, Some(suffix)) => {
                let tokens = suffix.tokens();
                if tokens.is_empty() {
                    return Err(invalid(
                        index,
                        format!("Shortcut at index {index} has empty suffix list"),
                    ));
                }
                let mut seq = Vec::with_capacity(tokens.len());
                for token in tokens {
                    let key = Key::from_spec(token.trim()).ok_or_else(|| {
                        invalid(
                            index,
                            format!("Shortcut at index {index} has unknown suffix key '{token}'"),
                        )
                    })?;
                    seq.push(key);
                }
                TriggerSpec::Suffix(seq)
            }
            _ => {
                return Err(invalid(
                    index,
                    format!("Shortcut at index {index} must define exactly one of 'hotkey' or 'suffix'"),
                ));
            }
        };

        let sound = self
            .sound
            .filter(|s| !s.trim().is_empty())
            .map(|s| resolve(base, &s));
        let overlay = self.overlay.map(|o| OverlaySpec {
            file: resolve(base, &o.file),
            x: o.x,
            y: o.y,
            duration_ms: o.duration,
            width: o.width,
            height: o.height,
        });

        let id = u32::try_from(index)
            .map_err(|_| invalid(index, "Too many shortcuts".to_string()))?;
        Ok(ShortcutSpec {
            id: ShortcutId(id),
            trigger,
            action: ActionSpec { sound, overlay },
        })
    }
}

impl ConfigFile {
    /// Copy in the form written to disk: current schema version, single-token
    /// suffix lists collapsed to plain strings.
    pub fn normalized(mut self) -> Self {
        self.version = CONFIG_VERSION.to_string();
        for sc in &mut self.shortcuts {
            sc.suffix = sc.suffix.take().map(RawSuffix::normalized);
        }
        self
    }

    /// Validate entries and convert them into the shortcut model.
    ///
    /// Relative asset paths are resolved against `base_dir` when given.
    pub fn into_model(self, base_dir: Option<&Path>) -> Result<Model, Error> {
        let activator = self.activator.map(|a| ActivatorSpec {
            chord: a.hotkey,
            mode: a.mode,
            timeout_ms: a.timeout_ms,
        });
        let shortcuts = self
            .shortcuts
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_spec(i, base_dir))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Model {
            activator,
            shortcuts,
        })
    }
}
