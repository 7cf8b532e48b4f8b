//! Shortcut configuration for hotcue: the JSON file schema, its validation into
//! the shortcut model, and loading/saving on disk.
//!
//! The JSON schema lives in [`ConfigFile`] and friends. [`ConfigFile::into_model`]
//! turns a parsed file into the [`Model`] consumed by the engine.

use std::{
    env,
    path::{Path, PathBuf},
};

mod error;
mod loader;
mod model;
mod raw;

#[cfg(test)]
mod test_parse;

pub use error::{Error, excerpt_at};
pub use loader::{
    CONFIG_VERSION, load_config, load_model, load_or_bootstrap, parse_str, save_config,
};
pub use model::{
    ActionSpec, ActivatorMode, ActivatorSpec, Model, OverlaySpec, ShortcutId, ShortcutSpec,
    TriggerSpec,
};
pub use raw::{ConfigFile, RawActivator, RawOverlay, RawShortcut, RawSuffix};

/// Environment variable that overrides the default config location.
pub const CONFIG_ENV: &str = "HOTCUE_CONFIG";

/// Determine the preferred user config path.
///
/// Uses `$HOTCUE_CONFIG` when set, otherwise `~/.hotcue/shortcuts.json`.
pub fn default_config_path() -> PathBuf {
    if let Some(p) = env::var_os(CONFIG_ENV) {
        return PathBuf::from(p);
    }
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".hotcue");
    p.push("shortcuts.json");
    p
}

/// Resolve the effective config path: `explicit` when provided, else the default.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_config_path, Path::to_path_buf)
}

/// Path of the sample template that sits next to a config file
/// (`shortcuts.json` -> `shortcuts.sample.json`).
pub fn sample_path_for(config: &Path) -> PathBuf {
    let stem = config
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "shortcuts".to_string());
    config.with_file_name(format!("{stem}.sample.json"))
}
