//! Configuration to shortcut table, with asset checks.

use std::path::{Path, PathBuf};

use chordmode::{ShortcutTable, TableError};
use config::sample_path_for;
use thiserror::Error;
use tracing::warn;

/// Error turning a configuration file into a table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading, parsing or validating the file failed.
    #[error("{}", .0.pretty())]
    Config(#[from] config::Error),
    /// The validated shortcuts do not form a table.
    #[error("{path}: {source}")]
    Table {
        /// Config file.
        path: PathBuf,
        /// Underlying error.
        source: TableError,
    },
}

/// Load `path` into a table. With `bootstrap`, a missing file is created from
/// the sample next to it, or as an empty configuration.
pub fn load_table(path: &Path, bootstrap: bool) -> Result<ShortcutTable, LoadError> {
    let file = if bootstrap {
        let sample = sample_path_for(path);
        config::load_or_bootstrap(path, Some(&sample))?
    } else {
        config::load_config(path)?
    };
    let model = file
        .into_model(path.parent())
        .map_err(|e| e.with_path(path))?;
    ShortcutTable::from_model(model).map_err(|source| LoadError::Table {
        path: path.to_path_buf(),
        source,
    })
}

/// Asset files referenced by `table` that do not exist, with the shortcut label.
pub fn missing_assets(table: &ShortcutTable) -> Vec<(String, PathBuf)> {
    let mut out = Vec::new();
    for sc in table.shortcuts() {
        let files = sc
            .action
            .sound
            .iter()
            .chain(sc.action.overlay.iter().map(|o| &o.file));
        for file in files {
            if !file.is_file() {
                out.push((sc.label(), file.clone()));
            }
        }
    }
    out
}

/// Log `asset_missing` for each missing asset; returns how many were missing.
pub fn report_missing_assets(table: &ShortcutTable) -> usize {
    let missing = missing_assets(table);
    for (label, path) in &missing {
        warn!(shortcut = %label, path = %path.display(), "asset_missing");
    }
    missing.len()
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs, process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn unique_tmp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("hotcue-{tag}-{}-{nanos}", process::id()));
        fs::create_dir_all(&dir).expect("create tmp dir");
        dir
    }

    #[test]
    fn bootstraps_missing_config() {
        let dir = unique_tmp_dir("load-bootstrap");
        let path = dir.join("nested").join("shortcuts.json");
        let table = load_table(&path, true).expect("bootstrap");
        assert!(table.is_empty());
        assert!(path.exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_config_without_bootstrap_fails() {
        let dir = unique_tmp_dir("load-missing");
        let err = load_table(&dir.join("absent.json"), false).expect_err("missing");
        assert!(matches!(err, LoadError::Config(config::Error::Read { .. })));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn duplicate_suffix_is_a_table_error() {
        let dir = unique_tmp_dir("load-dup");
        let path = dir.join("shortcuts.json");
        fs::write(
            &path,
            r#"{ "activator": { "hotkey": "<ctrl>+<alt>+a" },
                 "shortcuts": [ { "suffix": "g", "sound": "a.wav" },
                                { "suffix": ["g"], "sound": "b.wav" } ] }"#,
        )
        .expect("write");
        let err = load_table(&path, false).expect_err("duplicate");
        assert!(matches!(
            err,
            LoadError::Table {
                source: TableError::DuplicateSuffix { .. },
                ..
            }
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn lists_missing_assets() {
        let dir = unique_tmp_dir("load-assets");
        let path = dir.join("shortcuts.json");
        fs::write(dir.join("here.wav"), b"x").expect("write asset");
        fs::write(
            &path,
            r#"{ "shortcuts": [ { "hotkey": "<ctrl>+1", "sound": "here.wav",
                                  "overlay": { "file": "gone.png" } } ] }"#,
        )
        .expect("write");
        let table = load_table(&path, false).expect("load");
        let missing = missing_assets(&table);
        assert_eq!(missing, vec![("<ctrl>+1".to_string(), dir.join("gone.png"))]);
        assert_eq!(report_missing_assets(&table), 1);
        fs::remove_dir_all(&dir).ok();
    }
}
