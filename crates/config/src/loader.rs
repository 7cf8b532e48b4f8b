//! Read, bootstrap, and write configuration files.

use std::{fs, io, path::Path};

use tracing::info;

use crate::{ConfigFile, Error, Model, error::excerpt_at};

/// Version string written by [`save_config`].
pub const CONFIG_VERSION: &str = "1.1.0";

/// Content written when neither a config nor a sample template exists.
const EMPTY_CONFIG: &str = "{\n  \"version\": \"1.0.0\",\n  \"shortcuts\": []\n}\n";

/// Parse JSON source into a [`ConfigFile`]. `path` is only used for error reporting.
pub fn parse_str(source: &str, path: Option<&Path>) -> Result<ConfigFile, Error> {
    serde_json::from_str(source).map_err(|e| Error::Parse {
        path: path.map(Path::to_path_buf),
        line: e.line(),
        col: e.column(),
        message: e.to_string(),
        excerpt: excerpt_at(source, e.line(), e.column()),
    })
}

/// Load and parse the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<ConfigFile, Error> {
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let cfg = parse_str(&source, Some(path))?;
    info!(path = %path.display(), shortcuts = cfg.shortcuts.len(), "config_loaded");
    Ok(cfg)
}

/// Load the configuration at `path` and validate it into a [`Model`].
///
/// Relative asset paths resolve against the directory containing `path`.
pub fn load_model(path: &Path) -> Result<Model, Error> {
    load_config(path)?
        .into_model(path.parent())
        .map_err(|e| e.with_path(path))
}

/// Load the configuration at `path`, creating it first when it does not exist.
///
/// A missing file is populated from `sample` when that template exists, and
/// otherwise with an empty shortcut list.
pub fn load_or_bootstrap(path: &Path, sample: Option<&Path>) -> Result<ConfigFile, Error> {
    ensure_config_exists(path, sample)?;
    load_config(path)
}

fn ensure_config_exists(path: &Path, sample: Option<&Path>) -> Result<(), Error> {
    if path.exists() {
        return Ok(());
    }
    let write_err = |e: io::Error| Error::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    match sample.filter(|s| s.is_file()) {
        Some(sample) => {
            let content = fs::read_to_string(sample).map_err(|e| Error::Read {
                path: Some(sample.to_path_buf()),
                message: e.to_string(),
            })?;
            fs::write(path, content).map_err(write_err)?;
            info!(path = %path.display(), sample = %sample.display(), "config_bootstrapped");
        }
        None => {
            fs::write(path, EMPTY_CONFIG).map_err(write_err)?;
            info!(path = %path.display(), "config_bootstrapped_empty");
        }
    }
    Ok(())
}

/// Write `cfg` to `path` as pretty JSON, stamping the current schema version.
///
/// Single-token suffix lists are written in their plain string form.
pub fn save_config(path: &Path, cfg: &ConfigFile) -> Result<(), Error> {
    let out = cfg.clone().normalized();
    let write_err = |message: String| Error::Write {
        path: path.to_path_buf(),
        message,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    let mut text = serde_json::to_string_pretty(&out).map_err(|e| write_err(e.to_string()))?;
    text.push('\n');
    fs::write(path, text).map_err(|e| write_err(e.to_string()))?;
    info!(path = %path.display(), shortcuts = out.shortcuts.len(), "config_saved");
    Ok(())
}
