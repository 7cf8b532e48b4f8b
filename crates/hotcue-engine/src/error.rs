use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the hotcue engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine loop has shut down; the request was not delivered.
    #[error("Engine has stopped")]
    EngineStopped,
}

/// Failure of a single sound or overlay action. Never fatal to the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The asset file does not exist.
    #[error("Asset not found: {}", path.display())]
    MissingAsset {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The executor could not perform the action.
    #[error("Action failed: {0}")]
    Failed(String),
}
