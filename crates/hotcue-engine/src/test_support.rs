//! Test support utilities for hotcue-engine integration/unit tests.
//! These helpers are public to avoid dead_code warnings and are lightweight.
//! They are intended for use by the test suite only.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use config::OverlaySpec;
use parking_lot::Mutex;
use tokio::time::sleep;

use crate::{ActionError, OverlayHandle, OverlaySurface, SoundPlayer};

/// Let every runnable task make progress. Under paused time this advances the
/// clock by one millisecond once the runtime is idle.
pub async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

/// Sound player that records every path it is asked to play.
#[derive(Debug, Default)]
pub struct RecordingSoundPlayer {
    /// Paths played, in call order.
    played: Mutex<Vec<PathBuf>>,
    /// Paths that fail with [`ActionError::Failed`].
    failing: Mutex<Vec<PathBuf>>,
}

impl RecordingSoundPlayer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make playback of `path` fail.
    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().push(path.into());
    }

    /// Paths played so far.
    pub fn played(&self) -> Vec<PathBuf> {
        self.played.lock().clone()
    }
}

#[async_trait]
impl SoundPlayer for RecordingSoundPlayer {
    async fn play_sound(&self, path: &Path) -> Result<(), ActionError> {
        if self.failing.lock().iter().any(|p| p == path) {
            return Err(ActionError::Failed(format!("cannot play {}", path.display())));
        }
        self.played.lock().push(path.to_path_buf());
        Ok(())
    }
}

/// Overlay call observed by [`RecordingOverlaySurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    /// An overlay was shown.
    Show {
        /// Handle returned to the caller.
        handle: OverlayHandle,
        /// Asset shown.
        file: PathBuf,
        /// Requested size, if any.
        size: Option<(u32, u32)>,
    },
    /// An overlay was hidden.
    Hide {
        /// Handle hidden.
        handle: OverlayHandle,
    },
}

/// Overlay surface that records shows and hides and tracks what is visible.
#[derive(Debug, Default)]
pub struct RecordingOverlaySurface {
    /// Next handle to hand out.
    next: AtomicU64,
    /// Calls in order.
    events: Mutex<Vec<OverlayEvent>>,
    /// Handles shown and not yet hidden, with their files.
    visible: Mutex<Vec<(OverlayHandle, PathBuf)>>,
}

impl RecordingOverlaySurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls so far.
    pub fn events(&self) -> Vec<OverlayEvent> {
        self.events.lock().clone()
    }

    /// Files currently visible, oldest first.
    pub fn visible(&self) -> Vec<PathBuf> {
        self.visible.lock().iter().map(|(_, f)| f.clone()).collect()
    }

    /// Number of `show_overlay` calls.
    pub fn show_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, OverlayEvent::Show { .. }))
            .count()
    }
}

#[async_trait]
impl OverlaySurface for RecordingOverlaySurface {
    async fn show_overlay(&self, spec: &OverlaySpec) -> Result<OverlayHandle, ActionError> {
        let handle = OverlayHandle(self.next.fetch_add(1, Ordering::Relaxed));
        self.events.lock().push(OverlayEvent::Show {
            handle,
            file: spec.file.clone(),
            size: spec.size(),
        });
        self.visible.lock().push((handle, spec.file.clone()));
        Ok(handle)
    }

    async fn hide_overlay(&self, handle: OverlayHandle) {
        self.events.lock().push(OverlayEvent::Hide { handle });
        self.visible.lock().retain(|(h, _)| *h != handle);
    }
}

/// Distinguishes scratch directories created within one process.
static NEXT_DIR: AtomicU64 = AtomicU64::new(0);

/// Scratch directory of placeholder asset files, removed on drop.
#[derive(Debug)]
pub struct AssetDir {
    /// Directory root.
    root: PathBuf,
}

impl AssetDir {
    /// Create a fresh unique directory under the system temp dir.
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let seq = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        let root = env::temp_dir().join(format!(
            "hotcue-assets-{}-{nanos}-{seq}",
            process::id()
        ));
        if let Err(e) = fs::create_dir_all(&root) {
            panic!("create asset dir {}: {e}", root.display());
        }
        Self { root }
    }

    /// Create an asset file named `name` and return its path.
    pub fn file(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Err(e) = fs::write(&path, b"asset") {
            panic!("write asset {}: {e}", path.display());
        }
        path
    }

    /// Directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `name` inside the directory without creating it.
    pub fn missing(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Default for AssetDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AssetDir {
    fn drop(&mut self) {
        let _ignored = fs::remove_dir_all(&self.root);
    }
}
