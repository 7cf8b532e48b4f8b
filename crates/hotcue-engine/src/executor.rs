//! Action executor seams: the audio and overlay sinks the dispatcher drives.

use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use config::OverlaySpec;
use tracing::info;

use crate::ActionError;

/// Opaque handle to an overlay shown by an [`OverlaySurface`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverlayHandle(pub u64);

/// Plays sound files. Calls may overlap.
#[async_trait]
pub trait SoundPlayer: Send + Sync {
    /// Start playing `path`; returns once playback has been handed off.
    async fn play_sound(&self, path: &Path) -> Result<(), ActionError>;
}

/// Shows image or animation overlays on screen.
#[async_trait]
pub trait OverlaySurface: Send + Sync {
    /// Show an overlay; the returned handle is later passed to `hide_overlay`.
    async fn show_overlay(&self, spec: &OverlaySpec) -> Result<OverlayHandle, ActionError>;

    /// Hide a previously shown overlay. Hiding an unknown handle is a no-op.
    async fn hide_overlay(&self, handle: OverlayHandle);
}

/// Sound player that only logs what it would play.
#[derive(Debug, Default)]
pub struct TraceSoundPlayer;

#[async_trait]
impl SoundPlayer for TraceSoundPlayer {
    async fn play_sound(&self, path: &Path) -> Result<(), ActionError> {
        info!(path = %path.display(), "sound_play");
        Ok(())
    }
}

/// Overlay surface that only logs what it would show.
#[derive(Debug, Default)]
pub struct TraceOverlaySurface {
    /// Next handle to hand out.
    next: AtomicU64,
}

#[async_trait]
impl OverlaySurface for TraceOverlaySurface {
    async fn show_overlay(&self, spec: &OverlaySpec) -> Result<OverlayHandle, ActionError> {
        let handle = OverlayHandle(self.next.fetch_add(1, Ordering::Relaxed));
        info!(
            handle = handle.0,
            file = %spec.file.display(),
            x = spec.x,
            y = spec.y,
            size = ?spec.size(),
            duration_ms = spec.duration_ms,
            "overlay_show"
        );
        Ok(handle)
    }

    async fn hide_overlay(&self, handle: OverlayHandle) {
        info!(handle = handle.0, "overlay_hide");
    }
}
