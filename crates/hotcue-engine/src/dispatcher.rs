//! Resolves triggers to actions and runs them without blocking the engine loop.

use std::{path::Path, sync::Arc, time::Duration};

use chordmode::{ShortcutTable, Trigger};
use config::{OverlaySpec, ShortcutSpec};
use parking_lot::Mutex;
use tokio::{sync::mpsc::UnboundedReceiver, time};
use tracing::{debug, info, trace, warn};

use crate::{ActionError, OverlayHandle, OverlaySurface, SoundPlayer};

/// Messages from the engine loop to the dispatcher, in emission order.
#[derive(Debug)]
pub(crate) enum DispatchMsg {
    /// Table that later triggers resolve against.
    Table(Arc<ShortcutTable>),
    /// Fire a shortcut.
    Fire(Trigger),
    /// Hide the persistent overlay.
    Dismiss,
}

/// Tracks the single persistent (zero-duration) overlay.
///
/// Each persistent show claims a new generation up front, in trigger order. A
/// show that completes after a newer claim hides itself instead of taking the
/// slot.
#[derive(Default)]
struct PersistentSlot {
    /// Generation of the latest claim.
    generation: u64,
    /// Handle currently occupying the slot.
    handle: Option<OverlayHandle>,
}

impl PersistentSlot {
    /// Claim the slot for a new show; returns its generation and the handle it evicts.
    fn claim(&mut self) -> (u64, Option<OverlayHandle>) {
        self.generation += 1;
        (self.generation, self.handle.take())
    }

    /// Record a finished show. Returns the handle back if the claim was superseded.
    fn settle(&mut self, generation: u64, handle: OverlayHandle) -> Option<OverlayHandle> {
        if generation == self.generation {
            self.handle = Some(handle);
            None
        } else {
            Some(handle)
        }
    }

    /// Empty the slot and invalidate in-flight shows.
    fn clear(&mut self) -> Option<OverlayHandle> {
        self.generation += 1;
        self.handle.take()
    }
}

/// Dispatcher task state.
pub(crate) struct Dispatcher {
    /// Table snapshot current for the next trigger.
    table: Arc<ShortcutTable>,
    /// Audio sink.
    sound: Arc<dyn SoundPlayer>,
    /// Overlay sink.
    overlay: Arc<dyn OverlaySurface>,
    /// Persistent overlay slot, shared with the show tasks.
    slot: Arc<Mutex<PersistentSlot>>,
}

impl Dispatcher {
    /// Create a dispatcher resolving against `table`.
    pub(crate) fn new(
        table: Arc<ShortcutTable>,
        sound: Arc<dyn SoundPlayer>,
        overlay: Arc<dyn OverlaySurface>,
    ) -> Self {
        Self {
            table,
            sound,
            overlay,
            slot: Arc::new(Mutex::new(PersistentSlot::default())),
        }
    }

    /// Process messages until the engine loop drops its sender, then hide the
    /// persistent overlay.
    pub(crate) async fn run(mut self, mut rx: UnboundedReceiver<DispatchMsg>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                DispatchMsg::Table(table) => self.table = table,
                DispatchMsg::Fire(trigger) => self.dispatch(trigger),
                DispatchMsg::Dismiss => self.dismiss(),
            }
        }
        let leftover = self.slot.lock().clear();
        if let Some(handle) = leftover {
            self.overlay.hide_overlay(handle).await;
        }
        trace!("dispatcher_stopped");
    }

    /// Start the sound and overlay of the triggered shortcut.
    fn dispatch(&self, trigger: Trigger) {
        let Some(sc) = self.table.shortcut(trigger.shortcut) else {
            warn!(shortcut = %trigger.shortcut, "trigger_unknown_shortcut");
            return;
        };
        if let Some(path) = &sc.action.sound {
            self.play(sc, path);
        }
        if let Some(spec) = &sc.action.overlay {
            self.show(sc, spec);
        }
    }

    /// Spawn playback of one sound.
    fn play(&self, sc: &ShortcutSpec, path: &Path) {
        if let Err(e) = check_asset(path) {
            warn!(shortcut = %sc.label(), kind = "sound", error = %e, "asset_missing");
            return;
        }
        let sound = self.sound.clone();
        let path = path.to_path_buf();
        let label = sc.label();
        tokio::spawn(async move {
            if let Err(e) = sound.play_sound(&path).await {
                warn!(shortcut = %label, kind = "sound", error = %e, "action_failed");
            }
        });
    }

    /// Spawn one overlay show, timed or persistent.
    fn show(&self, sc: &ShortcutSpec, spec: &OverlaySpec) {
        if let Err(e) = check_asset(&spec.file) {
            warn!(shortcut = %sc.label(), kind = "overlay", error = %e, "asset_missing");
            return;
        }
        let overlay = self.overlay.clone();
        let spec = spec.clone();
        let label = sc.label();

        if !spec.is_persistent() {
            tokio::spawn(async move {
                match overlay.show_overlay(&spec).await {
                    Ok(handle) => {
                        time::sleep(Duration::from_millis(spec.duration_ms)).await;
                        overlay.hide_overlay(handle).await;
                    }
                    Err(e) => {
                        warn!(shortcut = %label, kind = "overlay", error = %e, "action_failed");
                    }
                }
            });
            return;
        }

        let (generation, evicted) = self.slot.lock().claim();
        let slot = self.slot.clone();
        tokio::spawn(async move {
            if let Some(old) = evicted {
                debug!(handle = old.0, "overlay_replaced");
                overlay.hide_overlay(old).await;
            }
            match overlay.show_overlay(&spec).await {
                Ok(handle) => {
                    let superseded = slot.lock().settle(generation, handle);
                    if let Some(handle) = superseded {
                        overlay.hide_overlay(handle).await;
                    }
                }
                Err(e) => {
                    warn!(shortcut = %label, kind = "overlay", error = %e, "action_failed");
                }
            }
        });
    }

    /// Hide the persistent overlay, if one is showing.
    fn dismiss(&self) {
        let current = self.slot.lock().clear();
        match current {
            Some(handle) => {
                info!(handle = handle.0, "overlay_dismissed");
                let overlay = self.overlay.clone();
                tokio::spawn(async move { overlay.hide_overlay(handle).await });
            }
            None => debug!("overlay_dismiss_nothing"),
        }
    }
}

/// Confirm an asset exists before handing it to an executor.
fn check_asset(path: &Path) -> Result<(), ActionError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ActionError::MissingAsset {
            path: path.to_path_buf(),
        })
    }
}
