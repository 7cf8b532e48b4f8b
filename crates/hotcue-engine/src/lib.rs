//! hotcue engine
//!
//! Runs the chord state machine from `chordmode` against a live stream of key
//! events and turns triggers into sound and overlay actions:
//! - one loop task owns the chord state, the current table and the arm timer
//! - a dispatcher task resolves triggers and runs each action in its own task
//! - table swaps are queued while armed and applied on the next idle step
//!
//! Construct an [`Engine`], call [`Engine::spawn`] inside a Tokio runtime and
//! drive it through the returned [`EngineHandle`].
use std::sync::Arc;

mod clock;
mod dispatcher;
mod error;
mod executor;
mod runtime;
mod source;
mod timer;

pub mod test_support;

use chordmode::{Phase, ShortcutTable};
use parking_lot::Mutex;
use tokio::{
    sync::{
        mpsc::{self, UnboundedSender},
        watch,
    },
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use clock::{Clock, TokioClock};
pub use error::{ActionError, Error, Result};
pub use executor::{
    OverlayHandle, OverlaySurface, SoundPlayer, TraceOverlaySurface, TraceSoundPlayer,
};
pub use runtime::EngineStatus;
pub use source::{KeySender, bridge_crossbeam_to_tokio};

use dispatcher::Dispatcher;
use runtime::{EngineLoop, Inbox, Input};
use timer::ArmTimer;

/// Engine configuration: the initial table, the action executors and the clock.
pub struct Engine {
    /// Initial table.
    table: ShortcutTable,
    /// Audio sink.
    sound: Arc<dyn SoundPlayer>,
    /// Overlay sink.
    overlay: Arc<dyn OverlaySurface>,
    /// Timestamp source; defaults to a [`TokioClock`] created at spawn.
    clock: Option<Arc<dyn Clock>>,
}

impl Engine {
    /// Create an engine for `table` driving the given executors.
    pub fn new(
        table: ShortcutTable,
        sound: Arc<dyn SoundPlayer>,
        overlay: Arc<dyn OverlaySurface>,
    ) -> Self {
        Self {
            table,
            sound,
            overlay,
            clock: None,
        }
    }

    /// Use a custom clock for timestamps and the arm timer.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Start the loop and dispatcher tasks. Must be called within a Tokio runtime.
    pub fn spawn(self) -> EngineHandle {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(TokioClock::new()) as Arc<dyn Clock>);
        let table = Arc::new(self.table);

        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        let (dispatch_tx, dispatch_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(EngineStatus {
            phase: Phase::Idle,
            table: table.clone(),
            swap_pending: false,
        });

        info!(
            shortcuts = table.len(),
            direct = table.direct_count(),
            suffixes = table.suffix_count(),
            activator = ?table.activator().map(|a| a.chord.to_string()),
            "table_loaded"
        );

        let dispatcher = Dispatcher::new(table.clone(), self.sound, self.overlay);
        let dispatcher_task = tokio::spawn(dispatcher.run(dispatch_rx));

        let cancel = CancellationToken::new();
        let engine_loop = EngineLoop::new(
            table,
            clock.clone(),
            ArmTimer::new(expiry_tx),
            dispatch_tx,
            status_tx,
        );
        let inbox = Inbox {
            input: input_rx,
            expiry: expiry_rx,
        };
        let loop_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            engine_loop.run(inbox, loop_cancel).await;
            // The loop dropped the dispatch sender; let queued actions start.
            if let Err(e) = dispatcher_task.await {
                warn!(error = %e, "dispatcher_join_failed");
            }
        });
        info!("engine_start");

        EngineHandle {
            keys: KeySender::new(input_tx.clone(), clock),
            input: input_tx,
            status: status_rx,
            cancel,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }
}

/// Handle to a running engine. Cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    /// Key intake.
    keys: KeySender,
    /// Requests to the loop, ordered with key events.
    input: UnboundedSender<Input>,
    /// Published loop status.
    status: watch::Receiver<EngineStatus>,
    /// Stops the loop.
    cancel: CancellationToken,
    /// Loop task, taken by the first `shutdown`.
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl EngineHandle {
    /// A sender for key events.
    pub fn key_sender(&self) -> KeySender {
        self.keys.clone()
    }

    /// Replace the shortcut table. Applied at once when idle, otherwise queued
    /// until the chord window closes; a later request replaces a queued one.
    pub fn swap_table(&self, table: ShortcutTable) -> Result<()> {
        self.input
            .send(Input::Swap(Arc::new(table)))
            .map_err(|_| Error::EngineStopped)
    }

    /// Hide the persistent overlay if one is showing.
    pub fn dismiss_overlay(&self) -> Result<()> {
        self.input
            .send(Input::Dismiss)
            .map_err(|_| Error::EngineStopped)
    }

    /// Latest published status.
    pub fn status(&self) -> EngineStatus {
        self.status.borrow().clone()
    }

    /// Current chord phase.
    pub fn phase(&self) -> Phase {
        self.status.borrow().phase
    }

    /// Subscribe to status changes.
    pub fn watch_status(&self) -> watch::Receiver<EngineStatus> {
        self.status.clone()
    }

    /// True once the engine loop has exited.
    pub fn is_stopped(&self) -> bool {
        self.input.is_closed()
    }

    /// Stop the engine and wait for the loop and dispatcher to finish.
    pub async fn shutdown(&self) -> Result<()> {
        let task = self.task.lock().take();
        let Some(task) = task else {
            return Err(Error::EngineStopped);
        };
        self.cancel.cancel();
        if let Err(e) = task.await {
            warn!(error = %e, "engine_join_failed");
        }
        info!("engine_stop");
        Ok(())
    }
}
