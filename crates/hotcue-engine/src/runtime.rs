//! The engine loop: the only owner of chord state, the live table, the pending
//! swap and the arm timer.

use std::sync::Arc;

use chordmode::{DisarmReason, KeyEvent, KeyResponse, Phase, ShortcutTable, State, Trigger};
use tokio::sync::{
    mpsc::{UnboundedReceiver, UnboundedSender},
    watch,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::{Clock, dispatcher::DispatchMsg, timer::ArmTimer};

/// Everything the loop consumes from senders and handles, on one channel so
/// requests are served in the order they were sent.
#[derive(Debug)]
pub(crate) enum Input {
    /// A key event from a [`crate::KeySender`].
    Key(KeyEvent),
    /// Install a new table once idle.
    Swap(Arc<ShortcutTable>),
    /// Hide the persistent overlay.
    Dismiss,
}

/// Observable engine state, published after every step.
#[derive(Debug, Clone)]
pub struct EngineStatus {
    /// Chord phase.
    pub phase: Phase,
    /// Table currently used for matching.
    pub table: Arc<ShortcutTable>,
    /// True while a swap waits for the machine to go idle.
    pub swap_pending: bool,
}

/// Receiving ends consumed by the loop.
pub(crate) struct Inbox {
    /// Key events and handle requests, in send order.
    pub(crate) input: UnboundedReceiver<Input>,
    /// Arm timer expiries, by generation.
    pub(crate) expiry: UnboundedReceiver<u64>,
}

/// Loop state.
pub(crate) struct EngineLoop {
    /// Chord state machine.
    state: State,
    /// Table used for matching.
    table: Arc<ShortcutTable>,
    /// Latest swap requested while armed.
    pending: Option<Arc<ShortcutTable>>,
    /// Arm timeout scheduler.
    timer: ArmTimer,
    /// Timestamp source shared with key senders.
    clock: Arc<dyn Clock>,
    /// Dispatcher channel.
    dispatch: UnboundedSender<DispatchMsg>,
    /// Status publication.
    status: watch::Sender<EngineStatus>,
}

impl EngineLoop {
    /// Build the loop around `table`.
    pub(crate) fn new(
        table: Arc<ShortcutTable>,
        clock: Arc<dyn Clock>,
        timer: ArmTimer,
        dispatch: UnboundedSender<DispatchMsg>,
        status: watch::Sender<EngineStatus>,
    ) -> Self {
        Self {
            state: State::new(),
            table,
            pending: None,
            timer,
            clock,
            dispatch,
            status,
        }
    }

    /// Run until cancelled or until every handle is gone.
    pub(crate) async fn run(mut self, mut inbox: Inbox, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(generation) = inbox.expiry.recv() => self.on_expiry(generation),
                input = inbox.input.recv() => match input {
                    Some(Input::Key(ev)) => self.on_key(&ev),
                    Some(Input::Swap(table)) => self.on_swap(table),
                    Some(Input::Dismiss) => self.forward(DispatchMsg::Dismiss),
                    None => break,
                },
            }
            self.publish();
        }
        self.timer.cancel();
        trace!("engine_loop_exit");
    }

    /// Handle one key event.
    fn on_key(&mut self, ev: &KeyEvent) {
        trace!(key = %ev.key, down = ev.is_down, ts = ev.timestamp_ms, "key_event");
        // Close a stale window first so a queued swap applies before this event.
        if self.state.expire(ev.timestamp_ms) {
            self.on_timeout();
        }
        let step = self.state.handle_key(&self.table, ev);
        match step.response {
            KeyResponse::Ignored => {}
            KeyResponse::Fired(trigger) | KeyResponse::Matched(trigger) => self.fire(trigger),
            KeyResponse::Armed { deadline_ms } => {
                info!(
                    deadline_ms,
                    timeout_ms = self.state.chord().timeout_ms,
                    "activator_armed"
                );
                self.timer.arm(self.clock.until(deadline_ms));
            }
            KeyResponse::Partial { prefix, ambiguous } => {
                let prefix: Vec<String> = prefix.iter().map(|k| k.to_spec()).collect();
                debug!(prefix = %prefix.join(" "), ambiguous, "chord_partial");
            }
            KeyResponse::Disarmed(reason) => self.log_disarm(reason),
        }
        if self.state.is_idle() {
            self.settle_idle();
        }
    }

    /// Handle an arm timer expiry.
    fn on_expiry(&mut self, generation: u64) {
        if !self.timer.take_if_current(generation) {
            trace!(generation, "arm_timer_stale");
            return;
        }
        let deadline = self.state.chord().deadline_ms();
        if self.state.expire(self.clock.now_ms()) {
            self.on_timeout();
        } else if let Some(deadline) = deadline {
            // Woke before the deadline in clock terms; wait out the rest.
            self.timer.arm(self.clock.until(deadline));
        }
    }

    /// Bookkeeping after the window closed through timeout.
    fn on_timeout(&mut self) {
        info!("activator_timeout");
        self.log_disarm(DisarmReason::Timeout);
        self.settle_idle();
    }

    /// Emit a trigger to the dispatcher.
    fn fire(&self, trigger: Trigger) {
        let label = self
            .table
            .shortcut(trigger.shortcut)
            .map(|s| s.label())
            .unwrap_or_default();
        info!(
            shortcut = %trigger.shortcut,
            label = %label,
            fired_at_ms = trigger.fired_at_ms,
            "trigger_fired"
        );
        self.forward(DispatchMsg::Fire(trigger));
    }

    /// Log the window closing without a trigger.
    fn log_disarm(&self, reason: DisarmReason) {
        info!(reason = reason.as_str(), "activator_disarmed");
    }

    /// Work that happens whenever the machine is idle: stop the timer and
    /// apply a queued swap.
    fn settle_idle(&mut self) {
        self.timer.cancel();
        if let Some(table) = self.pending.take() {
            self.apply(table);
        }
    }

    /// Handle a swap request.
    fn on_swap(&mut self, table: Arc<ShortcutTable>) {
        if self.state.is_idle() {
            self.apply(table);
        } else {
            info!(phase = ?self.state.phase(), "table_swap_queued");
            self.pending = Some(table);
        }
    }

    /// Install `table` unless it equals the live one.
    fn apply(&mut self, table: Arc<ShortcutTable>) {
        if *table == *self.table {
            debug!("table_unchanged");
            return;
        }
        info!(
            shortcuts = table.len(),
            direct = table.direct_count(),
            suffixes = table.suffix_count(),
            "table_swapped"
        );
        self.table = table;
        self.forward(DispatchMsg::Table(self.table.clone()));
    }

    /// Send to the dispatcher; only fails if it has exited.
    fn forward(&self, msg: DispatchMsg) {
        if self.dispatch.send(msg).is_err() {
            warn!("dispatcher_gone");
        }
    }

    /// Publish the current status.
    fn publish(&self) {
        self.status.send_if_modified(|s| {
            let phase = self.state.phase();
            let swap_pending = self.pending.is_some();
            let changed = s.phase != phase
                || s.swap_pending != swap_pending
                || !Arc::ptr_eq(&s.table, &self.table);
            if changed {
                *s = EngineStatus {
                    phase,
                    table: self.table.clone(),
                    swap_pending,
                };
            }
            changed
        });
    }
}
