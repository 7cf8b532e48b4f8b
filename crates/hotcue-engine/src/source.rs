//! Key event intake: timestamping sender handles and the crossbeam bridge used
//! by platform hook threads that run without an async runtime.

use std::{sync::Arc, thread};

use chordmode::KeyEvent;
use crossbeam_channel::Receiver;
use keycode::Key;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use crate::{Clock, Error, Result, runtime::Input};

/// Bridge a crossbeam receiver into a tokio unbounded receiver.
///
/// A dedicated thread forwards items until either side disconnects.
pub fn bridge_crossbeam_to_tokio<T: Send + 'static>(rx: Receiver<T>) -> UnboundedReceiver<T> {
    let (tx_tokio, rx_tokio) = mpsc::unbounded_channel();

    thread::spawn(move || {
        while let Ok(item) = rx.recv() {
            if tx_tokio.send(item).is_err() {
                break;
            }
        }
        trace!("bridge_closed");
    });

    rx_tokio
}

/// Cloneable handle that feeds key events into a running engine.
///
/// Sending never blocks and works from any thread.
#[derive(Clone)]
pub struct KeySender {
    /// Engine input channel.
    tx: UnboundedSender<Input>,
    /// Clock used to stamp `press`/`release` events.
    clock: Arc<dyn Clock>,
}

impl KeySender {
    /// Create a sender over the engine's input channel.
    pub(crate) fn new(tx: UnboundedSender<Input>, clock: Arc<dyn Clock>) -> Self {
        Self { tx, clock }
    }

    /// Send a key-down stamped with the engine clock.
    pub fn press(&self, key: Key) -> Result<()> {
        self.send(KeyEvent::down(key, self.clock.now_ms()))
    }

    /// Send a key-up stamped with the engine clock.
    pub fn release(&self, key: Key) -> Result<()> {
        self.send(KeyEvent::up(key, self.clock.now_ms()))
    }

    /// Send an event that already carries a timestamp in the engine clock domain.
    pub fn send(&self, event: KeyEvent) -> Result<()> {
        self.tx.send(Input::Key(event)).map_err(|_| Error::EngineStopped)
    }

    /// Forward events from a crossbeam channel, such as one filled by an OS hook
    /// thread, into the engine. Returns immediately.
    pub fn forward_from(&self, rx: Receiver<KeyEvent>) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            while let Ok(ev) = rx.recv() {
                if tx.send(Input::Key(ev)).is_err() {
                    break;
                }
            }
            trace!("key_forward_closed");
        });
    }
}
