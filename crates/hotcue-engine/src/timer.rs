//! One-shot arm timer that delivers expiry into the engine loop.

use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, time};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Schedules at most one pending expiry. Each arm gets a new generation so a
/// late message from a cancelled timer can be recognised and dropped.
pub(crate) struct ArmTimer {
    /// Channel back into the engine loop; carries the generation that fired.
    tx: UnboundedSender<u64>,
    /// Cancellation for the pending sleep, if any.
    token: Option<CancellationToken>,
    /// Generation of the most recent arm.
    generation: u64,
}

impl ArmTimer {
    /// Create an idle timer reporting into `tx`.
    pub(crate) fn new(tx: UnboundedSender<u64>) -> Self {
        Self {
            tx,
            token: None,
            generation: 0,
        }
    }

    /// Replace any pending expiry with one firing after `delay`.
    pub(crate) fn arm(&mut self, delay: Duration) {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        let cancel = token.clone();
        let tx = self.tx.clone();
        trace!(generation, delay_ms = delay.as_millis(), "arm_timer_start");
        tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => {
                    if tx.send(generation).is_err() {
                        trace!(generation, "arm_timer_orphaned");
                    }
                }
                _ = cancel.cancelled() => {
                    trace!(generation, "arm_timer_cancelled");
                }
            }
        });
        self.token = Some(token);
    }

    /// Cancel the pending expiry, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    /// True if `generation` is the live arm. Consumes it so it fires once.
    pub(crate) fn take_if_current(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.token.is_some() {
            self.token = None;
            true
        } else {
            false
        }
    }

    /// True while an expiry is pending.
    pub(crate) fn is_pending(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_once_with_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = ArmTimer::new(tx);
        timer.arm(Duration::from_millis(100));
        assert!(timer.is_pending());
        time::sleep(Duration::from_millis(101)).await;
        let generation = rx.try_recv().expect("expiry");
        assert!(timer.take_if_current(generation));
        assert!(!timer.take_if_current(generation));
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_supersedes_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = ArmTimer::new(tx);
        timer.arm(Duration::from_millis(100));
        timer.arm(Duration::from_millis(300));
        time::sleep(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());
        time::sleep(Duration::from_millis(200)).await;
        let generation = rx.try_recv().expect("expiry");
        assert_eq!(generation, 2);
        assert!(timer.take_if_current(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_expiry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = ArmTimer::new(tx);
        timer.arm(Duration::from_millis(100));
        timer.cancel();
        time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timer.is_pending());
    }
}
