//! Monotonic millisecond clock shared by event timestamps and the arm timer.

use std::time::Duration;

use tokio::time::Instant;

/// Source of monotonic timestamps in milliseconds.
pub trait Clock: Send + Sync + 'static {
    /// Milliseconds since the clock's origin.
    fn now_ms(&self) -> u64;

    /// Time left until `deadline_ms`, zero if it has passed.
    fn until(&self, deadline_ms: u64) -> Duration {
        Duration::from_millis(deadline_ms.saturating_sub(self.now_ms()))
    }
}

/// Clock backed by `tokio::time::Instant`, so paused test time drives it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    /// Instant that maps to timestamp zero.
    origin: Instant,
}

impl TokioClock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn follows_paused_time() {
        let clock = TokioClock::new();
        assert_eq!(clock.now_ms(), 0);
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(clock.now_ms(), 250);
        assert_eq!(clock.until(300), Duration::from_millis(50));
        assert_eq!(clock.until(100), Duration::ZERO);
    }
}
