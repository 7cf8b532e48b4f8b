use keycode::Key;

/// A normalized key transition from the platform layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    /// Abstract key identity.
    pub key: Key,
    /// True for a press, false for a release.
    pub is_down: bool,
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl KeyEvent {
    /// A key press at `timestamp_ms`.
    pub fn down(key: Key, timestamp_ms: u64) -> Self {
        Self {
            key,
            is_down: true,
            timestamp_ms,
        }
    }

    /// A key release at `timestamp_ms`.
    pub fn up(key: Key, timestamp_ms: u64) -> Self {
        Self {
            key,
            is_down: false,
            timestamp_ms,
        }
    }
}
