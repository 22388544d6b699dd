//! Command watchdog
//!
//! Tracks the time since the last valid command. Expiry is strictly greater
//! than the timeout.

/// Stale-command timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Watchdog {
    timeout_ms: u32,
    last_valid_ms: Option<u64>,
}

impl Watchdog {
    /// Create a disarmed watchdog
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            last_valid_ms: None,
        }
    }

    /// Start (or restart) timing from `now_ms`
    pub fn arm(&mut self, now_ms: u64) {
        self.last_valid_ms = Some(now_ms);
    }

    /// Record a valid command or a fresh client at `now_ms`
    pub fn refresh(&mut self, now_ms: u64) {
        self.arm(now_ms);
    }

    /// Stop timing
    pub fn disarm(&mut self) {
        self.last_valid_ms = None;
    }

    /// Check if the watchdog is timing
    pub fn is_armed(&self) -> bool {
        self.last_valid_ms.is_some()
    }

    /// Milliseconds since the last refresh, if armed
    pub fn elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        self.last_valid_ms.map(|last| now_ms.saturating_sub(last))
    }

    /// Check if more than the timeout has passed since the last refresh
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.elapsed_ms(now_ms)
            .is_some_and(|elapsed| elapsed > u64::from(self.timeout_ms))
    }
}
