//! Homing button debounce
//!
//! A press arms a timer; once the window has elapsed the press is committed
//! no matter what the line reads by then. After committing the button is
//! ignored until the debouncer is rebuilt.

/// One-shot press detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debounce {
    window_ms: u32,
    armed_at_ms: Option<u64>,
    committed: bool,
}

impl Debounce {
    /// Create a debouncer with the given settle window
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            armed_at_ms: None,
            committed: false,
        }
    }

    /// Feed the current level; true exactly once, when the press commits
    pub fn poll(&mut self, pressed: bool, now_ms: u64) -> bool {
        if self.committed {
            return false;
        }

        if self.armed_at_ms.is_none() && pressed {
            self.armed_at_ms = Some(now_ms);
        }

        match self.armed_at_ms {
            Some(armed) if now_ms.saturating_sub(armed) >= u64::from(self.window_ms) => {
                self.armed_at_ms = None;
                self.committed = true;
                true
            }
            _ => false,
        }
    }

    /// Check if a press is waiting out the window
    pub fn is_pending(&self) -> bool {
        self.armed_at_ms.is_some()
    }

    /// Check if a press has been committed
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}
