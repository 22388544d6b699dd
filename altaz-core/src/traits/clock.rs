//! Monotonic time source

/// Microsecond monotonic clock
///
/// Read repeatedly within one control iteration, so step timing stays
/// accurate while the command link is drained.
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&self) -> u64;

    /// Milliseconds since the same origin
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
