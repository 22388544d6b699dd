//! Events that trigger state transitions

use crate::motion::AxisId;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Pins and drivers initialized, drivers released
    HardwareReady,
    /// Homing button for an axis held through the debounce window
    HomeConfirmed(AxisId),
    /// Emergency-stop input asserted
    ForceStop,
    /// No valid command within the watchdog timeout
    WatchdogExpired,
    /// A well-formed command arrived on the link
    CommandReceived,
}
