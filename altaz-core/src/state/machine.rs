//! Operational state machine
//!
//! All motor enable and indicator behavior is a function of the current
//! state. Transitions are pure: the supervisor decides when events occur
//! and performs the side effects.

use super::events::Event;
use crate::motion::AxisId;

/// Indicator blink half-period while homing (ms)
pub const HOMING_BLINK_MS: u64 = 300;

/// Indicator blink half-period while holding on a stale link (ms)
pub const HOLD_BLINK_MS: u64 = 1000;

/// Which axes have captured their origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingProgress {
    /// Azimuth origin captured
    pub azimuth: bool,
    /// Altitude origin captured
    pub altitude: bool,
}

impl HomingProgress {
    /// No axis homed yet
    pub const NONE: Self = Self {
        azimuth: false,
        altitude: false,
    };

    /// Mark `axis` as homed
    pub fn with(mut self, axis: AxisId) -> Self {
        match axis {
            AxisId::Azimuth => self.azimuth = true,
            AxisId::Altitude => self.altitude = true,
        }
        self
    }

    /// Check if `axis` has been homed
    pub fn is_homed(&self, axis: AxisId) -> bool {
        match axis {
            AxisId::Azimuth => self.azimuth,
            AxisId::Altitude => self.altitude,
        }
    }

    /// Check if both axes have been homed
    pub fn is_complete(&self) -> bool {
        self.azimuth && self.altitude
    }
}

/// Mount operational states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationalState {
    /// Power-on, hardware not yet initialized
    Boot,
    /// Waiting for the operator to home each axis
    Homing(HomingProgress),
    /// Tracking commands from a live link
    Ready,
    /// Link silent past the watchdog timeout; axes finish their last move
    HoldStale,
    /// Emergency stop latched; only a power cycle clears it
    EmergencyStopped,
    /// Stop requested before homing finished; only a power cycle clears it
    Halted,
}

impl OperationalState {
    /// Check if this state allows the motors to be energized
    pub fn motors_enabled(&self) -> bool {
        matches!(self, OperationalState::Ready | OperationalState::HoldStale)
    }

    /// Check if a command received in this state is applied
    pub fn accepts_commands(&self) -> bool {
        matches!(self, OperationalState::Ready | OperationalState::HoldStale)
    }

    /// Check if the operator is homing
    pub fn is_homing(&self) -> bool {
        matches!(self, OperationalState::Homing(_))
    }

    /// Check if this state can never be left
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationalState::EmergencyStopped | OperationalState::Halted
        )
    }

    /// Indicator level at `now_ms`
    ///
    /// Off at boot and when stopped, slow blink on a stale link, fast blink
    /// while homing, solid when ready.
    pub fn indicator_on(&self, now_ms: u64) -> bool {
        match self {
            OperationalState::Boot
            | OperationalState::EmergencyStopped
            | OperationalState::Halted => false,
            OperationalState::Homing(_) => (now_ms / HOMING_BLINK_MS) % 2 == 0,
            OperationalState::Ready => true,
            OperationalState::HoldStale => (now_ms / HOLD_BLINK_MS) % 2 == 0,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use OperationalState::*;

        match (self, event) {
            // Terminal states absorb everything
            (EmergencyStopped, _) | (Halted, _) => self,

            // Boot
            (Boot, HardwareReady) => Homing(HomingProgress::NONE),
            (Boot, ForceStop) => Halted,

            // Homing
            (Homing(progress), HomeConfirmed(axis)) => {
                let progress = progress.with(axis);
                if progress.is_complete() {
                    Ready
                } else {
                    Homing(progress)
                }
            }
            (Homing(_), ForceStop) => Halted,

            // Ready
            (Ready, WatchdogExpired) => HoldStale,
            (Ready, ForceStop) => EmergencyStopped,

            // HoldStale
            (HoldStale, CommandReceived) => Ready,
            (HoldStale, ForceStop) => EmergencyStopped,

            // Default: stay in current state
            _ => self,
        }
    }
}
