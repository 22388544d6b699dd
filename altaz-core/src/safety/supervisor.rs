//! Safety supervisor
//!
//! Owns the operational state and turns raw inputs and link activity into
//! state events. Side effects are not performed here; they are returned as
//! [`Directive`]s for the controller to carry out, together with a record of
//! every state change for logging.
//!
//! Priority within one update: emergency stop first, then homing capture,
//! then the watchdog.

use heapless::Vec;

use super::debounce::Debounce;
use super::watchdog::Watchdog;
use crate::config::MountConfig;
use crate::motion::AxisId;
use crate::state::{Event, OperationalState};

/// Capacity of the per-iteration directive and transition lists
pub const MAX_OUTCOMES: usize = 4;

/// One reading of the operator inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    /// Emergency-stop switch asserted
    pub force_stop: bool,
    /// Azimuth homing button pressed
    pub home_azimuth: bool,
    /// Altitude homing button pressed
    pub home_altitude: bool,
}

impl InputSample {
    /// Homing button level for `axis`
    pub fn home(&self, axis: AxisId) -> bool {
        match axis {
            AxisId::Azimuth => self.home_azimuth,
            AxisId::Altitude => self.home_altitude,
        }
    }
}

/// Side effect requested by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Directive {
    /// Declare the axis' current position as step zero
    ResetOrigin(AxisId),
    /// Energize the drivers and allow step output
    EnableMotors,
    /// Release the drivers and stop step output
    DisableMotors,
}

/// A state change and its cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: OperationalState,
    pub to: OperationalState,
    pub event: Event,
}

/// Directives and transitions produced during one control iteration
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub directives: Vec<Directive, MAX_OUTCOMES>,
    pub transitions: Vec<Transition, MAX_OUTCOMES>,
}

impl Outcome {
    /// Create an empty outcome
    pub const fn new() -> Self {
        Self {
            directives: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Drop all recorded entries
    pub fn clear(&mut self) {
        self.directives.clear();
        self.transitions.clear();
    }

    /// Check if nothing was produced
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.transitions.is_empty()
    }

    fn direct(&mut self, directive: Directive) {
        // Bounded by construction: at most two origin resets and one enable
        let _ = self.directives.push(directive);
    }

    fn record(&mut self, transition: Transition) {
        let _ = self.transitions.push(transition);
    }
}

/// Operational state owner and safety policy
#[derive(Debug, Clone)]
pub struct Supervisor {
    state: OperationalState,
    homing: [Debounce; 2],
    watchdog: Watchdog,
}

impl Supervisor {
    /// Create a supervisor in [`OperationalState::Boot`]
    pub fn new(config: &MountConfig) -> Self {
        Self {
            state: OperationalState::Boot,
            homing: [Debounce::new(config.homing_debounce_ms); 2],
            watchdog: Watchdog::new(config.watchdog_timeout_ms),
        }
    }

    /// Current operational state
    pub fn state(&self) -> OperationalState {
        self.state
    }

    /// Stale-command timer
    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    /// Check if the drivers should be energized
    pub fn motors_enabled(&self) -> bool {
        self.state.motors_enabled()
    }

    /// Indicator level at `now_ms`
    pub fn indicator_on(&self, now_ms: u64) -> bool {
        self.state.indicator_on(now_ms)
    }

    /// Hardware initialized with drivers released: start homing
    pub fn hardware_ready(&mut self, now_ms: u64, outcome: &mut Outcome) {
        outcome.direct(Directive::DisableMotors);
        self.dispatch(Event::HardwareReady, now_ms, outcome);
    }

    /// Evaluate operator inputs and the watchdog
    pub fn update(&mut self, inputs: InputSample, now_ms: u64, outcome: &mut Outcome) {
        if inputs.force_stop {
            self.dispatch(Event::ForceStop, now_ms, outcome);
            return;
        }

        match self.state {
            OperationalState::Homing(progress) => {
                for axis in AxisId::ALL {
                    if progress.is_homed(axis) {
                        continue;
                    }
                    if self.homing[axis.index()].poll(inputs.home(axis), now_ms) {
                        outcome.direct(Directive::ResetOrigin(axis));
                        self.dispatch(Event::HomeConfirmed(axis), now_ms, outcome);
                    }
                }
            }
            OperationalState::Ready => {
                if self.watchdog.is_expired(now_ms) {
                    self.dispatch(Event::WatchdogExpired, now_ms, outcome);
                }
            }
            _ => {}
        }
    }

    /// Decide whether a decoded command may be applied
    ///
    /// Accepted commands refresh the watchdog and revive a stale hold.
    pub fn admit_command(&mut self, now_ms: u64, outcome: &mut Outcome) -> bool {
        if !self.state.accepts_commands() {
            return false;
        }
        self.watchdog.refresh(now_ms);
        self.dispatch(Event::CommandReceived, now_ms, outcome);
        true
    }

    /// A new client connected: restart the watchdog clock
    ///
    /// Does not by itself leave [`OperationalState::HoldStale`].
    pub fn client_connected(&mut self, now_ms: u64) {
        if self.state.accepts_commands() {
            self.watchdog.refresh(now_ms);
        }
    }

    fn dispatch(&mut self, event: Event, now_ms: u64, outcome: &mut Outcome) {
        let from = self.state;
        let to = from.transition(event);
        if to == from {
            return;
        }
        self.state = to;

        match to {
            OperationalState::Ready => {
                if !from.motors_enabled() {
                    outcome.direct(Directive::EnableMotors);
                }
                self.watchdog.arm(now_ms);
            }
            OperationalState::EmergencyStopped | OperationalState::Halted => {
                self.watchdog.disarm();
                outcome.direct(Directive::DisableMotors);
            }
            _ => {}
        }

        outcome.record(Transition { from, to, event });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HomingProgress;

    const IDLE: InputSample = InputSample {
        force_stop: false,
        home_azimuth: false,
        home_altitude: false,
    };

    const STOP: InputSample = InputSample {
        force_stop: true,
        home_azimuth: false,
        home_altitude: false,
    };

    fn homing() -> Supervisor {
        let mut supervisor = Supervisor::new(&MountConfig::default());
        let mut outcome = Outcome::new();
        supervisor.hardware_ready(0, &mut outcome);
        supervisor
    }

    fn ready(now_ms: u64) -> Supervisor {
        let mut supervisor = homing();
        let mut outcome = Outcome::new();
        let both = InputSample {
            home_azimuth: true,
            home_altitude: true,
            ..IDLE
        };
        supervisor.update(both, now_ms - 200, &mut outcome);
        supervisor.update(IDLE, now_ms, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::Ready);
        supervisor
    }

    #[test]
    fn test_hardware_ready_starts_homing() {
        let mut supervisor = Supervisor::new(&MountConfig::default());
        let mut outcome = Outcome::new();
        supervisor.hardware_ready(0, &mut outcome);

        assert_eq!(
            supervisor.state(),
            OperationalState::Homing(HomingProgress::NONE)
        );
        assert_eq!(outcome.directives.as_slice(), &[Directive::DisableMotors]);
        assert_eq!(outcome.transitions.len(), 1);
        assert_eq!(outcome.transitions[0].from, OperationalState::Boot);
    }

    #[test]
    fn test_homing_sequence() {
        let mut supervisor = homing();
        let mut outcome = Outcome::new();

        // Azimuth pressed at 1000, committed at 1200
        supervisor.update(InputSample { home_azimuth: true, ..IDLE }, 1000, &mut outcome);
        assert!(outcome.is_empty());
        supervisor.update(IDLE, 1199, &mut outcome);
        assert!(outcome.is_empty());
        supervisor.update(IDLE, 1200, &mut outcome);
        assert_eq!(
            outcome.directives.as_slice(),
            &[Directive::ResetOrigin(AxisId::Azimuth)]
        );
        assert!(supervisor.state().is_homing());
        assert!(!supervisor.motors_enabled());

        outcome.clear();
        supervisor.update(InputSample { home_altitude: true, ..IDLE }, 2000, &mut outcome);
        supervisor.update(IDLE, 2200, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::Ready);
        assert_eq!(
            outcome.directives.as_slice(),
            &[Directive::ResetOrigin(AxisId::Altitude), Directive::EnableMotors]
        );
        assert!(supervisor.watchdog().is_armed());
    }

    #[test]
    fn test_repeat_press_after_homing_ignored() {
        let mut supervisor = homing();
        let mut outcome = Outcome::new();
        supervisor.update(InputSample { home_azimuth: true, ..IDLE }, 0, &mut outcome);
        supervisor.update(InputSample { home_azimuth: true, ..IDLE }, 200, &mut outcome);
        outcome.clear();

        supervisor.update(InputSample { home_azimuth: true, ..IDLE }, 500, &mut outcome);
        supervisor.update(InputSample { home_azimuth: true, ..IDLE }, 900, &mut outcome);
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_force_stop_during_debounce_halts() {
        let mut supervisor = homing();
        let mut outcome = Outcome::new();
        supervisor.update(InputSample { home_azimuth: true, ..IDLE }, 0, &mut outcome);
        supervisor.update(
            InputSample {
                force_stop: true,
                home_azimuth: true,
                ..IDLE
            },
            250,
            &mut outcome,
        );

        assert_eq!(supervisor.state(), OperationalState::Halted);
        assert_eq!(outcome.directives.as_slice(), &[Directive::DisableMotors]);

        // Latched
        outcome.clear();
        supervisor.update(IDLE, 10_000, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::Halted);
        assert!(!supervisor.admit_command(10_000, &mut outcome));
    }

    #[test]
    fn test_watchdog_expiry_and_recovery() {
        let mut supervisor = ready(1000);
        let mut outcome = Outcome::new();

        supervisor.update(IDLE, 6000, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::Ready);
        supervisor.update(IDLE, 6001, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::HoldStale);
        assert!(supervisor.motors_enabled());
        assert!(outcome.directives.is_empty());

        outcome.clear();
        assert!(supervisor.admit_command(7000, &mut outcome));
        assert_eq!(supervisor.state(), OperationalState::Ready);
        assert_eq!(outcome.transitions[0].event, Event::CommandReceived);
        assert!(outcome.directives.is_empty());
    }

    #[test]
    fn test_commands_refresh_watchdog() {
        let mut supervisor = ready(1000);
        let mut outcome = Outcome::new();
        assert!(supervisor.admit_command(5000, &mut outcome));
        supervisor.update(IDLE, 9000, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::Ready);
        supervisor.update(IDLE, 10_001, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::HoldStale);
    }

    #[test]
    fn test_client_connect_refreshes_but_does_not_revive() {
        let mut supervisor = ready(1000);
        let mut outcome = Outcome::new();
        supervisor.client_connected(5000);
        supervisor.update(IDLE, 9000, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::Ready);

        supervisor.update(IDLE, 10_001, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::HoldStale);
        supervisor.client_connected(10_500);
        supervisor.update(IDLE, 10_600, &mut outcome);
        assert_eq!(supervisor.state(), OperationalState::HoldStale);
    }

    #[test]
    fn test_commands_rejected_while_homing() {
        let mut supervisor = homing();
        let mut outcome = Outcome::new();
        assert!(!supervisor.admit_command(100, &mut outcome));
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_emergency_stop_latches() {
        for state_at_stop in [OperationalState::Ready, OperationalState::HoldStale] {
            let mut supervisor = ready(1000);
            let mut outcome = Outcome::new();
            if state_at_stop == OperationalState::HoldStale {
                supervisor.update(IDLE, 7000, &mut outcome);
            }
            assert_eq!(supervisor.state(), state_at_stop);

            outcome.clear();
            supervisor.update(STOP, 7100, &mut outcome);
            assert_eq!(supervisor.state(), OperationalState::EmergencyStopped);
            assert_eq!(outcome.directives.as_slice(), &[Directive::DisableMotors]);
            assert!(!supervisor.motors_enabled());

            // Releasing the switch does not recover
            outcome.clear();
            supervisor.update(IDLE, 8000, &mut outcome);
            assert!(!supervisor.admit_command(8000, &mut outcome));
            assert_eq!(supervisor.state(), OperationalState::EmergencyStopped);
            assert!(outcome.is_empty());
        }
    }
}
