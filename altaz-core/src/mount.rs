//! Cooperative mount controller
//!
//! Single-threaded control loop body. Each [`MountController::poll`]:
//!
//! 1. Samples the operator inputs and lets the supervisor react
//!    (emergency stop, homing capture, watchdog)
//! 2. Gives each axis a chance to step
//! 3. Drains buffered link bytes through the decoder, stepping the axes
//!    again between bytes so parsing never starves motion
//!
//! Nothing in a poll waits. Callers spin it as fast as the executor allows.

use heapless::Vec;

use altaz_protocol::{CommandDecoder, DecoderStats, MountCommand};

use crate::config::MountConfig;
use crate::motion::{AxisController, AxisId, TargetResolver};
use crate::safety::supervisor::MAX_OUTCOMES;
use crate::safety::{Directive, Outcome, Supervisor, Transition};
use crate::state::OperationalState;
use crate::traits::{CommandLink, ControlPanel, MonotonicClock, StepOutput};

/// Upper bound on link bytes consumed per poll
///
/// Matches the link receive buffer, so a poll drains whatever was buffered
/// when it started while a flooding client still cannot delay the next
/// emergency-stop sample indefinitely.
pub const MAX_BYTES_PER_POLL: usize = 256;

/// What happened during one poll
#[derive(Debug, Clone, Default)]
pub struct PollReport {
    /// State changes, in order
    pub transitions: Vec<Transition, MAX_OUTCOMES>,
    /// Most recent command applied to the axes
    pub last_command: Option<MountCommand>,
    /// Commands applied
    pub applied: u16,
    /// Commands decoded but refused by the supervisor
    pub rejected: u16,
    /// Step pulses emitted across both axes
    pub steps: u16,
    /// A new client connected during this poll
    pub client_connected: bool,
}

impl PollReport {
    fn record(&mut self, transitions: &[Transition]) {
        for transition in transitions {
            let _ = self.transitions.push(*transition);
        }
    }
}

/// Two-axis mount controller
pub struct MountController<AZ, ALT> {
    supervisor: Supervisor,
    decoder: CommandDecoder,
    resolver: TargetResolver,
    azimuth: AxisController,
    altitude: AxisController,
    azimuth_out: AZ,
    altitude_out: ALT,
}

impl<AZ: StepOutput, ALT: StepOutput> MountController<AZ, ALT> {
    /// Create a controller in [`OperationalState::Boot`]
    pub fn new(config: &MountConfig, azimuth_out: AZ, altitude_out: ALT) -> Self {
        Self {
            supervisor: Supervisor::new(config),
            decoder: CommandDecoder::new(),
            resolver: TargetResolver::new(config),
            azimuth: AxisController::new(AxisId::Azimuth, &config.azimuth),
            altitude: AxisController::new(AxisId::Altitude, &config.altitude),
            azimuth_out,
            altitude_out,
        }
    }

    /// Finish boot: release the drivers and start homing
    pub fn begin<P: ControlPanel>(&mut self, panel: &mut P, now_ms: u64) -> PollReport {
        let mut outcome = Outcome::new();
        self.supervisor.hardware_ready(now_ms, &mut outcome);
        self.apply(&outcome.directives, panel);
        panel.set_indicator(self.supervisor.indicator_on(now_ms));

        let mut report = PollReport::default();
        report.record(&outcome.transitions);
        report
    }

    /// Run one control iteration
    pub fn poll<P, L, C>(&mut self, panel: &mut P, link: &mut L, clock: &C) -> PollReport
    where
        P: ControlPanel,
        L: CommandLink,
        C: MonotonicClock,
    {
        let mut report = PollReport::default();
        let now_ms = clock.now_ms();

        let mut outcome = Outcome::new();
        self.supervisor.update(panel.sample(), now_ms, &mut outcome);
        self.apply(&outcome.directives, panel);
        report.record(&outcome.transitions);

        if self.supervisor.state().is_terminal() {
            // Re-asserted every pass; the link is left unread
            panel.set_drivers_enabled(false);
            panel.set_indicator(false);
            return report;
        }

        self.tick_axes(clock.now_us(), &mut report);

        if link.poll_accept() {
            self.decoder.reset();
            self.supervisor.client_connected(now_ms);
            report.client_connected = true;
        }

        for _ in 0..MAX_BYTES_PER_POLL {
            let Some(byte) = link.try_read_byte() else {
                break;
            };
            if let Some(command) = self.decoder.feed(byte) {
                self.handle_command(command, clock.now_ms(), panel, &mut report);
            }
            self.tick_axes(clock.now_us(), &mut report);
        }

        panel.set_indicator(self.supervisor.indicator_on(now_ms));
        report
    }

    /// Current operational state
    pub fn state(&self) -> OperationalState {
        self.supervisor.state()
    }

    /// Safety supervisor
    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Controller for `axis`
    pub fn axis(&self, axis: AxisId) -> &AxisController {
        match axis {
            AxisId::Azimuth => &self.azimuth,
            AxisId::Altitude => &self.altitude,
        }
    }

    /// Azimuth controller
    pub fn azimuth(&self) -> &AxisController {
        &self.azimuth
    }

    /// Altitude controller
    pub fn altitude(&self) -> &AxisController {
        &self.altitude
    }

    /// Link decoder counters
    pub fn decoder_stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    /// Step outputs, azimuth first
    pub fn outputs(&self) -> (&AZ, &ALT) {
        (&self.azimuth_out, &self.altitude_out)
    }

    fn handle_command<P: ControlPanel>(
        &mut self,
        command: MountCommand,
        now_ms: u64,
        panel: &mut P,
        report: &mut PollReport,
    ) {
        let mut outcome = Outcome::new();
        if !self.supervisor.admit_command(now_ms, &mut outcome) {
            report.rejected = report.rejected.saturating_add(1);
            return;
        }
        self.apply(&outcome.directives, panel);
        report.record(&outcome.transitions);

        let azimuth = self
            .resolver
            .resolve_azimuth(command.azimuth_deg, self.azimuth.current_steps());
        let altitude = self.resolver.resolve_altitude(command.altitude_deg);

        let applied = self
            .azimuth
            .set_target_steps(azimuth)
            .and_then(|()| self.altitude.set_target_steps(altitude));

        match applied {
            Ok(()) => {
                report.applied = report.applied.saturating_add(1);
                report.last_command = Some(command);
            }
            Err(_) => {
                report.rejected = report.rejected.saturating_add(1);
            }
        }
    }

    fn tick_axes(&mut self, now_us: u64, report: &mut PollReport) {
        if let Some(direction) = self.azimuth.tick(now_us) {
            self.azimuth_out.step(direction);
            report.steps = report.steps.saturating_add(1);
        }
        if let Some(direction) = self.altitude.tick(now_us) {
            self.altitude_out.step(direction);
            report.steps = report.steps.saturating_add(1);
        }
    }

    fn apply<P: ControlPanel>(&mut self, directives: &[Directive], panel: &mut P) {
        for directive in directives {
            match *directive {
                Directive::ResetOrigin(AxisId::Azimuth) => self.azimuth.reset_origin(),
                Directive::ResetOrigin(AxisId::Altitude) => self.altitude.reset_origin(),
                Directive::EnableMotors => {
                    self.azimuth.set_enabled(true);
                    self.altitude.set_enabled(true);
                    panel.set_drivers_enabled(true);
                }
                Directive::DisableMotors => {
                    self.azimuth.set_enabled(false);
                    self.altitude.set_enabled(false);
                    panel.set_drivers_enabled(false);
                }
            }
        }
    }
}
