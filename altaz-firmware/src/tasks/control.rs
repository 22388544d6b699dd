//! Control task
//!
//! Runs the mount's cooperative loop. Every pass polls the controller once
//! and then yields, so the link and network tasks get the CPU between passes
//! without the loop ever waiting on them.

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::Instant;

use altaz_core::traits::{CommandLink, MonotonicClock, PinPanel};
use altaz_core::{MountController, PollReport};
use altaz_hal_rp2040::{ActiveLow, GpioStepper, RpInput, RpOutput};

use crate::channels::{CLIENT_CONNECTED, LINK_RX};

/// Mount controller with GPIO step outputs
pub type Mount = MountController<GpioStepper<'static>, GpioStepper<'static>>;

/// Operator panel wired to the board pins
pub type Panel = PinPanel<
    RpInput<'static>,
    RpInput<'static>,
    RpInput<'static>,
    ActiveLow<RpOutput<'static>>,
    RpOutput<'static>,
>;

/// Embassy time driver as a microsecond clock
struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Non-blocking view of the link task's pipe
struct PipeLink;

impl CommandLink for PipeLink {
    fn poll_accept(&mut self) -> bool {
        CLIENT_CONNECTED.try_take().is_some()
    }

    fn try_read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match LINK_RX.try_read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}

/// Control task - owns the mount and the operator panel
#[embassy_executor::task]
pub async fn control_task(mut mount: Mount, mut panel: Panel) -> ! {
    info!("Control task started");

    let clock = EmbassyClock;
    let mut link = PipeLink;

    let report = mount.begin(&mut panel, clock.now_ms());
    log_report(&report, &mount);
    info!("Homing: press each axis' home button once it is aligned");

    loop {
        let report = mount.poll(&mut panel, &mut link, &clock);
        log_report(&report, &mount);
        yield_now().await;
    }
}

fn log_report(report: &PollReport, mount: &Mount) {
    if report.client_connected {
        info!("New client; watchdog refreshed");
    }

    for transition in report.transitions.iter() {
        match transition.to {
            to if to.is_terminal() => {
                warn!("{} -> {} ({})", transition.from, to, transition.event)
            }
            to => info!("{} -> {} ({})", transition.from, to, transition.event),
        }
    }

    if let Some(command) = report.last_command {
        debug!(
            "Target az={} alt={} -> steps az={} alt={} (now at az={} alt={})",
            command.azimuth_deg,
            command.altitude_deg,
            mount.azimuth().target_steps(),
            mount.altitude().target_steps(),
            mount.azimuth().current_degrees(),
            mount.altitude().current_degrees()
        );
    }

    if report.rejected > 0 {
        trace!(
            "{} command(s) ignored in {}",
            report.rejected,
            mount.state()
        );
    }
}
