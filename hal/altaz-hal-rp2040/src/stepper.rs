//! GPIO STEP/DIR output
//!
//! Step timing is decided by the core axis controller; this driver only
//! sets the direction line and emits one pulse per call. The pulse is a
//! short busy-wait, well under the control loop's step interval.

use altaz_core::traits::{Direction, StepOutput};
use embassy_rp::gpio::{Level, Output};
use embassy_time::{block_for, Duration};

/// Minimum STEP high time (A4988: 1 µs, DRV8825: 1.9 µs)
pub const STEP_PULSE_US: u64 = 2;

/// DIR setup time before the STEP rising edge
pub const DIR_SETUP_US: u64 = 1;

/// Stepper driver on two plain GPIO lines
pub struct GpioStepper<'d> {
    step_pin: Output<'d>,
    dir_pin: Output<'d>,
    /// Direction currently on the DIR line
    direction: Direction,
    /// Swap rotation sense for a mirrored mechanical install
    inverted: bool,
}

impl<'d> GpioStepper<'d> {
    /// Create a driver; both pins should start low
    pub fn new(step_pin: Output<'d>, mut dir_pin: Output<'d>, inverted: bool) -> Self {
        let direction = Direction::Clockwise;
        dir_pin.set_level(dir_level(direction, inverted));
        Self {
            step_pin,
            dir_pin,
            direction,
            inverted,
        }
    }
}

impl StepOutput for GpioStepper<'_> {
    fn step(&mut self, direction: Direction) {
        if direction != self.direction {
            self.dir_pin.set_level(dir_level(direction, self.inverted));
            self.direction = direction;
            block_for(Duration::from_micros(DIR_SETUP_US));
        }

        self.step_pin.set_high();
        block_for(Duration::from_micros(STEP_PULSE_US));
        self.step_pin.set_low();
    }
}

fn dir_level(direction: Direction, inverted: bool) -> Level {
    let clockwise = direction == Direction::Clockwise;
    if clockwise != inverted {
        Level::High
    } else {
        Level::Low
    }
}
