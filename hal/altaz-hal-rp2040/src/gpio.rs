//! GPIO adapters
//!
//! Wrap `embassy_rp` pins so the board-agnostic code can drive them through
//! the `altaz-hal` traits.

use embassy_rp::gpio::{Input, Level, Output};

/// Push-pull output implementing [`altaz_hal::OutputPin`]
pub struct RpOutput<'d>(Output<'d>);

impl<'d> RpOutput<'d> {
    /// Wrap a configured output
    pub fn new(pin: Output<'d>) -> Self {
        Self(pin)
    }
}

impl altaz_hal::OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn set_state(&mut self, high: bool) {
        self.0.set_level(if high { Level::High } else { Level::Low });
    }

    fn toggle(&mut self) {
        self.0.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Digital input implementing [`altaz_hal::InputPin`]
pub struct RpInput<'d>(Input<'d>);

impl<'d> RpInput<'d> {
    /// Wrap a configured input
    pub fn new(pin: Input<'d>) -> Self {
        Self(pin)
    }
}

impl altaz_hal::InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
