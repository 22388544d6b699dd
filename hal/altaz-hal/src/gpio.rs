//! GPIO pin abstractions
//!
//! Digital input and output traits, plus a polarity adapter so callers can
//! always reason in "asserted / not asserted" terms regardless of how a line
//! is wired.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Toggle the pin level
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently driven low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Inverts the logic level of the wrapped pin
///
/// The stepper drivers' shared enable line is active-low: driving it high
/// releases the motors. Wrapping it in `ActiveLow` lets the controller call
/// `set_high()` to mean "enabled".
#[derive(Debug)]
pub struct ActiveLow<P>(pub P);

impl<P> ActiveLow<P> {
    /// Wrap a pin
    pub fn new(pin: P) -> Self {
        Self(pin)
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P: OutputPin> OutputPin for ActiveLow<P> {
    fn set_high(&mut self) {
        self.0.set_low();
    }

    fn set_low(&mut self) {
        self.0.set_high();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_low()
    }
}

impl<P: InputPin> InputPin for ActiveLow<P> {
    fn is_high(&self) -> bool {
        self.0.is_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePin {
        level: bool,
    }

    impl OutputPin for FakePin {
        fn set_high(&mut self) {
            self.level = true;
        }

        fn set_low(&mut self) {
            self.level = false;
        }

        fn is_set_high(&self) -> bool {
            self.level
        }
    }

    impl InputPin for FakePin {
        fn is_high(&self) -> bool {
            self.level
        }
    }

    #[test]
    fn test_set_state_and_toggle() {
        let mut pin = FakePin::default();
        pin.set_state(true);
        assert!(pin.is_set_high());
        pin.toggle();
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_active_low_output_inverts() {
        let mut enable = ActiveLow::new(FakePin::default());
        enable.set_high();
        assert!(enable.is_set_high());
        assert!(!enable.0.level); // Physical line pulled low

        enable.set_low();
        assert!(enable.0.level);
    }

    #[test]
    fn test_active_low_input_inverts() {
        let button = ActiveLow::new(FakePin { level: false });
        assert!(button.is_high());
        assert!(!button.into_inner().is_high());
    }
}
