//! Step pulse output trait
//!
//! Abstracts the STEP/DIR pair of one stepper driver. The motion logic
//! decides when a step is due; implementations only emit it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
///
/// Clockwise moves the position counter up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation (increasing steps)
    Clockwise,
    /// Counter-clockwise rotation (decreasing steps)
    CounterClockwise,
}

impl Direction {
    /// Position delta of one step in this direction
    pub fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// Direction that reduces a signed distance to zero
    pub fn toward(distance: i32) -> Self {
        if distance > 0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }
}

/// Sink for step pulses of one axis
///
/// `step` must return without waiting on anything slower than the pulse
/// width the driver needs.
pub trait StepOutput {
    /// Emit one step in `direction`
    fn step(&mut self, direction: Direction);
}

impl<T: StepOutput + ?Sized> StepOutput for &mut T {
    fn step(&mut self, direction: Direction) {
        (**self).step(direction)
    }
}
