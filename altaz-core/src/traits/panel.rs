//! Operator panel trait
//!
//! Groups the discrete I/O around the mount: the emergency-stop switch,
//! one homing button per axis, the shared driver enable line and the
//! status indicator.

use altaz_hal::{InputPin, OutputPin};

use crate::motion::AxisId;
use crate::safety::InputSample;

/// Discrete operator I/O
pub trait ControlPanel {
    /// True while the emergency-stop input is asserted
    fn force_stop_asserted(&self) -> bool;

    /// True while the homing button for `axis` is pressed
    fn home_asserted(&self, axis: AxisId) -> bool;

    /// Energize (`true`) or release (`false`) both motor drivers
    fn set_drivers_enabled(&mut self, enabled: bool);

    /// Drive the status indicator
    fn set_indicator(&mut self, on: bool);

    /// Read every input once
    fn sample(&self) -> InputSample {
        InputSample {
            force_stop: self.force_stop_asserted(),
            home_azimuth: self.home_asserted(AxisId::Azimuth),
            home_altitude: self.home_asserted(AxisId::Altitude),
        }
    }
}

/// [`ControlPanel`] built from individual pins
///
/// All inputs are active-high. Wrap the enable pin in
/// [`altaz_hal::ActiveLow`] for drivers with an inverted EN input.
pub struct PinPanel<STOP, HAZ, HALT, EN, LED> {
    /// Emergency-stop switch
    pub force_stop: STOP,
    /// Azimuth homing button
    pub home_azimuth: HAZ,
    /// Altitude homing button
    pub home_altitude: HALT,
    /// Driver enable line (high = energized)
    pub enable: EN,
    /// Status indicator
    pub indicator: LED,
}

impl<STOP, HAZ, HALT, EN, LED> ControlPanel for PinPanel<STOP, HAZ, HALT, EN, LED>
where
    STOP: InputPin,
    HAZ: InputPin,
    HALT: InputPin,
    EN: OutputPin,
    LED: OutputPin,
{
    fn force_stop_asserted(&self) -> bool {
        self.force_stop.is_high()
    }

    fn home_asserted(&self, axis: AxisId) -> bool {
        match axis {
            AxisId::Azimuth => self.home_azimuth.is_high(),
            AxisId::Altitude => self.home_altitude.is_high(),
        }
    }

    fn set_drivers_enabled(&mut self, enabled: bool) {
        self.enable.set_state(enabled);
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator.set_state(on);
    }
}
