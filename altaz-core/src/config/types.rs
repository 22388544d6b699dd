//! Mount configuration types
//!
//! Mechanical and timing constants for one deployment. Defaults describe the
//! reference rig: 1.8° motors at 2x microstepping, a 5.75:1 azimuth
//! reduction and an 8:1 altitude reduction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default TCP port for the command link
pub const DEFAULT_SERVER_PORT: u16 = 10000;

/// Default stale-command timeout
pub const DEFAULT_WATCHDOG_TIMEOUT_MS: u32 = 5000;

/// Default settle time for homing buttons
pub const DEFAULT_HOMING_DEBOUNCE_MS: u32 = 200;

/// Per-axis drive train and motion profile parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Full steps per motor rotation (200 for 1.8° motors)
    pub full_steps_per_rotation: u16,
    /// Driver microstepping factor
    pub microsteps: u8,
    /// Output reduction (motor turns per axis turn)
    pub gear_ratio: f32,
    /// Cruise speed limit in steps per second
    pub max_speed: f32,
    /// Acceleration and deceleration in steps per second squared
    pub acceleration: f32,
}

impl AxisConfig {
    /// Reference azimuth drive train
    pub const fn azimuth() -> Self {
        Self {
            full_steps_per_rotation: 200,
            microsteps: 2,
            gear_ratio: 5.75,
            max_speed: 1800.0,
            acceleration: 240.0,
        }
    }

    /// Reference altitude drive train
    pub const fn altitude() -> Self {
        Self {
            full_steps_per_rotation: 200,
            microsteps: 2,
            gear_ratio: 8.0,
            max_speed: 1800.0,
            acceleration: 240.0,
        }
    }

    /// Steps per axis revolution
    pub fn steps_per_revolution(&self) -> f32 {
        self.full_steps_per_rotation as f32 * self.microsteps as f32 * self.gear_ratio
    }

    /// Conversion factor between degrees and steps
    pub fn steps_per_degree(&self) -> f32 {
        self.steps_per_revolution() / 360.0
    }
}

/// Complete mount configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MountConfig {
    /// Azimuth drive (wraps at 360°)
    pub azimuth: AxisConfig,
    /// Altitude drive (soft-limited)
    pub altitude: AxisConfig,
    /// Lowest altitude soft limit in degrees
    pub altitude_min_deg: f32,
    /// Highest altitude soft limit in degrees
    pub altitude_max_deg: f32,
    /// Silence after which the mount stops taking the link as live
    pub watchdog_timeout_ms: u32,
    /// Delay between a homing button press and origin capture
    pub homing_debounce_ms: u32,
    /// Command link listening port
    pub server_port: u16,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            azimuth: AxisConfig::azimuth(),
            altitude: AxisConfig::altitude(),
            altitude_min_deg: -50.0,
            altitude_max_deg: 54.0,
            watchdog_timeout_ms: DEFAULT_WATCHDOG_TIMEOUT_MS,
            homing_debounce_ms: DEFAULT_HOMING_DEBOUNCE_MS,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl MountConfig {
    /// Check the altitude limits form a non-empty range
    pub fn has_valid_altitude_range(&self) -> bool {
        self.altitude_min_deg.is_finite()
            && self.altitude_max_deg.is_finite()
            && self.altitude_min_deg <= self.altitude_max_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_steps_per_degree() {
        let config = MountConfig::default();
        // 200 * 2 * 5.75 = 2300 steps per azimuth turn
        assert_eq!(config.azimuth.steps_per_revolution(), 2300.0);
        assert!((config.azimuth.steps_per_degree() - 6.388_889).abs() < 1e-4);
        // 200 * 2 * 8 = 3200 steps per altitude turn
        assert!((config.altitude.steps_per_degree() - 8.888_889).abs() < 1e-4);
    }

    #[test]
    fn test_default_limits() {
        let config = MountConfig::default();
        assert!(config.has_valid_altitude_range());
        assert_eq!(config.altitude_min_deg, -50.0);
        assert_eq!(config.altitude_max_deg, 54.0);
        assert_eq!(config.server_port, 10000);
        assert_eq!(config.watchdog_timeout_ms, 5000);
    }

    #[test]
    fn test_inverted_altitude_range_rejected() {
        let config = MountConfig {
            altitude_min_deg: 10.0,
            altitude_max_deg: -10.0,
            ..Default::default()
        };
        assert!(!config.has_valid_altitude_range());
    }
}
