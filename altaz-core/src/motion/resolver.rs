//! Target resolution
//!
//! Turns requested degrees into absolute step targets. Azimuth takes the
//! shortest way around the circle from wherever the axis currently is, so
//! the step counter may run past a full turn in either direction. Altitude
//! is clamped to the soft limits.

use crate::config::MountConfig;

/// Degrees in one turn
pub const FULL_TURN_DEG: f32 = 360.0;

/// Map any angle into `[0, 360)`
///
/// Non-finite input maps to 0.
pub fn normalize_degrees(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let mut wrapped = libm::fmodf(deg, FULL_TURN_DEG);
    if wrapped < 0.0 {
        wrapped += FULL_TURN_DEG;
    }
    // -tiny + 360 rounds up to exactly 360
    if wrapped >= FULL_TURN_DEG {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from_deg` to `to_deg`, in `[-180, 180]`
///
/// Both inputs must already be normalized.
pub fn shortest_delta(from_deg: f32, to_deg: f32) -> f32 {
    let mut delta = to_deg - from_deg;
    if delta > 180.0 {
        delta -= FULL_TURN_DEG;
    } else if delta < -180.0 {
        delta += FULL_TURN_DEG;
    }
    delta
}

/// Converts requested pointing into step targets
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TargetResolver {
    azimuth_steps_per_degree: f32,
    altitude_steps_per_degree: f32,
    altitude_min_deg: f32,
    altitude_max_deg: f32,
}

impl TargetResolver {
    /// Create a resolver for the given mount
    pub fn new(config: &MountConfig) -> Self {
        Self {
            azimuth_steps_per_degree: config.azimuth.steps_per_degree(),
            altitude_steps_per_degree: config.altitude.steps_per_degree(),
            altitude_min_deg: config.altitude_min_deg,
            altitude_max_deg: config.altitude_max_deg,
        }
    }

    /// Absolute azimuth step target reached by the shortest rotation
    ///
    /// `current_steps` is the axis' present step position, which may lie
    /// outside a single turn.
    pub fn resolve_azimuth(&self, requested_deg: f32, current_steps: i32) -> i32 {
        let requested = normalize_degrees(requested_deg);

        // Integer steps are exact in f64, so the wrap stays precise far
        // beyond one turn
        let steps_per_degree = f64::from(self.azimuth_steps_per_degree);
        let steps_per_turn = steps_per_degree * f64::from(FULL_TURN_DEG);
        let mut wrapped = libm::fmod(f64::from(current_steps), steps_per_turn);
        if wrapped < 0.0 {
            wrapped += steps_per_turn;
        }
        let current = normalize_degrees((wrapped / steps_per_degree) as f32);

        let delta = shortest_delta(current, requested);
        let delta_steps = libm::round(f64::from(delta) * steps_per_degree);

        saturate(f64::from(current_steps) + delta_steps)
    }

    /// Absolute altitude step target after clamping to the soft limits
    pub fn resolve_altitude(&self, requested_deg: f32) -> i32 {
        let requested = if requested_deg.is_finite() {
            requested_deg
        } else {
            0.0
        };
        let clamped = self.clamp_altitude(requested);
        saturate(libm::round(
            f64::from(clamped) * f64::from(self.altitude_steps_per_degree),
        ))
    }

    /// Clamp an altitude to `[altitude_min_deg, altitude_max_deg]`
    pub fn clamp_altitude(&self, deg: f32) -> f32 {
        deg.max(self.altitude_min_deg).min(self.altitude_max_deg)
    }
}

fn saturate(steps: f64) -> i32 {
    if steps >= f64::from(i32::MAX) {
        i32::MAX
    } else if steps <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        steps as i32
    }
}
