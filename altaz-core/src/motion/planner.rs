//! Step-interval planner for trapezoidal profiles
//!
//! Computes the delay until the next step so an axis accelerates at a
//! constant rate, cruises at its speed limit and decelerates to land on the
//! target. Intervals follow the recurrence from D. Austin, "Generate stepper
//! motor speed profiles in real time" (2005):
//!
//! ```text
//! c0 = 0.676 * sqrt(2 / accel) * 1e6      (first step, µs)
//! cn = cn-1 - 2 * cn-1 / (4n + 1)          (n < 0 while decelerating)
//! ```
//!
//! The planner owns no position. The caller reports the remaining signed
//! distance after every step and whenever the target moves.

use crate::config::AxisConfig;
use crate::traits::Direction;

/// Current motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Motor is stopped
    Stopped,
    /// Motor is accelerating toward the speed limit
    Accelerating,
    /// Motor is cruising at the speed limit
    AtSpeed,
    /// Motor is decelerating toward a stop
    Decelerating,
}

/// Trapezoidal step-interval planner
#[derive(Debug, Clone)]
pub struct StepPlanner {
    /// Acceleration in steps/s²
    acceleration: f32,
    /// First step interval from rest (µs)
    c0: f32,
    /// Shortest allowed interval, i.e. the speed limit (µs)
    c_min: f32,
    /// Last computed interval (µs)
    cn: f32,
    /// Ramp step counter; negative while decelerating
    n: i32,
    /// Signed speed in steps/s
    speed: f32,
    /// Direction of the next step
    direction: Direction,
    /// Delay before the next step (µs); zero when stopped
    step_interval_us: u32,
    /// Current motion state
    state: MotionState,
}

impl StepPlanner {
    /// Create a planner for the given limits
    ///
    /// Non-positive or non-finite limits are raised to 1 step/s (or 1
    /// step/s²) so intervals stay finite.
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        let max_speed = sanitize(max_speed);
        let acceleration = sanitize(acceleration);

        Self {
            acceleration,
            c0: 0.676 * libm::sqrtf(2.0 / acceleration) * 1_000_000.0,
            c_min: 1_000_000.0 / max_speed,
            cn: 0.0,
            n: 0,
            speed: 0.0,
            direction: Direction::Clockwise,
            step_interval_us: 0,
            state: MotionState::Stopped,
        }
    }

    /// Create a planner from an axis configuration
    pub fn from_config(config: &AxisConfig) -> Self {
        Self::new(config.max_speed, config.acceleration)
    }

    /// Recompute the next step interval for the remaining distance
    ///
    /// Call after every step and after each target change.
    pub fn plan(&mut self, distance_to_go: i32) {
        let steps_to_stop = ((self.speed * self.speed) / (2.0 * self.acceleration)) as i32;

        if distance_to_go == 0 && steps_to_stop <= 1 {
            self.halt();
            return;
        }

        if distance_to_go > 0 {
            if self.n > 0 {
                // Would overshoot, or still heading the wrong way
                if steps_to_stop >= distance_to_go || self.direction == Direction::CounterClockwise
                {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0
                && steps_to_stop < distance_to_go
                && self.direction == Direction::Clockwise
            {
                self.n = -self.n;
            }
        } else if distance_to_go < 0 {
            if self.n > 0 {
                if steps_to_stop >= -distance_to_go || self.direction == Direction::Clockwise {
                    self.n = -steps_to_stop;
                }
            } else if self.n < 0
                && steps_to_stop < -distance_to_go
                && self.direction == Direction::CounterClockwise
            {
                self.n = -self.n;
            }
        }

        let decelerating = self.n < 0;

        if self.n == 0 {
            self.cn = self.c0;
            self.direction = Direction::toward(distance_to_go);
        } else {
            self.cn -= (2.0 * self.cn) / (4.0 * self.n as f32 + 1.0);
            if self.cn < self.c_min {
                self.cn = self.c_min;
            }
        }

        self.n += 1;
        self.step_interval_us = (self.cn as u32).max(1);
        self.speed = 1_000_000.0 / self.cn * self.direction.sign() as f32;

        self.state = if decelerating {
            MotionState::Decelerating
        } else if self.cn <= self.c_min {
            MotionState::AtSpeed
        } else {
            MotionState::Accelerating
        };
    }

    /// Drop to standstill without a ramp
    pub fn halt(&mut self) {
        self.n = 0;
        self.speed = 0.0;
        self.step_interval_us = 0;
        self.state = MotionState::Stopped;
    }

    /// Delay before the next step in µs (zero when stopped)
    pub fn step_interval_us(&self) -> u32 {
        self.step_interval_us
    }

    /// Direction of the next step
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Signed speed in steps/s (positive = clockwise)
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Get the current motion state
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Check if stopped
    pub fn is_stopped(&self) -> bool {
        self.state == MotionState::Stopped
    }
}

fn sanitize(limit: f32) -> f32 {
    if limit.is_finite() && limit >= 1.0 {
        limit
    } else {
        1.0
    }
}
