//! Per-axis position controller
//!
//! Owns the step counter and target for one axis and decides, from the
//! current time alone, whether a step is due. Nothing here waits: `tick`
//! is polled as often as the control loop spins and emits at most one step.

use super::planner::{MotionState, StepPlanner};
use crate::config::AxisConfig;
use crate::traits::Direction;

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisId {
    /// Horizontal rotation, wraps at 360°
    Azimuth,
    /// Vertical elevation, soft-limited
    Altitude,
}

impl AxisId {
    /// Both axes in homing order
    pub const ALL: [AxisId; 2] = [AxisId::Azimuth, AxisId::Altitude];

    /// Stable array index
    pub fn index(self) -> usize {
        match self {
            AxisId::Azimuth => 0,
            AxisId::Altitude => 1,
        }
    }
}

/// Axis controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisError {
    /// Motors are not enabled; the target was not changed
    Disabled,
}

/// Position controller for one stepper axis
#[derive(Debug, Clone)]
pub struct AxisController {
    axis: AxisId,
    steps_per_degree: f32,
    /// Step counter relative to the homed origin
    position: i32,
    /// Commanded step position
    target: i32,
    planner: StepPlanner,
    enabled: bool,
    /// Timestamp of the last emitted step (µs)
    last_step_us: Option<u64>,
}

impl AxisController {
    /// Create a disabled controller at the origin
    pub fn new(axis: AxisId, config: &AxisConfig) -> Self {
        Self {
            axis,
            steps_per_degree: config.steps_per_degree(),
            position: 0,
            target: 0,
            planner: StepPlanner::from_config(config),
            enabled: false,
            last_step_us: None,
        }
    }

    /// Which axis this controls
    pub fn axis(&self) -> AxisId {
        self.axis
    }

    /// Degrees-to-steps conversion factor
    pub fn steps_per_degree(&self) -> f32 {
        self.steps_per_degree
    }

    /// Command a new absolute step target
    ///
    /// Motion re-plans from the current speed, so a reversal decelerates
    /// before turning around. Rejected while disabled.
    pub fn set_target_steps(&mut self, target: i32) -> Result<(), AxisError> {
        if !self.enabled {
            return Err(AxisError::Disabled);
        }
        if target != self.target {
            self.target = target;
            self.planner.plan(self.distance_to_go());
        }
        Ok(())
    }

    /// Declare the current physical position as step zero
    ///
    /// Clears the target and any residual speed.
    pub fn reset_origin(&mut self) {
        self.position = 0;
        self.target = 0;
        self.planner.halt();
    }

    /// Enable or disable step generation
    ///
    /// Disabling stops pulses immediately and drops any speed; the target is
    /// kept so re-enabling resumes toward it from rest.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        self.planner.halt();
        if enabled && self.distance_to_go() != 0 {
            self.planner.plan(self.distance_to_go());
        }
    }

    /// Check if step generation is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advance motion to `now_us`
    ///
    /// Returns the direction of the step to emit when one is due. At most
    /// one step per call.
    pub fn tick(&mut self, now_us: u64) -> Option<Direction> {
        if !self.enabled {
            return None;
        }

        let interval = self.planner.step_interval_us();
        if interval == 0 {
            return None;
        }

        if let Some(last) = self.last_step_us {
            if now_us.saturating_sub(last) < u64::from(interval) {
                return None;
            }
        }

        let direction = self.planner.direction();
        self.position += direction.sign();
        self.last_step_us = Some(now_us);
        self.planner.plan(self.distance_to_go());

        Some(direction)
    }

    /// Current step position
    pub fn current_steps(&self) -> i32 {
        self.position
    }

    /// Current position in degrees
    pub fn current_degrees(&self) -> f32 {
        self.position as f32 / self.steps_per_degree
    }

    /// Commanded step position
    pub fn target_steps(&self) -> i32 {
        self.target
    }

    /// Signed steps remaining to the target
    pub fn distance_to_go(&self) -> i32 {
        self.target - self.position
    }

    /// Signed speed in steps/s
    pub fn speed(&self) -> f32 {
        self.planner.speed()
    }

    /// Current ramp phase
    pub fn motion_state(&self) -> MotionState {
        self.planner.state()
    }

    /// True while the axis is away from its target or still moving
    pub fn is_running(&self) -> bool {
        !self.planner.is_stopped() || self.distance_to_go() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_axis() -> AxisController {
        let mut axis = AxisController::new(AxisId::Azimuth, &AxisConfig::azimuth());
        axis.set_enabled(true);
        axis
    }

    /// Tick in 100 µs increments until the axis settles
    fn settle(axis: &mut AxisController, mut now_us: u64) -> u64 {
        for _ in 0..10_000_000 {
            axis.tick(now_us);
            if !axis.is_running() {
                break;
            }
            now_us += 100;
        }
        now_us
    }

    #[test]
    fn test_new_axis_is_disabled_at_origin() {
        let axis = AxisController::new(AxisId::Altitude, &AxisConfig::altitude());
        assert!(!axis.is_enabled());
        assert_eq!(axis.current_steps(), 0);
        assert_eq!(axis.target_steps(), 0);
        assert!(!axis.is_running());
    }

    #[test]
    fn test_target_rejected_while_disabled() {
        let mut axis = AxisController::new(AxisId::Azimuth, &AxisConfig::azimuth());
        assert_eq!(axis.set_target_steps(100), Err(AxisError::Disabled));
        assert_eq!(axis.target_steps(), 0);
        assert_eq!(axis.tick(1_000_000), None);
    }

    #[test]
    fn test_first_step_immediate_then_waits_interval() {
        let mut axis = enabled_axis();
        axis.set_target_steps(50).unwrap();

        assert_eq!(axis.tick(1_000), Some(Direction::Clockwise));
        assert_eq!(axis.current_steps(), 1);

        // Second interval is still tens of milliseconds at this speed
        assert_eq!(axis.tick(1_100), None);
        assert_eq!(axis.current_steps(), 1);
    }

    #[test]
    fn test_tick_emits_at_most_one_step() {
        let mut axis = enabled_axis();
        axis.set_target_steps(500).unwrap();
        axis.tick(0);
        // Long gap: still only one step
        assert!(axis.tick(10_000_000).is_some());
        assert_eq!(axis.current_steps(), 2);
    }

    #[test]
    fn test_reaches_target_and_stops() {
        let mut axis = enabled_axis();
        axis.set_target_steps(-300).unwrap();
        settle(&mut axis, 0);

        assert_eq!(axis.current_steps(), -300);
        assert_eq!(axis.distance_to_go(), 0);
        assert_eq!(axis.speed(), 0.0);
        assert_eq!(axis.motion_state(), MotionState::Stopped);
    }

    #[test]
    fn test_retarget_while_moving() {
        let mut axis = enabled_axis();
        axis.set_target_steps(2000).unwrap();
        let mut now = 0;
        while axis.current_steps() < 100 {
            axis.tick(now);
            now += 100;
        }

        axis.set_target_steps(0).unwrap();
        settle(&mut axis, now);
        assert_eq!(axis.current_steps(), 0);
    }

    #[test]
    fn test_disable_stops_pulses_keeps_target() {
        let mut axis = enabled_axis();
        axis.set_target_steps(1000).unwrap();
        axis.tick(0);

        axis.set_enabled(false);
        assert_eq!(axis.tick(1_000_000), None);
        assert_eq!(axis.target_steps(), 1000);
        assert_eq!(axis.speed(), 0.0);
    }

    #[test]
    fn test_reset_origin() {
        let mut axis = enabled_axis();
        axis.set_target_steps(40).unwrap();
        axis.tick(0);
        axis.reset_origin();

        assert_eq!(axis.current_steps(), 0);
        assert_eq!(axis.target_steps(), 0);
        assert!(!axis.is_running());
    }

    #[test]
    fn test_degrees() {
        let mut axis = enabled_axis();
        axis.set_target_steps(2300).unwrap();
        settle(&mut axis, 0);
        assert!((axis.current_degrees() - 360.0).abs() < 1e-3);
    }
}
