//! Motion control
//!
//! Target resolution, trapezoidal step timing and per-axis position
//! tracking.

pub mod axis;
pub mod planner;
pub mod resolver;

pub use axis::{AxisController, AxisError, AxisId};
pub use planner::{MotionState, StepPlanner};
pub use resolver::{normalize_degrees, shortest_delta, TargetResolver};
