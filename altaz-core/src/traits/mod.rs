//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod clock;
pub mod link;
pub mod panel;
pub mod stepper;

pub use clock::MonotonicClock;
pub use link::CommandLink;
pub use panel::{ControlPanel, PinPanel};
pub use stepper::{Direction, StepOutput};
