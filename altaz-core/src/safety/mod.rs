//! Safety supervision
//!
//! Emergency-stop latching, homing capture and the stale-command watchdog.

pub mod debounce;
pub mod supervisor;
pub mod watchdog;

pub use debounce::Debounce;
pub use supervisor::{Directive, InputSample, Outcome, Supervisor, Transition};
pub use watchdog::Watchdog;
