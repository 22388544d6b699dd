//! Operational state machine
//!
//! Defines the authoritative runtime behavior of the mount.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{HomingProgress, OperationalState};
