//! Board-agnostic control logic for the alt-azimuth mount
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Capability traits (step output, command link, control panel, clock)
//! - Target resolution (shortest-path azimuth, clamped altitude)
//! - Per-axis trapezoidal motion (acceleration math)
//! - Operational state machine and safety supervision
//! - The cooperative mount controller tying it together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod mount;
pub mod motion;
pub mod safety;
pub mod state;
pub mod traits;

pub use mount::{MountController, PollReport};
