//! RP2040-specific HAL for the mount firmware
//!
//! This crate provides RP2040 implementations of the shared `altaz-hal`
//! pin traits and of the core `StepOutput` trait:
//!
//! - GPIO input/output adapters over `embassy_rp::gpio`
//! - STEP/DIR pulse generation on plain GPIO

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod stepper;

pub use gpio::{RpInput, RpOutput};
pub use stepper::GpioStepper;

// Re-export shared traits for convenience
pub use altaz_hal::{ActiveLow, InputPin, OutputPin};
