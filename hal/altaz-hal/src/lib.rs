//! altaz Hardware Abstraction Layer
//!
//! Chip-agnostic traits for the digital I/O the mount controller touches.
//! Chip-specific crates implement them; `altaz-core` consumes them.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  altaz-core / altaz-firmware            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  altaz-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ altaz-hal-    │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::ActiveLow`] - Polarity adapter for inverted lines

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{ActiveLow, InputPin, OutputPin};
