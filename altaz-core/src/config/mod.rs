//! Configuration types
//!
//! Compile-time mount constants plus the network settings file parser.

pub mod settings;
pub mod types;

pub use settings::{parse_settings, Settings, SettingsError};
pub use types::*;
