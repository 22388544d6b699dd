//! altaz Target Command Protocol
//!
//! This crate decodes the text protocol a tracking client uses to point the
//! mount. The link is a plain TCP byte stream; the mount never replies.
//!
//! # Protocol Overview
//!
//! Records are ASCII lines:
//! ```text
//! AZ:<azimuth>ALT:<altitude>\n
//! ```
//!
//! - LF ends a record, CR bytes are ignored anywhere
//! - `AZ:` must come before `ALT:`; other text around them is tolerated
//! - Values are decimal degrees, read leniently (garbage reads as `0`)
//! - Records missing a marker are dropped without any error
//! - Records longer than [`MAX_RECORD_LEN`] are dropped and the decoder
//!   resynchronizes on the next LF

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod decoder;
pub mod line;

pub use command::{parse_lenient_f32, MountCommand, ALTITUDE_MARKER, AZIMUTH_MARKER};
pub use decoder::{CommandDecoder, DecoderStats};
pub use line::{LineAssembler, LineError, Record, MAX_RECORD_LEN};
