//! Byte-stream command decoder
//!
//! Combines [`LineAssembler`] and [`MountCommand::parse`]. Protocol faults
//! never surface as errors: records without both markers and oversized
//! records are dropped and only show up in [`DecoderStats`].

use crate::command::MountCommand;
use crate::line::{LineAssembler, LineError};

/// Running counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Complete records seen (including dropped ones)
    pub records: u32,
    /// Records that produced a command
    pub commands: u32,
    /// Records dropped for a missing marker
    pub dropped: u32,
    /// Records discarded for exceeding the length limit
    pub overflows: u32,
}

/// Incremental decoder from raw bytes to [`MountCommand`]s
#[derive(Debug, Clone, Default)]
pub struct CommandDecoder {
    lines: LineAssembler,
    stats: DecoderStats,
}

impl CommandDecoder {
    /// Create a decoder with an empty buffer
    pub const fn new() -> Self {
        Self {
            lines: LineAssembler::new(),
            stats: DecoderStats {
                records: 0,
                commands: 0,
                dropped: 0,
                overflows: 0,
            },
        }
    }

    /// Discard any partial record (e.g. when a new client connects)
    pub fn reset(&mut self) {
        self.lines.reset();
    }

    /// Diagnostic counters since creation
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Feed one byte, returning a command when it completes a valid record
    pub fn feed(&mut self, byte: u8) -> Option<MountCommand> {
        match self.lines.feed(byte) {
            Ok(Some(record)) => {
                self.stats.records = self.stats.records.wrapping_add(1);
                match MountCommand::parse(&record) {
                    Some(command) => {
                        self.stats.commands = self.stats.commands.wrapping_add(1);
                        Some(command)
                    }
                    None => {
                        self.stats.dropped = self.stats.dropped.wrapping_add(1);
                        None
                    }
                }
            }
            Ok(None) => None,
            Err(LineError::Overflow) => {
                self.stats.overflows = self.stats.overflows.wrapping_add(1);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::MAX_RECORD_LEN;

    /// Feed a chunk, keeping the last command it completed
    fn feed_all(decoder: &mut CommandDecoder, bytes: &[u8]) -> Option<MountCommand> {
        bytes.iter().fold(None, |latest, &b| decoder.feed(b).or(latest))
    }

    #[test]
    fn test_decode_command() {
        let mut decoder = CommandDecoder::new();
        assert_eq!(
            feed_all(&mut decoder, b"AZ:10ALT:20\n"),
            Some(MountCommand::new(10.0, 20.0))
        );
        assert_eq!(decoder.stats().commands, 1);
    }

    #[test]
    fn test_missing_marker_dropped() {
        let mut decoder = CommandDecoder::new();
        assert_eq!(feed_all(&mut decoder, b"ALT:20\n"), None);

        let stats = decoder.stats();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.commands, 0);
    }

    #[test]
    fn test_split_across_chunks() {
        let mut decoder = CommandDecoder::new();
        assert_eq!(feed_all(&mut decoder, b"AZ:1"), None);
        assert_eq!(feed_all(&mut decoder, b"80.5AL"), None);
        assert_eq!(
            feed_all(&mut decoder, b"T:45\r\n"),
            Some(MountCommand::new(180.5, 45.0))
        );
    }

    #[test]
    fn test_latest_command_in_chunk_wins() {
        let mut decoder = CommandDecoder::new();
        assert_eq!(
            feed_all(&mut decoder, b"AZ:1ALT:1\nAZ:2ALT:2\n"),
            Some(MountCommand::new(2.0, 2.0))
        );
        assert_eq!(decoder.stats().commands, 2);
    }

    #[test]
    fn test_overflow_counted_then_recovers() {
        let mut decoder = CommandDecoder::new();
        for _ in 0..=MAX_RECORD_LEN {
            assert_eq!(decoder.feed(b'9'), None);
        }
        assert_eq!(feed_all(&mut decoder, b"ALT:1\n"), None); // Tail of the long record
        assert_eq!(decoder.stats().overflows, 1);
        assert_eq!(decoder.stats().records, 0);

        assert_eq!(
            feed_all(&mut decoder, b"AZ:3ALT:4\n"),
            Some(MountCommand::new(3.0, 4.0))
        );
    }

    #[test]
    fn test_reset_on_reconnect() {
        let mut decoder = CommandDecoder::new();
        feed_all(&mut decoder, b"AZ:90ALT:");
        decoder.reset();
        assert_eq!(feed_all(&mut decoder, b"10\n"), None);
    }
}
