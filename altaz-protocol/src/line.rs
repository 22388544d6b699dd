//! Line record assembly
//!
//! Reassembles LF-terminated records from an arbitrarily chunked byte
//! stream:
//! - LF (0x0A) terminates the current record
//! - CR (0x0D) is discarded and never stored
//! - Any other byte is appended, up to [`MAX_RECORD_LEN`]
//!
//! A record that grows past the limit is discarded in full; the assembler
//! then skips everything up to and including the next LF and resumes with a
//! clean buffer.

use heapless::Vec;

/// Record terminator
pub const LINE_FEED: u8 = b'\n';

/// Ignored byte
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Maximum stored record length in bytes (terminator excluded)
///
/// `AZ:359.999999ALT:-49.999999` is 27 bytes, so this leaves generous room
/// for extra whitespace or fields a client may append.
pub const MAX_RECORD_LEN: usize = 128;

/// A complete record, terminator and CR bytes stripped
pub type Record = Vec<u8, MAX_RECORD_LEN>;

/// Errors reported while assembling records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Record exceeded [`MAX_RECORD_LEN`]; bytes are dropped until the next LF
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Appending bytes to the current record
    Collecting,
    /// Overflowed; discarding until LF
    Discarding,
}

/// Incremental LF-delimited record assembler
#[derive(Debug, Clone)]
pub struct LineAssembler {
    state: AssembleState,
    buffer: Record,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create an empty assembler
    pub const fn new() -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Drop any partial record and resume collecting
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
    }

    /// Bytes currently held for the record in progress
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Check whether the assembler is skipping an oversized record
    pub fn is_discarding(&self) -> bool {
        self.state == AssembleState::Discarding
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(record))` when an LF completes a record,
    /// `Ok(None)` when more bytes are needed, or `Err(LineError::Overflow)`
    /// on the byte that pushes a record past the limit. The overflow is
    /// reported once per oversized record.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Record>, LineError> {
        match (self.state, byte) {
            (AssembleState::Discarding, LINE_FEED) => {
                self.reset();
                Ok(None)
            }
            (AssembleState::Discarding, _) => Ok(None),
            (AssembleState::Collecting, LINE_FEED) => Ok(Some(core::mem::take(&mut self.buffer))),
            (AssembleState::Collecting, CARRIAGE_RETURN) => Ok(None),
            (AssembleState::Collecting, _) => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = AssembleState::Discarding;
                    return Err(LineError::Overflow);
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(assembler: &mut LineAssembler, bytes: &[u8]) -> Option<Record> {
        let mut last = None;
        for &b in bytes {
            if let Ok(Some(record)) = assembler.feed(b) {
                last = Some(record);
            }
        }
        last
    }

    #[test]
    fn test_single_record() {
        let mut assembler = LineAssembler::new();
        let record = feed_all(&mut assembler, b"AZ:10ALT:20\n").unwrap();
        assert_eq!(&record[..], b"AZ:10ALT:20");
        assert!(assembler.pending().is_empty());
    }

    #[test]
    fn test_carriage_return_discarded() {
        let mut assembler = LineAssembler::new();
        let record = feed_all(&mut assembler, b"AZ:1\rALT:2\r\n").unwrap();
        assert_eq!(&record[..], b"AZ:1ALT:2");
    }

    #[test]
    fn test_empty_record() {
        let mut assembler = LineAssembler::new();
        assert_eq!(assembler.feed(b'\n'), Ok(Some(Record::new())));
    }

    #[test]
    fn test_overflow_resyncs_on_next_line_feed() {
        let mut assembler = LineAssembler::new();

        for _ in 0..MAX_RECORD_LEN {
            assert_eq!(assembler.feed(b'x'), Ok(None));
        }
        assert_eq!(assembler.feed(b'x'), Err(LineError::Overflow));
        assert!(assembler.is_discarding());

        // Remainder of the oversized record is swallowed silently
        assert_eq!(assembler.feed(b'y'), Ok(None));
        assert_eq!(assembler.feed(b'\n'), Ok(None));
        assert!(!assembler.is_discarding());

        let record = feed_all(&mut assembler, b"AZ:5ALT:6\n").unwrap();
        assert_eq!(&record[..], b"AZ:5ALT:6");
    }

    #[test]
    fn test_record_at_exact_limit_is_kept() {
        let mut assembler = LineAssembler::new();
        for _ in 0..MAX_RECORD_LEN {
            assembler.feed(b'a').unwrap();
        }
        let record = assembler.feed(b'\n').unwrap().unwrap();
        assert_eq!(record.len(), MAX_RECORD_LEN);
    }

    #[test]
    fn test_reset_drops_partial_record() {
        let mut assembler = LineAssembler::new();
        feed_all(&mut assembler, b"AZ:12");
        assembler.reset();
        let record = feed_all(&mut assembler, b"ALT:3\n").unwrap();
        assert_eq!(&record[..], b"ALT:3");
    }
}
