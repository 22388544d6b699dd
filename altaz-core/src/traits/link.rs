//! Command link trait
//!
//! The transport delivering command bytes (a TCP socket on the target).
//! Connection management lives in the implementation; the controller only
//! sees connect notifications and a non-blocking byte source.

/// Non-blocking byte source for mount commands
pub trait CommandLink {
    /// Report whether a new client became active since the last call
    ///
    /// Implementations accept a new client only while none is active.
    fn poll_accept(&mut self) -> bool;

    /// Take the next buffered byte, if any
    ///
    /// Must never wait for data.
    fn try_read_byte(&mut self) -> Option<u8>;
}

impl<T: CommandLink + ?Sized> CommandLink for &mut T {
    fn poll_accept(&mut self) -> bool {
        (**self).poll_accept()
    }

    fn try_read_byte(&mut self) -> Option<u8> {
        (**self).try_read_byte()
    }
}
