//! Inter-task communication channels
//!
//! The TCP link task and the control task only meet here. The control side
//! never awaits on these: it polls the signal and drains the pipe with
//! `try_read`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_sync::signal::Signal;

use altaz_core::mount::MAX_BYTES_PER_POLL;

/// Link receive buffer size
pub const LINK_RX_SIZE: usize = MAX_BYTES_PER_POLL;

/// Command bytes from the active client, in arrival order
pub static LINK_RX: Pipe<CriticalSectionRawMutex, LINK_RX_SIZE> = Pipe::new();

/// Set when a new client has been accepted (pipe already cleared)
pub static CLIENT_CONNECTED: Signal<CriticalSectionRawMutex, ()> = Signal::new();
