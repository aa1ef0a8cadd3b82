//! Inter-task communication
//!
//! The poll task writes telemetry lines into [`TX_PIPE`]; the CDC task
//! drains it and owns [`LINK_UP`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use portable_atomic::AtomicBool;

/// Outbound telemetry buffer size (a few lines at the poll rate)
pub const TX_PIPE_SIZE: usize = 256;

/// Telemetry bytes waiting for the USB endpoint
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_PIPE_SIZE> = Pipe::new();

/// Host has the CDC interface configured
pub static LINK_UP: AtomicBool = AtomicBool::new(false);
