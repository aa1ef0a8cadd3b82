//! USB CDC telemetry transport
//!
//! The poll loop is synchronous and must never wait on the host, so lines
//! go into a [`Pipe`] and a separate task moves them to the CDC bulk
//! endpoint. The connection flag is owned by that task and read here.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::pipe::Pipe;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::driver::{Driver, EndpointError};
use mpulink_hal::link::TextLink;
use portable_atomic::{AtomicBool, Ordering};

/// Full-speed bulk packet size
pub const MAX_PACKET_SIZE: usize = 64;

/// Error from queueing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Not enough room left for the whole line
    Overflow,
}

/// [`TextLink`] writing into a pipe drained by the USB task
pub struct PipeLink<'a, M: RawMutex, const N: usize> {
    pipe: &'a Pipe<M, N>,
    connected: &'a AtomicBool,
}

impl<'a, M: RawMutex, const N: usize> PipeLink<'a, M, N> {
    /// Create a link over a shared pipe and connection flag
    pub fn new(pipe: &'a Pipe<M, N>, connected: &'a AtomicBool) -> Self {
        Self { pipe, connected }
    }
}

impl<M: RawMutex, const N: usize> TextLink for PipeLink<'_, M, N> {
    type Error = LinkError;

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Queue the whole line or none of it
    fn send(&mut self, data: &[u8]) -> Result<(), LinkError> {
        if data.len() > self.pipe.capacity() - self.pipe.len() {
            return Err(LinkError::Overflow);
        }

        // Only one writer, so the room checked above is still there
        let mut rest = data;
        while !rest.is_empty() {
            let written = self
                .pipe
                .try_write(rest)
                .map_err(|_| LinkError::Overflow)?;
            rest = &rest[written..];
        }
        Ok(())
    }
}

/// Move queued bytes to the CDC endpoint until the host goes away
///
/// A full packet is followed by a zero-length packet so the host does not
/// sit on a line that happens to end on a packet boundary. Returns the
/// endpoint error that ended the session.
pub async fn forward_pipe<'d, D: Driver<'d>, M: RawMutex, const N: usize>(
    class: &mut CdcAcmClass<'d, D>,
    pipe: &Pipe<M, N>,
) -> EndpointError {
    let mut packet = [0u8; MAX_PACKET_SIZE];

    loop {
        let len = pipe.read(&mut packet).await;

        if let Err(e) = class.write_packet(&packet[..len]).await {
            return e;
        }
        if len == MAX_PACKET_SIZE {
            if let Err(e) = class.write_packet(&[]).await {
                return e;
            }
        }
    }
}
