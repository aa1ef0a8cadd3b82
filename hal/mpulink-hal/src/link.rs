//! Outbound text transport abstraction
//!
//! The transport owns its buffering and framing. Callers only ask whether
//! the link is up and hand over bytes.

/// Outbound byte transport with a link-established state
pub trait TextLink {
    /// Error type for send operations
    type Error;

    /// Whether the host side is currently attached and configured
    fn is_connected(&self) -> bool;

    /// Queue `data` for transmission
    ///
    /// Does not wait for the host to drain it.
    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: TextLink + ?Sized> TextLink for &mut T {
    type Error = T::Error;

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).send(data)
    }
}

/// Serial line configuration (reported to the host over CDC)
#[derive(Debug, Clone, Copy)]
pub struct LinkConfig {
    /// Maximum packet size in bytes
    pub max_packet_size: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_packet_size: 64, // full-speed bulk endpoint
        }
    }
}
