//! Link-gated telemetry reporter
//!
//! Lines are only handed to the transport while it reports the link as
//! established. Anything else is dropped on the spot: no retry, no queue,
//! no backpressure on the poll loop.

use core::fmt::Write;

use heapless::String;
use mpulink_hal::link::TextLink;

use crate::traits::Reading;

/// Capacity of one formatted line
///
/// The longest line (every field `-32768`) is 70 bytes.
pub const LINE_CAPACITY: usize = 96;

/// Format a reading as one telemetry line
///
/// `Ax: <ax>\tAy:<ay>\tAz:<az>\tT:<t>\tGx:<gx>\tGy:<gy>\tGz:<gz>\n`, with
/// the temperature printed as a signed value.
pub fn format_line(reading: &Reading) -> String<LINE_CAPACITY> {
    let mut line = String::new();
    // Cannot overflow: LINE_CAPACITY covers the worst case
    let _ = write!(
        line,
        "Ax: {}\tAy:{}\tAz:{}\tT:{}\tGx:{}\tGy:{}\tGz:{}\n",
        reading.accel_x,
        reading.accel_y,
        reading.accel_z,
        reading.temperature_signed(),
        reading.gyro_x,
        reading.gyro_y,
        reading.gyro_z,
    );
    line
}

/// Best-effort telemetry sender
pub struct Reporter<L> {
    link: L,
    sent: u32,
    dropped: u32,
}

impl<L: TextLink> Reporter<L> {
    /// Create a reporter over a transport
    pub fn new(link: L) -> Self {
        Self {
            link,
            sent: 0,
            dropped: 0,
        }
    }

    /// Send one reading line if the link is up
    pub fn report(&mut self, reading: &Reading) {
        let line = format_line(reading);
        self.emit(line.as_bytes());
    }

    /// Send a free-form status line if the link is up
    pub fn announce(&mut self, text: &str) {
        self.emit(text.as_bytes());
    }

    /// Lines accepted by the transport
    pub fn sent(&self) -> u32 {
        self.sent
    }

    /// Lines discarded (link down or transport refused)
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Borrow the transport
    pub fn link(&self) -> &L {
        &self.link
    }

    fn emit(&mut self, bytes: &[u8]) {
        if !self.link.is_connected() {
            self.dropped = self.dropped.wrapping_add(1);
            return;
        }

        match self.link.send(bytes) {
            Ok(()) => self.sent = self.sent.wrapping_add(1),
            Err(_) => self.dropped = self.dropped.wrapping_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    /// Mock transport recording everything it is given
    struct MockLink {
        connected: bool,
        refuse: bool,
        written: Vec<u8, 512>,
        sends: usize,
    }

    impl MockLink {
        fn new(connected: bool) -> Self {
            Self {
                connected,
                refuse: false,
                written: Vec::new(),
                sends: 0,
            }
        }
    }

    impl TextLink for MockLink {
        type Error = ();

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.sends += 1;
            if self.refuse {
                return Err(());
            }
            self.written.extend_from_slice(data).map_err(|_| ())
        }
    }

    fn sample() -> Reading {
        Reading::from_words([1, 2, 3, 200, 4, 5, 6])
    }

    #[test]
    fn test_line_format() {
        let line = format_line(&sample());
        assert_eq!(
            line.as_str(),
            "Ax: 1\tAy:2\tAz:3\tT:200\tGx:4\tGy:5\tGz:6\n"
        );
    }

    #[test]
    fn test_line_prints_signed_temperature() {
        let reading = Reading::from_words([0, 0, 0, -200, 0, 0, 0]);
        let line = format_line(&reading);
        assert!(line.as_str().contains("\tT:-200\t"));
    }

    #[test]
    fn test_worst_case_line_fits() {
        let reading = Reading::from_words([i16::MIN; 7]);
        let line = format_line(&reading);
        assert_eq!(line.len(), 70);
        assert!(line.as_str().ends_with("Gz:-32768\n"));
    }

    #[test]
    fn test_report_when_connected() {
        let mut reporter = Reporter::new(MockLink::new(true));
        reporter.report(&sample());

        assert_eq!(
            reporter.link().written.as_slice(),
            b"Ax: 1\tAy:2\tAz:3\tT:200\tGx:4\tGy:5\tGz:6\n"
        );
        assert_eq!(reporter.sent(), 1);
        assert_eq!(reporter.dropped(), 0);
    }

    #[test]
    fn test_report_dropped_when_disconnected() {
        let mut reporter = Reporter::new(MockLink::new(false));
        reporter.report(&sample());
        reporter.announce("Setup ok.\n");

        // Transport never called, nothing held back
        assert_eq!(reporter.link().sends, 0);
        assert!(reporter.link().written.is_empty());
        assert_eq!(reporter.dropped(), 2);
    }

    #[test]
    fn test_dropped_lines_not_replayed() {
        let mut link = MockLink::new(false);
        {
            let mut reporter = Reporter::new(&mut link);
            reporter.report(&sample());
        }

        link.connected = true;
        let mut reporter = Reporter::new(&mut link);
        reporter.announce("hi\n");
        assert_eq!(reporter.link().written.as_slice(), b"hi\n");
    }

    #[test]
    fn test_transport_refusal_counts_as_drop() {
        let mut link = MockLink::new(true);
        link.refuse = true;
        let mut reporter = Reporter::new(link);
        reporter.report(&sample());

        assert_eq!(reporter.link().sends, 1);
        assert_eq!(reporter.sent(), 0);
        assert_eq!(reporter.dropped(), 1);
    }
}
