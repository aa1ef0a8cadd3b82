//! Simulated I2C peripheral
//!
//! Implements [`I2cPrimitives`] against an in-memory register file with the
//! usual auto-incrementing register pointer: the first byte of a write
//! transaction sets the pointer, later bytes are stored, and reads stream
//! from the pointer. Every primitive call is recorded so tests can check
//! the exact bus sequence.
//!
//! Status flags behave like an ideal controller: start and byte transfers
//! complete immediately. Faults are injected explicitly.

use heapless::Vec;
use mpulink_hal::i2c::{Direction, I2cPrimitives, StatusFlag};

/// Maximum recorded events before new ones are dropped
pub const MAX_EVENTS: usize = 128;

/// One recorded primitive operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// Start condition
    Start,
    /// Address header written
    Header(u8),
    /// Data byte transmitted
    Transmit(u8),
    /// Data byte received, and whether the controller acknowledged it
    Receive { byte: u8, acked: bool },
    /// ACK generation changed
    Ack(bool),
    /// Stop condition
    Stop,
    /// Software cleared a status flag
    ClearFlag(StatusFlag),
}

/// In-memory peripheral behind a simulated controller
pub struct SimulatedBus {
    address: u8,
    registers: [u8; 256],
    pointer: u8,
    /// Transaction direction once the header matched
    addressed: Option<Direction>,
    /// Next written byte selects the register pointer
    expect_pointer: bool,
    start_sent: bool,
    address_flag: bool,
    ack: bool,
    busy: bool,
    responsive: bool,
    /// Headers acknowledged before the peripheral goes silent
    header_limit: Option<u32>,
    headers_seen: u32,
    /// Bytes delivered per read transaction before data stops arriving
    byte_limit: Option<u32>,
    bytes_this_read: u32,
    polls: u32,
    events: Vec<BusEvent, MAX_EVENTS>,
}

impl SimulatedBus {
    /// Peripheral at a 7-bit `address` with all registers zeroed
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            pointer: 0,
            addressed: None,
            expect_pointer: false,
            start_sent: false,
            address_flag: false,
            ack: false,
            busy: false,
            responsive: true,
            header_limit: None,
            headers_seen: 0,
            byte_limit: None,
            bytes_this_read: 0,
            polls: 0,
            events: Vec::new(),
        }
    }

    /// Preload registers starting at `start`
    pub fn load(&mut self, start: u8, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            let reg = start.wrapping_add(offset as u8);
            self.registers[reg as usize] = byte;
        }
    }

    /// Value of one register
    pub fn register(&self, reg: u8) -> u8 {
        self.registers[reg as usize]
    }

    /// When false, the peripheral never acknowledges its address
    pub fn set_responsive(&mut self, responsive: bool) {
        self.responsive = responsive;
    }

    /// Hold the bus busy (clock or data line stuck low)
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Acknowledge only the next `count` headers, then go silent
    pub fn fail_after_headers(&mut self, count: u32) {
        self.header_limit = Some(self.headers_seen + count);
    }

    /// Deliver at most `count` bytes per read transaction
    pub fn stall_after_bytes(&mut self, count: u32) {
        self.byte_limit = Some(count);
    }

    /// Current ACK generation setting
    pub fn ack_enabled(&self) -> bool {
        self.ack
    }

    /// Recorded events, oldest first
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Forget recorded events
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Total status-flag samples taken
    pub fn polls(&self) -> u32 {
        self.polls
    }

    fn record(&mut self, event: BusEvent) {
        // Full log: keep the oldest events
        let _ = self.events.push(event);
    }

    fn acknowledges(&self, header: u8) -> bool {
        let within_limit = self
            .header_limit
            .map_or(true, |limit| self.headers_seen < limit);
        self.responsive && within_limit && header >> 1 == self.address
    }

    fn data_available(&self) -> bool {
        self.byte_limit
            .map_or(true, |limit| self.bytes_this_read < limit)
    }
}

impl I2cPrimitives for SimulatedBus {
    fn start(&mut self) {
        self.start_sent = true;
        self.addressed = None;
        self.address_flag = false;
        self.record(BusEvent::Start);
    }

    fn stop(&mut self) {
        self.start_sent = false;
        self.addressed = None;
        self.address_flag = false;
        self.record(BusEvent::Stop);
    }

    fn send_header(&mut self, header: u8) {
        // Writing the header clears the start flag in hardware
        self.start_sent = false;
        self.record(BusEvent::Header(header));

        if self.acknowledges(header) {
            let direction = if header & 1 == 1 {
                Direction::Read
            } else {
                Direction::Write
            };
            self.addressed = Some(direction);
            self.address_flag = true;
            self.expect_pointer = direction == Direction::Write;
            self.bytes_this_read = 0;
        }
        self.headers_seen += 1;
    }

    fn transmit(&mut self, byte: u8) {
        self.record(BusEvent::Transmit(byte));

        if self.addressed != Some(Direction::Write) {
            return;
        }

        if self.expect_pointer {
            self.pointer = byte;
            self.expect_pointer = false;
        } else {
            self.registers[self.pointer as usize] = byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
    }

    fn receive(&mut self) -> u8 {
        // Released bus reads as all ones
        let byte = if self.addressed == Some(Direction::Read) {
            let byte = self.registers[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
            self.bytes_this_read += 1;
            byte
        } else {
            0xFF
        };

        self.record(BusEvent::Receive {
            byte,
            acked: self.ack,
        });
        byte
    }

    fn set_ack(&mut self, enabled: bool) {
        self.ack = enabled;
        self.record(BusEvent::Ack(enabled));
    }

    fn flag(&mut self, flag: StatusFlag) -> bool {
        self.polls += 1;

        match flag {
            StatusFlag::StartSent => self.start_sent,
            StatusFlag::AddressAcked => self.address_flag,
            StatusFlag::TxEmpty => self.addressed == Some(Direction::Write),
            StatusFlag::RxNotEmpty => {
                self.addressed == Some(Direction::Read) && self.data_available()
            }
            StatusFlag::Busy => self.busy,
        }
    }

    fn clear_flag(&mut self, flag: StatusFlag) {
        if flag == StatusFlag::AddressAcked {
            self.address_flag = false;
        }
        self.record(BusEvent::ClearFlag(flag));
    }
}
