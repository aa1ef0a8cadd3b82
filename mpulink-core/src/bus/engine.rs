//! Bus transaction engine
//!
//! Sequences [`I2cPrimitives`] into start / address / data / stop exchanges
//! with one fixed peripheral. Every wait on a hardware condition is a spin
//! bounded by a [`SpinBudget`]; running out of budget yields
//! [`BusFault::Timeout`] and releases the bus with a stop condition.
//!
//! The engine owns the bus. Only one transaction can be in flight, which
//! `&mut self` enforces.

use mpulink_hal::i2c::{Direction, I2cPrimitives, StatusFlag};

use crate::config::DEFAULT_MAX_POLLS;

/// Where a transaction currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionPhase {
    /// No transaction has been issued yet
    Idle,
    /// Start condition requested, address not yet acknowledged
    Started,
    /// Peripheral acknowledged its address
    AddressSent,
    /// At least one data byte moved
    Transferring,
    /// Stop condition issued
    Stopped,
}

impl TransactionPhase {
    /// Whether a start has been issued without a matching stop
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            TransactionPhase::Started | TransactionPhase::AddressSent | TransactionPhase::Transferring
        )
    }
}

/// Errors surfaced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// A hardware condition was not observed within the spin budget
    Timeout {
        /// Phase the transaction was in when the wait began
        phase: TransactionPhase,
        /// Condition being waited on
        awaiting: StatusFlag,
    },
    /// Data operation issued outside a transaction of the right direction
    OutOfSequence {
        /// Phase at the time of the call
        phase: TransactionPhase,
    },
    /// Burst read requested with zero words
    EmptyBurst,
}

/// Upper bound on how long the engine spins for a single condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpinBudget {
    /// Maximum flag polls per wait (at least one poll is always made)
    pub max_polls: u32,
}

impl SpinBudget {
    /// Create a budget of `max_polls` flag samples per wait
    pub const fn new(max_polls: u32) -> Self {
        Self { max_polls }
    }
}

impl Default for SpinBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POLLS)
    }
}

/// Transaction engine for a single 7-bit peripheral address
pub struct BusEngine<P> {
    bus: P,
    address: u8,
    budget: SpinBudget,
    phase: TransactionPhase,
    /// Direction of the open transaction, if any
    direction: Option<Direction>,
    ack_enabled: bool,
}

impl<P: I2cPrimitives> BusEngine<P> {
    /// Take ownership of an initialized bus
    ///
    /// ACK generation is switched on so every transaction starts from the
    /// same state.
    pub fn new(mut bus: P, address: u8, budget: SpinBudget) -> Self {
        bus.set_ack(true);
        Self {
            bus,
            address,
            budget,
            phase: TransactionPhase::Idle,
            direction: None,
            ack_enabled: true,
        }
    }

    /// Spin until the bus reports idle
    ///
    /// Used once at bring-up, before the first transaction.
    pub fn wait_until_idle(&mut self) -> Result<(), BusFault> {
        for _ in 0..self.budget.max_polls.max(1) {
            if !self.bus.flag(StatusFlag::Busy) {
                return Ok(());
            }
            core::hint::spin_loop();
        }

        Err(BusFault::Timeout {
            phase: self.phase,
            awaiting: StatusFlag::Busy,
        })
    }

    /// Issue a start condition and address the peripheral
    ///
    /// The start-sent flag is left alone; the hardware clears it when the
    /// header is written. The address-acknowledged flag is cleared exactly
    /// once, after it has been observed.
    pub fn begin_and_address(&mut self, direction: Direction) -> Result<(), BusFault> {
        self.bus.start();
        self.phase = TransactionPhase::Started;
        self.direction = Some(direction);
        self.await_flag(StatusFlag::StartSent)?;

        self.bus.send_header(direction.header(self.address));
        self.await_flag(StatusFlag::AddressAcked)?;
        self.bus.clear_flag(StatusFlag::AddressAcked);

        self.phase = TransactionPhase::AddressSent;
        Ok(())
    }

    /// Complete write transaction: address, `bytes`, stop
    ///
    /// An empty slice addresses the peripheral and stops.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), BusFault> {
        self.begin_and_address(Direction::Write)?;
        self.await_flag(StatusFlag::TxEmpty)?;

        for &byte in bytes {
            self.bus.transmit(byte);
            self.phase = TransactionPhase::Transferring;
            self.await_flag(StatusFlag::TxEmpty)?;
        }

        self.stop();
        Ok(())
    }

    /// Wait for the next received byte and return it
    ///
    /// Only valid inside a read transaction opened by
    /// [`begin_and_address`](Self::begin_and_address). Whether the byte is
    /// acknowledged depends on [`set_ack_enabled`](Self::set_ack_enabled).
    pub fn read_byte(&mut self) -> Result<u8, BusFault> {
        let readable = matches!(
            self.phase,
            TransactionPhase::AddressSent | TransactionPhase::Transferring
        ) && self.direction == Some(Direction::Read);

        if !readable {
            return Err(BusFault::OutOfSequence { phase: self.phase });
        }

        self.await_flag(StatusFlag::RxNotEmpty)?;
        self.phase = TransactionPhase::Transferring;
        Ok(self.bus.receive())
    }

    /// Enable or disable ACK generation on received bytes
    ///
    /// Anything that disables ACK must re-enable it before the next
    /// transaction, or every later read ends after one byte.
    pub fn set_ack_enabled(&mut self, enabled: bool) {
        self.bus.set_ack(enabled);
        self.ack_enabled = enabled;
    }

    /// Issue a stop condition
    pub fn stop(&mut self) {
        self.bus.stop();
        self.phase = TransactionPhase::Stopped;
        self.direction = None;
    }

    /// Current ACK generation setting
    pub fn ack_enabled(&self) -> bool {
        self.ack_enabled
    }

    /// Current transaction phase
    pub fn phase(&self) -> TransactionPhase {
        self.phase
    }

    /// 7-bit peripheral address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Spin budget applied to every wait
    pub fn budget(&self) -> SpinBudget {
        self.budget
    }

    /// Borrow the underlying bus
    pub fn bus(&self) -> &P {
        &self.bus
    }

    /// Mutably borrow the underlying bus
    pub fn bus_mut(&mut self) -> &mut P {
        &mut self.bus
    }

    /// Give the bus back
    pub fn release(self) -> P {
        self.bus
    }

    /// Spin until `flag` is set, or abort the transaction
    fn await_flag(&mut self, flag: StatusFlag) -> Result<(), BusFault> {
        for _ in 0..self.budget.max_polls.max(1) {
            if self.bus.flag(flag) {
                return Ok(());
            }
            core::hint::spin_loop();
        }

        let fault = BusFault::Timeout {
            phase: self.phase,
            awaiting: flag,
        };
        self.abort();
        Err(fault)
    }

    /// Release the bus after a fault
    fn abort(&mut self) {
        if self.phase.is_open() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::sim::{BusEvent, SimulatedBus};

    const ADDR: u8 = 0x68;

    fn engine(bus: SimulatedBus) -> BusEngine<SimulatedBus> {
        let mut engine = BusEngine::new(bus, ADDR, SpinBudget::new(16));
        engine.bus_mut().clear_events();
        engine
    }

    #[test]
    fn test_new_enables_ack() {
        let engine = BusEngine::new(SimulatedBus::new(ADDR), ADDR, SpinBudget::default());
        assert!(engine.ack_enabled());
        assert!(engine.bus().ack_enabled());
        assert_eq!(engine.phase(), TransactionPhase::Idle);
    }

    #[test]
    fn test_begin_read_sequence() {
        let mut engine = engine(SimulatedBus::new(ADDR));
        engine.begin_and_address(Direction::Read).unwrap();

        assert_eq!(
            engine.bus().events(),
            &[
                BusEvent::Start,
                BusEvent::Header(0xD1),
                BusEvent::ClearFlag(StatusFlag::AddressAcked),
            ]
        );
        assert_eq!(engine.phase(), TransactionPhase::AddressSent);
    }

    #[test]
    fn test_address_flag_cleared_once() {
        let mut engine = engine(SimulatedBus::new(ADDR));
        engine.write_bytes(&[0x6B, 0x00]).unwrap();

        let clears = engine
            .bus()
            .events()
            .iter()
            .filter(|e| matches!(e, BusEvent::ClearFlag(_)))
            .count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn test_start_flag_never_cleared() {
        let mut engine = engine(SimulatedBus::new(ADDR));
        engine.begin_and_address(Direction::Write).unwrap();

        assert!(!engine
            .bus()
            .events()
            .contains(&BusEvent::ClearFlag(StatusFlag::StartSent)));
    }

    #[test]
    fn test_write_sequence() {
        let mut engine = engine(SimulatedBus::new(ADDR));
        engine.write_bytes(&[0x1A, 0x04]).unwrap();

        assert_eq!(
            engine.bus().events(),
            &[
                BusEvent::Start,
                BusEvent::Header(0xD0),
                BusEvent::ClearFlag(StatusFlag::AddressAcked),
                BusEvent::Transmit(0x1A),
                BusEvent::Transmit(0x04),
                BusEvent::Stop,
            ]
        );
        assert_eq!(engine.phase(), TransactionPhase::Stopped);
        assert_eq!(engine.bus().register(0x1A), 0x04);
    }

    #[test]
    fn test_empty_write_is_address_probe() {
        let mut engine = engine(SimulatedBus::new(ADDR));
        engine.write_bytes(&[]).unwrap();

        assert_eq!(
            engine.bus().events(),
            &[
                BusEvent::Start,
                BusEvent::Header(0xD0),
                BusEvent::ClearFlag(StatusFlag::AddressAcked),
                BusEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_read_byte_requires_read_transaction() {
        let mut engine = engine(SimulatedBus::new(ADDR));

        // Nothing open yet
        assert_eq!(
            engine.read_byte(),
            Err(BusFault::OutOfSequence {
                phase: TransactionPhase::Idle
            })
        );

        // Write transaction open
        engine.begin_and_address(Direction::Write).unwrap();
        assert_eq!(
            engine.read_byte(),
            Err(BusFault::OutOfSequence {
                phase: TransactionPhase::AddressSent
            })
        );

        // No bus traffic caused by the rejected calls
        assert!(!engine
            .bus()
            .events()
            .iter()
            .any(|e| matches!(e, BusEvent::Receive { .. })));
    }

    #[test]
    fn test_read_byte_after_address() {
        let mut bus = SimulatedBus::new(ADDR);
        bus.load(0x3B, &[0xAB, 0xCD]);
        let mut engine = engine(bus);

        engine.write_bytes(&[0x3B]).unwrap();
        engine.begin_and_address(Direction::Read).unwrap();
        assert_eq!(engine.read_byte(), Ok(0xAB));
        assert_eq!(engine.read_byte(), Ok(0xCD));
        assert_eq!(engine.phase(), TransactionPhase::Transferring);
    }

    #[test]
    fn test_unresponsive_peripheral_times_out() {
        let mut bus = SimulatedBus::new(ADDR);
        bus.set_responsive(false);
        let mut engine = engine(bus);

        let result = engine.begin_and_address(Direction::Write);
        assert_eq!(
            result,
            Err(BusFault::Timeout {
                phase: TransactionPhase::Started,
                awaiting: StatusFlag::AddressAcked,
            })
        );

        // Bounded: one StartSent poll plus exactly the budget for the ACK
        assert_eq!(engine.bus().polls(), 1 + 16);
    }

    #[test]
    fn test_timeout_releases_bus() {
        let mut bus = SimulatedBus::new(ADDR);
        bus.set_responsive(false);
        let mut engine = engine(bus);

        let _ = engine.write_bytes(&[0x00]);
        assert_eq!(engine.bus().events().last(), Some(&BusEvent::Stop));
        assert_eq!(engine.phase(), TransactionPhase::Stopped);
    }

    #[test]
    fn test_wrong_address_is_not_acknowledged() {
        let mut engine = BusEngine::new(SimulatedBus::new(ADDR), 0x69, SpinBudget::new(4));
        assert!(matches!(
            engine.write_bytes(&[0x00]),
            Err(BusFault::Timeout {
                awaiting: StatusFlag::AddressAcked,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_budget_still_polls_once() {
        let mut engine = BusEngine::new(SimulatedBus::new(ADDR), ADDR, SpinBudget::new(0));
        assert!(engine.write_bytes(&[0x1A, 0x00]).is_ok());
    }

    #[test]
    fn test_wait_until_idle() {
        let mut bus = SimulatedBus::new(ADDR);
        bus.set_busy(true);
        let mut engine = engine(bus);

        assert_eq!(
            engine.wait_until_idle(),
            Err(BusFault::Timeout {
                phase: TransactionPhase::Idle,
                awaiting: StatusFlag::Busy,
            })
        );

        engine.bus_mut().set_busy(false);
        assert!(engine.wait_until_idle().is_ok());
    }

    #[test]
    fn test_ack_tracking() {
        let mut engine = engine(SimulatedBus::new(ADDR));
        engine.set_ack_enabled(false);
        assert!(!engine.ack_enabled());
        assert!(!engine.bus().ack_enabled());

        engine.set_ack_enabled(true);
        assert!(engine.ack_enabled());
        assert_eq!(
            engine.bus().events(),
            &[BusEvent::Ack(false), BusEvent::Ack(true)]
        );
    }
}
