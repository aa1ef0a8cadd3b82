//! I2C master primitives for the STM32F1 (I2C v1 peripheral)
//!
//! embassy-stm32 brings the peripheral up (clock, pins, timing) and then
//! only offers whole transfers. The burst protocol needs to change ACK
//! generation between individual bytes, so after construction every
//! primitive goes straight to the peripheral registers.

use embassy_stm32::i2c::{Config, I2c, Master};
use embassy_stm32::mode::Blocking;
use embassy_stm32::pac;
use embassy_stm32::time::Hertz;
use mpulink_hal::i2c::{I2cConfig, I2cPrimitives, StatusFlag};

/// Build the embassy driver configuration for a bus
pub fn driver_config(config: &I2cConfig) -> Config {
    let mut driver = Config::default();
    driver.frequency = Hertz(config.frequency);
    // External 4.7k pull-ups on the sensor breakout; F1 (gpio_v1) has no
    // internal pull-up option on AF open-drain pins, so nothing to disable
    driver
}

/// Register-level I2C master
///
/// Holds the embassy driver so the peripheral stays clocked and pinned,
/// and drives the same peripheral through its register block.
pub struct Stm32I2c<'d> {
    _driver: I2c<'d, Blocking, Master>,
    regs: pac::i2c::I2c,
}

impl<'d> Stm32I2c<'d> {
    /// Wrap an initialized driver
    ///
    /// `regs` must be the register block of the peripheral `driver` was
    /// built from (e.g. `pac::I2C1` for `p.I2C1`).
    pub fn new(driver: I2c<'d, Blocking, Master>, regs: pac::i2c::I2c) -> Self {
        Self {
            _driver: driver,
            regs,
        }
    }
}

impl I2cPrimitives for Stm32I2c<'_> {
    fn start(&mut self) {
        self.regs.cr1().modify(|w| w.set_start(true));
    }

    fn stop(&mut self) {
        self.regs.cr1().modify(|w| w.set_stop(true));
    }

    fn send_header(&mut self, header: u8) {
        // SB is cleared by the SR1 read in `flag` followed by this write
        self.regs.dr().write(|w| w.set_dr(header));
    }

    fn transmit(&mut self, byte: u8) {
        self.regs.dr().write(|w| w.set_dr(byte));
    }

    fn receive(&mut self) -> u8 {
        self.regs.dr().read().dr()
    }

    fn set_ack(&mut self, enabled: bool) {
        self.regs.cr1().modify(|w| w.set_ack(enabled));
    }

    fn flag(&mut self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::StartSent => self.regs.sr1().read().start(),
            StatusFlag::AddressAcked => self.regs.sr1().read().addr(),
            StatusFlag::TxEmpty => self.regs.sr1().read().txe(),
            StatusFlag::RxNotEmpty => self.regs.sr1().read().rxne(),
            StatusFlag::Busy => self.regs.sr2().read().busy(),
        }
    }

    fn clear_flag(&mut self, flag: StatusFlag) {
        match flag {
            // ADDR clears on an SR1 read followed by an SR2 read
            StatusFlag::AddressAcked => {
                let _ = self.regs.sr1().read();
                let _ = self.regs.sr2().read();
            }
            // The rest clear as a side effect of DR access
            StatusFlag::StartSent
            | StatusFlag::TxEmpty
            | StatusFlag::RxNotEmpty
            | StatusFlag::Busy => {}
        }
    }
}
