//! I2C bus abstractions
//!
//! Unlike a transaction-level `write`/`read` API, these primitives map
//! one-to-one onto the controller's register operations. The caller is
//! responsible for sequencing them and for waiting on status flags.

/// Transfer direction, encoded in bit 0 of the address header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Controller transmits (R/W bit = 0)
    Write,
    /// Controller receives (R/W bit = 1)
    Read,
}

impl Direction {
    /// Value of the R/W bit in the address header
    pub const fn rw_bit(self) -> u8 {
        match self {
            Direction::Write => 0,
            Direction::Read => 1,
        }
    }

    /// Build the 8-bit header for a 7-bit address
    pub const fn header(self, address: u8) -> u8 {
        ((address & 0x7F) << 1) | self.rw_bit()
    }
}

/// Hardware status conditions the controller reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusFlag {
    /// Start condition has been generated
    StartSent,
    /// Address header was acknowledged by the peripheral
    AddressAcked,
    /// Transmit data register is empty
    TxEmpty,
    /// Receive data register holds a byte
    RxNotEmpty,
    /// Bus is busy (SCL or SDA held low)
    Busy,
}

/// Register-level I2C master
///
/// Every method is synchronous and returns immediately; none of them wait
/// for the hardware. Waiting is done by polling [`I2cPrimitives::flag`].
pub trait I2cPrimitives {
    /// Generate a start condition
    fn start(&mut self);

    /// Generate a stop condition
    fn stop(&mut self);

    /// Write the 8-bit address header (7-bit address << 1 | R/W)
    fn send_header(&mut self, header: u8);

    /// Write one byte to the transmit data register
    fn transmit(&mut self, byte: u8);

    /// Read one byte from the receive data register
    fn receive(&mut self) -> u8;

    /// Enable or disable automatic ACK on received bytes
    fn set_ack(&mut self, enabled: bool);

    /// Sample a status flag
    fn flag(&mut self, flag: StatusFlag) -> bool;

    /// Clear a status flag that software must acknowledge
    fn clear_flag(&mut self, flag: StatusFlag);
}

impl<T: I2cPrimitives + ?Sized> I2cPrimitives for &mut T {
    fn start(&mut self) {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn send_header(&mut self, header: u8) {
        (**self).send_header(header)
    }

    fn transmit(&mut self, byte: u8) {
        (**self).transmit(byte)
    }

    fn receive(&mut self) -> u8 {
        (**self).receive()
    }

    fn set_ack(&mut self, enabled: bool) {
        (**self).set_ack(enabled)
    }

    fn flag(&mut self, flag: StatusFlag) -> bool {
        (**self).flag(flag)
    }

    fn clear_flag(&mut self, flag: StatusFlag) {
        (**self).clear_flag(flag)
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100kHz standard mode
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_encoding() {
        assert_eq!(Direction::Write.header(0x68), 0xD0);
        assert_eq!(Direction::Read.header(0x68), 0xD1);
    }

    #[test]
    fn test_header_masks_eighth_bit() {
        // Only 7-bit addresses are supported
        assert_eq!(Direction::Write.header(0xE8), 0xD0);
    }
}
