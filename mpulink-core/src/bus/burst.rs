//! Burst register reader
//!
//! Reads consecutive big-endian 16-bit registers in one transaction:
//!
//! ```text
//! S AD+W     RA     P  S AD+R                       NACK P
//!        ACK    ACK           ACK DATA(1) ACK ... DATA(2N)
//! ```
//!
//! The register pointer is positioned with a complete write transaction,
//! then a fresh read transaction streams `2 * N` bytes. ACK stays enabled
//! until the last byte so the peripheral keeps sending; it is disabled
//! right before that byte so the peripheral sees a NACK and releases SDA
//! for the stop condition. Disabling it one byte early truncates the
//! transfer.

use mpulink_hal::i2c::{Direction, I2cPrimitives};

use super::engine::{BusEngine, BusFault};

/// Accumulator for the final word of a burst
///
/// The final word is assembled in two steps around the ACK change: the
/// high byte is shifted into place first, ACK is disabled, and the low byte
/// is added once it arrives. The result is identical to big-endian
/// assembly, which the tests check for every byte pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWord(u16);

impl TrailingWord {
    /// Place the high byte
    pub const fn from_high(high: u8) -> Self {
        Self((high as u16) << 8)
    }

    /// Add the low byte and finish the word
    pub const fn finish(self, low: u8) -> i16 {
        self.0.wrapping_add(low as u16) as i16
    }
}

/// Big-endian assembly used for every word except the last
pub const fn assemble_word(high: u8, low: u8) -> i16 {
    (((high as u16) << 8) | low as u16) as i16
}

impl<P: I2cPrimitives> BusEngine<P> {
    /// Read `N` consecutive 16-bit registers starting at `start_register`
    ///
    /// ACK generation is re-enabled before returning, whether or not the
    /// read succeeded. No words are returned on failure.
    pub fn burst_read<const N: usize>(&mut self, start_register: u8) -> Result<[i16; N], BusFault> {
        let mut words = [0i16; N];
        self.burst_read_into(start_register, &mut words)?;
        Ok(words)
    }

    /// Fill `words` from consecutive 16-bit registers at `start_register`
    ///
    /// Same transaction as [`burst_read`](Self::burst_read). On error the
    /// contents of `words` are unspecified.
    pub fn burst_read_into(&mut self, start_register: u8, words: &mut [i16]) -> Result<(), BusFault> {
        if words.is_empty() {
            return Err(BusFault::EmptyBurst);
        }

        self.write_bytes(&[start_register])?;
        let result = self.read_words(words);
        self.set_ack_enabled(true);

        result
    }

    fn read_words(&mut self, words: &mut [i16]) -> Result<(), BusFault> {
        let Some((last, leading)) = words.split_last_mut() else {
            return Err(BusFault::EmptyBurst);
        };

        self.begin_and_address(Direction::Read)?;

        for word in leading {
            let high = self.read_byte()?;
            let low = self.read_byte()?;
            *word = assemble_word(high, low);
        }

        let trailing = TrailingWord::from_high(self.read_byte()?);
        self.set_ack_enabled(false);
        *last = trailing.finish(self.read_byte()?);
        self.stop();

        Ok(())
    }
}
