//! Motion reading and sensor trait

use crate::bus::BusFault;

/// Number of 16-bit words in one [`Reading`]
pub const READING_WORDS: usize = 7;

/// One sample of the motion block, in register order
///
/// Only ever built from a complete burst of [`READING_WORDS`] words, so a
/// partially received block never becomes a `Reading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Acceleration X (raw counts)
    pub accel_x: i16,
    /// Acceleration Y (raw counts)
    pub accel_y: i16,
    /// Acceleration Z (raw counts)
    pub accel_z: i16,
    /// Die temperature, raw register value
    ///
    /// Stored unsigned; the sensor actually encodes two's complement, see
    /// [`Reading::temperature_signed`].
    pub temperature: u16,
    /// Angular rate X (raw counts)
    pub gyro_x: i16,
    /// Angular rate Y (raw counts)
    pub gyro_y: i16,
    /// Angular rate Z (raw counts)
    pub gyro_z: i16,
}

impl Reading {
    /// Build a reading from a complete burst
    pub const fn from_words(words: [i16; READING_WORDS]) -> Self {
        Self {
            accel_x: words[0],
            accel_y: words[1],
            accel_z: words[2],
            temperature: words[3] as u16,
            gyro_x: words[4],
            gyro_y: words[5],
            gyro_z: words[6],
        }
    }

    /// Temperature reinterpreted as the signed value the sensor encodes
    pub const fn temperature_signed(&self) -> i16 {
        self.temperature as i16
    }
}

/// Trait for motion sensors polled over a bus
pub trait MotionSensor {
    /// One-time device setup (wake, filter selection, ...)
    fn configure(&mut self) -> Result<(), BusFault>;

    /// Read one complete motion sample
    fn read_motion(&mut self) -> Result<Reading, BusFault>;
}
