//! MPU-6050 6-axis motion sensor
//!
//! Accelerometer, gyroscope and die temperature on one I2C device. The
//! fourteen data registers from `ACCEL_XOUT_H` are contiguous and
//! big-endian, so a full sample is a single seven-word burst.

use mpulink_core::bus::{BusEngine, BusFault, SpinBudget};
use mpulink_core::traits::{MotionSensor, Reading, READING_WORDS};
use mpulink_hal::i2c::I2cPrimitives;

/// Register map (subset used by this driver)
pub mod reg {
    /// 7-bit bus address with AD0 tied low
    pub const ADDRESS: u8 = 0x68;
    /// Digital low-pass filter configuration
    pub const CONFIG: u8 = 0x1A;
    /// First register of the motion block
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    /// Power management 1
    pub const PWR_MGMT_1: u8 = 0x6B;
}

/// `PWR_MGMT_1` value: leave sleep, internal oscillator
pub const WAKE: u8 = 0x00;

/// `CONFIG` value: DLPF setting 4 (about 20 Hz bandwidth)
pub const DLPF_CFG: u8 = 0x04;

/// MPU-6050 on a dedicated bus engine
pub struct Mpu6050<P> {
    engine: BusEngine<P>,
}

impl<P: I2cPrimitives> Mpu6050<P> {
    /// Create a driver at the default address
    ///
    /// Does not touch the device; call
    /// [`configure`](MotionSensor::configure) before reading.
    pub fn new(bus: P, budget: SpinBudget) -> Self {
        Self::with_address(bus, reg::ADDRESS, budget)
    }

    /// Create a driver at a non-default address (AD0 tied high is 0x69)
    pub fn with_address(bus: P, address: u8, budget: SpinBudget) -> Self {
        Self {
            engine: BusEngine::new(bus, address, budget),
        }
    }

    /// Write one register
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusFault> {
        self.engine.write_bytes(&[register, value])
    }

    /// Borrow the bus engine
    pub fn engine(&self) -> &BusEngine<P> {
        &self.engine
    }

    /// Mutably borrow the bus engine
    pub fn engine_mut(&mut self) -> &mut BusEngine<P> {
        &mut self.engine
    }

    /// Give the bus back
    pub fn release(self) -> P {
        self.engine.release()
    }
}

impl<P: I2cPrimitives> MotionSensor for Mpu6050<P> {
    fn configure(&mut self) -> Result<(), BusFault> {
        self.engine.wait_until_idle()?;
        self.write_register(reg::PWR_MGMT_1, WAKE)?;
        self.write_register(reg::CONFIG, DLPF_CFG)
    }

    fn read_motion(&mut self) -> Result<Reading, BusFault> {
        let words = self.engine.burst_read::<READING_WORDS>(reg::ACCEL_XOUT_H)?;
        Ok(Reading::from_words(words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpulink_core::bus::sim::{BusEvent, SimulatedBus};
    use mpulink_hal::i2c::StatusFlag;

    /// ax=1, ay=2, az=3, t=200, gx=4, gy=5, gz=6
    const SAMPLE: [u8; 14] = [
        0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0xC8, 0x00, 0x04, 0x00, 0x05, 0x00, 0x06,
    ];

    fn sensor() -> Mpu6050<SimulatedBus> {
        let mut bus = SimulatedBus::new(reg::ADDRESS);
        // Power-on state: asleep
        bus.load(reg::PWR_MGMT_1, &[0x40]);
        bus.load(reg::ACCEL_XOUT_H, &SAMPLE);
        Mpu6050::new(bus, SpinBudget::new(16))
    }

    #[test]
    fn test_configure_writes_wake_and_filter() {
        let mut mpu = sensor();
        mpu.engine_mut().bus_mut().clear_events();
        mpu.configure().unwrap();

        let bus = mpu.engine().bus();
        assert_eq!(bus.register(reg::PWR_MGMT_1), 0x00);
        assert_eq!(bus.register(reg::CONFIG), 0x04);

        let written: heapless::Vec<u8, 8> = bus
            .events()
            .iter()
            .filter_map(|e| match e {
                BusEvent::Transmit(byte) => Some(*byte),
                _ => None,
            })
            .collect();
        assert_eq!(written.as_slice(), &[0x6B, 0x00, 0x1A, 0x04]);
    }

    #[test]
    fn test_configure_fails_on_stuck_bus() {
        let mut mpu = sensor();
        mpu.engine_mut().bus_mut().set_busy(true);

        assert_eq!(
            mpu.configure(),
            Err(BusFault::Timeout {
                phase: mpulink_core::bus::TransactionPhase::Idle,
                awaiting: StatusFlag::Busy,
            })
        );
        // Never got as far as waking the device
        assert_eq!(mpu.engine().bus().register(reg::PWR_MGMT_1), 0x40);
    }

    #[test]
    fn test_read_motion_sample() {
        let mut mpu = sensor();
        mpu.configure().unwrap();
        let reading = mpu.read_motion().unwrap();

        assert_eq!(reading, Reading::from_words([1, 2, 3, 200, 4, 5, 6]));
    }

    #[test]
    fn test_read_motion_negative_values() {
        let mut mpu = sensor();
        // ax = -2 (0xFFFE), t = -200 (0xFF38)
        mpu.engine_mut().bus_mut().load(reg::ACCEL_XOUT_H, &[0xFF, 0xFE]);
        mpu.engine_mut().bus_mut().load(0x41, &[0xFF, 0x38]);

        let reading = mpu.read_motion().unwrap();
        assert_eq!(reading.accel_x, -2);
        assert_eq!(reading.temperature, 0xFF38);
        assert_eq!(reading.temperature_signed(), -200);
    }

    #[test]
    fn test_absent_device_times_out() {
        let mut mpu = sensor();
        mpu.engine_mut().bus_mut().set_responsive(false);

        assert!(matches!(
            mpu.read_motion(),
            Err(BusFault::Timeout {
                awaiting: StatusFlag::AddressAcked,
                ..
            })
        ));
        // Ready for the next cycle
        assert!(mpu.engine().ack_enabled());
    }

    #[test]
    fn test_alternate_address() {
        let mut bus = SimulatedBus::new(0x69);
        bus.load(reg::ACCEL_XOUT_H, &SAMPLE);
        let mut mpu = Mpu6050::with_address(bus, 0x69, SpinBudget::new(16));

        assert!(mpu.read_motion().is_ok());
        assert!(mpu
            .release()
            .events()
            .contains(&BusEvent::Header(0xD3)));
    }
}
