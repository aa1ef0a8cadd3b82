//! mpulink - MPU-6050 telemetry over USB CDC
//!
//! Main firmware binary for STM32F103 boards. Polls an MPU-6050 over I2C
//! every 20 ms and streams one text line per sample to the host over a
//! USB virtual serial port.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, pac, peripherals, usb, Config};
use embassy_time::Timer;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::Builder;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mpulink_core::bus::SpinBudget;
use mpulink_core::config::PollConfig;
use mpulink_core::poll::PollLoop;
use mpulink_core::telemetry::Reporter;
use mpulink_drivers::sensor::Mpu6050;
use mpulink_hal::LinkConfig;
use mpulink_hal_stm32f1::i2c::{driver_config, Stm32I2c};
use mpulink_hal_stm32f1::link::PipeLink;

use crate::channels::{LINK_UP, TX_PIPE};

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    USB_LP_CAN1_RX0 => usb::InterruptHandler<peripherals::USB>;
});

// USB descriptor and control buffers (must live forever)
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CDC_STATE: StaticCell<State> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("mpulink firmware starting...");

    let mut p = embassy_stm32::init(clock_config());
    info!("Peripherals initialized");

    // Pull D+ low so the host notices a fresh device after a reset
    {
        let _dp = Output::new(p.PA12.reborrow(), Level::Low, Speed::Low);
        Timer::after_millis(board::USB_REENUMERATE_MS).await;
    }

    // Sensor bus
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, driver_config(&board::I2C));
    let bus = Stm32I2c::new(i2c, pac::I2C1);
    let sensor = Mpu6050::new(bus, SpinBudget::default());
    info!("I2C initialized at {} Hz", board::I2C.frequency);

    // USB CDC
    let driver = usb::Driver::new(p.USB, Irqs, p.PA12, p.PA11);
    let link_config = LinkConfig::default();

    let mut usb_config = embassy_usb::Config::new(board::USB_VID, board::USB_PID);
    usb_config.manufacturer = Some(board::USB_MANUFACTURER);
    usb_config.product = Some(board::USB_PRODUCT);
    usb_config.serial_number = Some(board::USB_SERIAL);
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [],
        CONTROL_BUF.init([0; 64]),
    );
    let class = CdcAcmClass::new(
        &mut builder,
        CDC_STATE.init(State::new()),
        link_config.max_packet_size,
    );
    let usb = builder.build();
    info!("USB CDC initialized");

    let reporter = Reporter::new(PipeLink::new(&TX_PIPE, &LINK_UP));
    let poll = PollLoop::new(sensor, reporter, PollConfig::default());

    info!("Spawning tasks...");
    spawner.spawn(tasks::usb_task(usb)).unwrap();
    spawner.spawn(tasks::cdc_tx_task(class)).unwrap();
    spawner.spawn(tasks::poll_task(poll)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// 8 MHz HSE through the PLL to 72 MHz; USB gets 48 MHz via the /1.5 tap
fn clock_config() -> Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(board::HSE_HZ),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll = Some(Pll {
        src: PllSource::HSE,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL9,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV1;
    config
}
