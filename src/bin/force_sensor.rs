// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Force sensor image: streams load-cell readings, accepts calibration updates.

#![no_main]
#![no_std]

use core::cell::RefCell;

use cortex_m::peripheral::NVIC;
use cortex_m_rt::entry;
use critical_section::Mutex;
use panic_halt as _;

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use forcerig::app::ForceSensor;
use forcerig::config::{
    SamplerConfig, TransportConfig, BAUD_RATE, RX_BUFFER_SIZE, TX_BUFFER_SIZE,
};
use forcerig::drivers::{Hx711Array, Led, Polarity};
use forcerig::hw::{BoardPins, CycleDelay, FlashCalibration, Iwdg, Usart3};
use forcerig::serial::{SerialIsr, SerialTransport};

type Isr = SerialIsr<'static, Usart3, TX_BUFFER_SIZE, RX_BUFFER_SIZE>;

static LINK: SerialTransport<TX_BUFFER_SIZE, RX_BUFFER_SIZE> = SerialTransport::new();
static USART3_REGS: Usart3 = Usart3;
static SERIAL_ISR: Mutex<RefCell<Option<Isr>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let delay = CycleDelay::new(clocks.sysclk().raw());

    let pins = BoardPins::new(dp.GPIOB, dp.GPIOD, dp.GPIOE, dp.GPIOF);

    // USART3 (host link)
    let usart_cfg = Config {
        baud_rate: BAUD_RATE.bps(),
        ..Default::default()
    };
    let _serial = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, usart_cfg);
    let (port, isr) = LINK
        .split(&USART3_REGS, TransportConfig::default())
        .unwrap();
    critical_section::with(|cs| *SERIAL_ISR.borrow_ref_mut(cs) = Some(isr));
    Usart3::listen();
    unsafe { NVIC::unmask(pac::Interrupt::USART3) };

    // Load cells
    let cells = Hx711Array::new(
        pins.load_cells.sck,
        pins.load_cells.dout,
        delay,
        SamplerConfig::default(),
    );

    let led = Led::new(pins.led, Polarity::ActiveHigh);
    let store = FlashCalibration::new(dp.FLASH);
    let watchdog = Iwdg::start(dp.IWDG);

    ForceSensor::new(cells, port, store, watchdog, led).run()
}

#[interrupt]
fn USART3() {
    critical_section::with(|cs| {
        if let Some(isr) = SERIAL_ISR.borrow_ref_mut(cs).as_mut() {
            Usart3::on_interrupt(isr);
        }
    });
}
