// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Stepper drive image: steps the motor as commanded by the host.

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

use forcerig::app::StepperDrive;
use forcerig::config::{
    StepperConfig, TransportConfig, BAUD_RATE, RX_BUFFER_SIZE, TX_BUFFER_SIZE,
};
use forcerig::drivers::{Led, Polarity, StepDriver};
use forcerig::hw::{BoardPins, CycleDelay, Iwdg, Usart3};
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

    // Stepper driver
    let config = StepperConfig::default();
    let motor = StepDriver::new(
        pins.stepper.step,
        pins.stepper.dir,
        pins.stepper.enable,
        delay,
        config,
    );

    let led = Led::new(pins.led, Polarity::ActiveHigh);
    let watchdog = Iwdg::start(dp.IWDG);

    StepperDrive::new(motor, port, watchdog, led, config).run()
}

#[interrupt]
fn USART3() {
    critical_section::with(|cs| {
        if let Some(isr) = SERIAL_ISR.borrow_ref_mut(cs).as_mut() {
            Usart3::on_interrupt(isr);
        }
    });
}
