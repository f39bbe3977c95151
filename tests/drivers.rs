// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

mod common;

use proptest::prelude::*;

use common::{Hx711Bank, RecordingDelay, SharedPin};
use forcerig::config::{SamplerConfig, StepperConfig, WaitLimit};
use forcerig::drivers::{
    Direction, Hx711Array, Led, LoadCells, Polarity, SampleError, StepDriver, Stepper,
};

#[test]
fn hx711_reads_both_channels_sign_extended() {
    let bank = Hx711Bank::new(&[0x12_3456, -2], 3);
    let delay = RecordingDelay::default();
    let mut cells = Hx711Array::new(
        bank.sck(),
        [bank.dout(0), bank.dout(1)],
        delay.clone(),
        SamplerConfig::default(),
    );

    assert_eq!(cells.acquire(), Ok([0x1234_5600, -512]));
    // 25 pulses, back to idle.
    assert_eq!(bank.pulses(), 0);
    assert!(delay.total_ns() >= 24 * 2 * 200);
}

#[test]
fn hx711_bounded_wait_reports_not_ready() {
    let bank = Hx711Bank::new(&[1, 1], u32::MAX);
    let mut cells = Hx711Array::new(
        bank.sck(),
        [bank.dout(0), bank.dout(1)],
        RecordingDelay::default(),
        SamplerConfig {
            ready_wait: WaitLimit::Polls(10),
        },
    );

    assert_eq!(cells.acquire(), Err(SampleError::NotReady));
    assert_eq!(bank.pulses(), 0);
}

proptest! {
    #[test]
    fn hx711_counts_recover_with_arithmetic_shift(a in -(1i32 << 23)..(1 << 23), b in -(1i32 << 23)..(1 << 23)) {
        let bank = Hx711Bank::new(&[a, b], 0);
        let mut cells = Hx711Array::new(
            bank.sck(),
            [bank.dout(0), bank.dout(1)],
            RecordingDelay::default(),
            SamplerConfig::default(),
        );

        let raw = cells.read().unwrap();
        prop_assert_eq!(raw[0] >> 8, a);
        prop_assert_eq!(raw[1] >> 8, b);
        prop_assert_eq!(raw[0] & 0xFF, 0);
    }
}

#[test]
fn step_driver_enables_on_first_step_and_releases_on_stop() {
    let (step, dir, en) = (SharedPin::default(), SharedPin::default(), SharedPin::default());
    let delay = RecordingDelay::default();
    let config = StepperConfig::default();
    let mut motor = StepDriver::new(step.clone(), dir.clone(), en.clone(), delay.clone(), config);

    assert!(en.is_high());
    assert!(!motor.is_enabled());

    motor.step(Direction::Forward);
    assert!(!en.is_high());
    assert!(dir.is_high());
    assert!(!step.is_high());
    assert!(motor.is_enabled());
    let one_step = u64::from(config.step_pulse_us + config.step_interval_us) * 1_000;
    assert!(delay.total_ns() >= one_step);

    motor.step(Direction::Backward);
    assert!(!dir.is_high());

    motor.stop();
    assert!(en.is_high());
    assert!(!motor.is_enabled());
}

#[test]
fn stop_paces_like_a_step() {
    let delay = RecordingDelay::default();
    let config = StepperConfig::default();
    let mut motor = StepDriver::new(
        SharedPin::default(),
        SharedPin::default(),
        SharedPin::default(),
        delay.clone(),
        config,
    );

    motor.stop();
    assert_eq!(delay.total_ns(), u64::from(config.step_interval_us) * 1_000);
}

#[test]
fn led_starts_dark_for_either_polarity() {
    let pin = SharedPin::default();
    let led = Led::new(pin.clone(), Polarity::ActiveLow);
    assert!(pin.is_high());
    assert!(!led.is_lit());

    let pin = SharedPin::default();
    let mut led = Led::new(pin.clone(), Polarity::ActiveHigh);
    assert!(!pin.is_high());
    led.light(true);
    assert!(pin.is_high());
}

#[test]
fn active_low_led_inverts_the_pin() {
    let pin = SharedPin::default();
    let mut led = Led::new(pin.clone(), Polarity::ActiveLow);

    led.light(true);
    assert!(!pin.is_high());
    assert!(led.is_lit());

    led.toggle();
    assert!(pin.is_high());
    assert!(!led.is_lit());

    // Re-lighting an already lit LED keeps the pin where it is.
    led.light(true);
    led.light(true);
    assert!(!pin.is_high());
    assert!(!led.into_pin().is_high());
}
