// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STEP/DIR stepper driver (A4988, DRV8825 and friends).
//!
//! Wiring:
//! - STEP: one rising edge per (micro)step
//! - DIR:  high = forward, low = backward
//! - EN:   active-low driver enable

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::StepperConfig;

/// DIR setup time before the STEP edge (DRV8825: 650 ns).
const DIR_SETUP_NS: u32 = 1_000;

/// Logical step direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What the control loop needs from a stepper.
pub trait Stepper {
    /// Issue one step in `dir`, enabling the driver if needed.
    fn step(&mut self, dir: Direction);

    /// Stop stepping and release the motor. Takes as long as a step, so the caller's loop keeps
    /// the same pace either way.
    fn stop(&mut self);
}

pub struct StepDriver<STEP, DIR, EN, D> {
    step: STEP,
    dir: DIR,
    enable: EN,
    delay: D,
    pulse_us: u32,
    interval_us: u32,
    enabled: bool,
    last_dir: Option<Direction>,
}

impl<STEP, DIR, EN, D> StepDriver<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    /// Create a driver in the stopped (disabled) state.
    pub fn new(mut step: STEP, dir: DIR, mut enable: EN, delay: D, config: StepperConfig) -> Self {
        step.set_low().ok();
        enable.set_high().ok();
        Self {
            step,
            dir,
            enable,
            delay,
            pulse_us: config.step_pulse_us,
            interval_us: config.step_interval_us,
            enabled: false,
            last_dir: None,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn free(self) -> (STEP, DIR, EN, D) {
        (self.step, self.dir, self.enable, self.delay)
    }

    fn set_direction(&mut self, dir: Direction) {
        if self.last_dir == Some(dir) {
            return;
        }
        match dir {
            Direction::Forward => self.dir.set_high().ok(),
            Direction::Backward => self.dir.set_low().ok(),
        };
        self.last_dir = Some(dir);
        self.delay.delay_ns(DIR_SETUP_NS);
    }
}

impl<STEP, DIR, EN, D> Stepper for StepDriver<STEP, DIR, EN, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    D: DelayNs,
{
    fn step(&mut self, dir: Direction) {
        if !self.enabled {
            self.enable.set_low().ok();
            self.enabled = true;
        }
        self.set_direction(dir);
        self.step.set_high().ok();
        self.delay.delay_us(self.pulse_us);
        self.step.set_low().ok();
        self.delay.delay_us(self.interval_us);
    }

    fn stop(&mut self) {
        self.step.set_low().ok();
        if self.enabled {
            self.enable.set_high().ok();
            self.enabled = false;
        }
        self.delay.delay_us(self.interval_us);
    }
}
