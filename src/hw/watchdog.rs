// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Independent watchdog (IWDG).
//!
//! Runs off the ~32 kHz LSI, so the timeout holds regardless of the core clock. Once started it
//! cannot be stopped.

use stm32f7xx_hal::{pac, prelude::*, watchdog::IndependentWatchdog};

use crate::app::Watchdog;

/// Reset after this long without a kick.
pub const TIMEOUT_MS: u32 = 8_000;

pub struct Iwdg {
    iwdg: IndependentWatchdog,
}

impl Iwdg {
    /// Start the watchdog with a [`TIMEOUT_MS`] timeout.
    pub fn start(iwdg: pac::IWDG) -> Self {
        let mut iwdg = IndependentWatchdog::new(iwdg);
        iwdg.start(TIMEOUT_MS.millis());
        Self { iwdg }
    }
}

impl Watchdog for Iwdg {
    #[inline]
    fn kick(&mut self) {
        self.iwdg.feed();
    }
}
