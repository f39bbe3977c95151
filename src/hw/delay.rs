// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Busy-wait delay calibrated against the core clock.

use cortex_m::asm;
use embedded_hal::delay::DelayNs;

/// Spins the core for the requested time. Cheap to copy, so each driver gets its own.
#[derive(Copy, Clone, Debug)]
pub struct CycleDelay {
    sysclk_hz: u32,
}

impl CycleDelay {
    pub fn new(sysclk_hz: u32) -> Self {
        Self { sysclk_hz }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        // Round up so a short pulse is never shorter than asked.
        let cycles = (ns as u64 * self.sysclk_hz as u64).div_ceil(1_000_000_000);
        asm::delay(cycles.clamp(1, u32::MAX as u64) as u32);
    }
}
