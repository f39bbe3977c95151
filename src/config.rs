// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board constants and runtime configuration.
//!
//! Compile-time sizes live here as `const`s so that statics can be declared with them. Anything
//! that changes behavior at the boundary (spin-wait bounds, step timing) is a plain struct with a
//! `Default`, meant to be built with struct-update syntax:
//!
//! ```
//! use forcerig::config::{SamplerConfig, WaitLimit};
//!
//! let cfg = SamplerConfig {
//!     ready_wait: WaitLimit::Polls(100_000),
//!     ..Default::default()
//! };
//! assert_eq!(cfg.ready_wait, WaitLimit::Polls(100_000));
//! ```

use core::convert::Infallible;

/// Serial link rate. The fastest standard rate the boards reach with a low bit error rate.
pub const BAUD_RATE: u32 = 38_400;

/// Outbound ring buffer capacity. Telemetry is continuous, so a short queue is enough.
pub const TX_BUFFER_SIZE: usize = 200;

/// Inbound ring buffer capacity. Commands arrive in rare bursts that must not be lost.
pub const RX_BUFFER_SIZE: usize = 500;

/// Number of load cells physically wired to the force sensor.
pub const LOAD_CELL_COUNT: usize = 2;

/// Number of load-cell slots in a reading on the wire.
pub const READING_CHANNELS: usize = 4;

/// Size of the opaque calibration blob kept in non-volatile memory.
pub const CALIBRATION_SIZE: usize = 40;

/// Upper bound on a spin-wait.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WaitLimit {
    /// Spin until the condition holds, however long that takes.
    Unbounded,
    /// Give up after this many unsuccessful polls.
    Polls(u32),
}

impl Default for WaitLimit {
    fn default() -> Self {
        WaitLimit::Unbounded
    }
}

impl WaitLimit {
    /// Poll `f` until it stops returning `WouldBlock`.
    ///
    /// Returns `None` if the limit was reached first.
    pub fn spin<T>(self, mut f: impl FnMut() -> nb::Result<T, Infallible>) -> Option<T> {
        match self {
            WaitLimit::Unbounded => match nb::block!(f()) {
                Ok(v) => Some(v),
                Err(e) => match e {},
            },
            WaitLimit::Polls(limit) => {
                for _ in 0..limit {
                    match f() {
                        Ok(v) => return Some(v),
                        Err(nb::Error::WouldBlock) => core::hint::spin_loop(),
                        Err(nb::Error::Other(e)) => match e {},
                    }
                }
                None
            }
        }
    }
}

/// Serial transport settings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TransportConfig {
    /// How long `write` may spin on a full TX buffer per byte.
    pub tx_wait: WaitLimit,
}

/// HX711 acquisition settings.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SamplerConfig {
    /// How long to wait for every sensor to pull its data line low.
    pub ready_wait: WaitLimit,
}

/// Stepper drive timing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StepperConfig {
    /// STEP high time.
    pub step_pulse_us: u32,
    /// Pause after each step; sets the motor speed.
    pub step_interval_us: u32,
    /// Report the active command once every this many loop iterations.
    pub report_every: u32,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            step_pulse_us: 5,
            step_interval_us: 1_000,
            report_every: 100,
        }
    }
}
