// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Drivers here are written against `embedded-hal` 1.0 traits so they run unchanged on the board
//! (via the adapters in `hw`) and against scripted pins in tests.
//!
//! ## Existing drivers
//!
//! - [`hx711`] – Avia HX711 load-cell ADCs sharing one clock line, read in lock-step
//! - [`step_drive`] – STEP/DIR/EN stepper motor driver
//! - [`led`] – Status LED with configurable active level

pub mod hx711;
pub mod led;
pub mod step_drive;

pub use hx711::{Hx711Array, LoadCells, SampleError};
pub use led::{Led, Polarity};
pub use step_drive::{Direction, StepDriver, Stepper};
