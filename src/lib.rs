// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # ForceRig Firmware
//!
//! Firmware for the two boards of the force measurement rig, written in Rust, targeting the
//! STM32F767ZI:
//!
//! - the **force sensor** samples HX711 load cells and streams readings to the host,
//! - the **stepper drive** moves a stepper motor as commanded by the host.
//!
//! Both talk to the host over one UART using the same framed, CRC-protected packet format.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`protocol`] | Packet framing, CRC-16, streaming parser, message layouts |
//! | [`serial`] | Interrupt-driven UART transport over ring buffers |
//! | [`drivers`] | Device-level drivers (HX711, STEP/DIR stepper driver, LED) |
//! | [`app`] | The two control loops |
//! | [`config`] | Board constants and runtime settings |
//! | `hw` | STM32F767 glue, only with the `stm32f7` feature |
//!
//! Everything except `hw` is target-independent and tested on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash a board:
//!
//! ```bash
//! cargo run --release --features stm32f7 --bin force_sensor
//! cargo run --release --features stm32f7 --bin stepper_drive
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod config;
pub mod drivers;
#[cfg(feature = "stm32f7")]
pub mod hw;
pub mod protocol;
pub mod serial;
