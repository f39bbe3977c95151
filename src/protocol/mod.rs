// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Framed binary protocol shared by the force sensor and the stepper drive.

pub mod crc;
pub mod frame;
pub mod messages;
pub mod parser;

pub use frame::{send_packet, SendError, MAGIC, MAX_PAYLOAD};
pub use messages::{Reading, StepCommand};
pub use parser::{Parser, Stage};
