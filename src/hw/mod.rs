// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F767 glue: the concrete implementations of the traits the control loops run on.

pub mod delay;
pub mod flash;
pub mod gpio;
pub mod pins;
pub mod usart;
pub mod watchdog;

pub use delay::CycleDelay;
pub use flash::FlashCalibration;
pub use gpio::{InputLine, OutputLine};
pub use pins::{BoardPins, DoutLine};
pub use usart::Usart3;
pub use watchdog::Iwdg;
