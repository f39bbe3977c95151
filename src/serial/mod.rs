// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Buffered UART link shared between the main loop and the USART interrupt.

pub mod fifo;
pub mod transport;

pub use fifo::{Consumer, Fifo, Producer};
pub use transport::{
    LineStatus, LinkStats, SerialIo, SerialIsr, SerialPort, SerialTransport, TransportError,
    UartRegisters,
};
