// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-driven serial transport.
//!
//! A [`SerialTransport`] owns one TX and one RX [`Fifo`] and is split once into two capability
//! handles:
//!
//! - [`SerialPort`] for the main loop: buffered `write`, non-blocking `read`.
//! - [`SerialIsr`] for the USART interrupt: `on_transmit_complete` and `on_receive`.
//!
//! Roles are fixed: the main loop produces TX and consumes RX, the interrupt consumes TX and
//! produces RX.
//!
//! Hardware access goes through [`UartRegisters`], which both handles share by reference.

use core::cell::Cell;
use core::convert::Infallible;
use core::fmt;

use critical_section::Mutex;

use crate::config::{TransportConfig, WaitLimit};
use crate::serial::fifo::{Consumer, Fifo, Producer};

/// The few USART register operations the transport needs.
///
/// Methods take `&self` because they are register accesses shared by the main loop and the
/// interrupt handler.
pub trait UartRegisters {
    /// Transmit data register can take a byte right now.
    fn tx_ready(&self) -> bool;

    /// Load a byte into the transmit data register.
    fn write_data(&self, byte: u8);

    /// Called from the transmit-complete interrupt when there is nothing left to send.
    fn tx_drained(&self) {}
}

/// Hardware status that came with a received byte.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LineStatus {
    pub framing_error: bool,
    pub parity_error: bool,
}

impl LineStatus {
    #[inline]
    pub fn is_clean(&self) -> bool {
        !self.framing_error && !self.parity_error
    }
}

/// Receive-side loss counters. Both wrap.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct LinkStats {
    /// Bytes overwritten because the RX buffer was full.
    pub rx_overruns: u32,
    /// Bytes dropped for a framing or parity error.
    pub rx_line_errors: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TransportError {
    /// The TX buffer stayed full for the whole configured wait.
    TxTimeout,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::TxTimeout => f.write_str("tx buffer full"),
        }
    }
}

/// Byte-level link the application loops talk through.
pub trait SerialIo {
    /// Queue bytes for transmission. May spin while the TX buffer is full.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Next received byte, or `WouldBlock` if none is pending.
    fn read(&mut self) -> nb::Result<u8, Infallible>;
}

/// TX and RX buffers plus receive error bookkeeping, meant to live in a `static`.
pub struct SerialTransport<const TX: usize, const RX: usize> {
    tx: Fifo<TX>,
    rx: Fifo<RX>,
    line_errors: Mutex<Cell<u32>>,
}

impl<const TX: usize, const RX: usize> SerialTransport<TX, RX> {
    pub const fn new() -> Self {
        Self {
            tx: Fifo::new(),
            rx: Fifo::new(),
            line_errors: Mutex::new(Cell::new(0)),
        }
    }

    /// Split into the main-loop and interrupt handles. Only the first call succeeds.
    pub fn split<'a, U: UartRegisters>(
        &'a self,
        uart: &'a U,
        config: TransportConfig,
    ) -> Option<(SerialPort<'a, U, TX, RX>, SerialIsr<'a, U, TX, RX>)> {
        let (tx_in, tx_out) = self.tx.split()?;
        let (rx_in, rx_out) = self.rx.split()?;
        Some((
            SerialPort {
                uart,
                tx: tx_in,
                rx: rx_out,
                line_errors: &self.line_errors,
                tx_wait: config.tx_wait,
            },
            SerialIsr {
                uart,
                tx: tx_out,
                rx: rx_in,
                line_errors: &self.line_errors,
            },
        ))
    }
}

impl<const TX: usize, const RX: usize> Default for SerialTransport<TX, RX> {
    fn default() -> Self {
        Self::new()
    }
}

/// Main-loop side of the transport.
pub struct SerialPort<'a, U, const TX: usize, const RX: usize> {
    uart: &'a U,
    tx: Producer<'a, TX>,
    rx: Consumer<'a, RX>,
    line_errors: &'a Mutex<Cell<u32>>,
    tx_wait: WaitLimit,
}

impl<'a, U: UartRegisters, const TX: usize, const RX: usize> SerialPort<'a, U, TX, RX> {
    /// Queue `bytes` for transmission.
    ///
    /// A byte goes straight into the data register when the transmitter is idle and nothing is
    /// buffered ahead of it; everything else is appended to the TX buffer for the interrupt to
    /// drain. Both cases are decided in the same critical section as the append, so a
    /// transmit-complete interrupt can never find the buffer empty just before a byte lands in
    /// it. On a full buffer this spins until the interrupt frees a slot, bounded by the
    /// configured [`WaitLimit`].
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let uart = self.uart;
        for &byte in bytes {
            let tx = &mut self.tx;
            self.tx_wait
                .spin(|| {
                    tx.push_or_bypass(byte, |b| {
                        let idle = uart.tx_ready();
                        if idle {
                            uart.write_data(b);
                        }
                        idle
                    })
                })
                .ok_or(TransportError::TxTimeout)?;
        }
        Ok(())
    }

    /// Next received byte.
    #[inline]
    pub fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.rx.pop().ok_or(nb::Error::WouldBlock)
    }

    /// Bytes waiting in the RX buffer.
    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Bytes waiting in the TX buffer.
    #[inline]
    pub fn queued(&self) -> usize {
        self.tx.len()
    }

    pub fn stats(&self) -> LinkStats {
        LinkStats {
            rx_overruns: self.rx.overruns(),
            rx_line_errors: critical_section::with(|cs| self.line_errors.borrow(cs).get()),
        }
    }
}

impl<'a, U: UartRegisters, const TX: usize, const RX: usize> SerialIo
    for SerialPort<'a, U, TX, RX>
{
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        SerialPort::write(self, bytes)
    }

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        SerialPort::read(self)
    }
}

/// Interrupt side of the transport.
pub struct SerialIsr<'a, U, const TX: usize, const RX: usize> {
    uart: &'a U,
    tx: Consumer<'a, TX>,
    rx: Producer<'a, RX>,
    line_errors: &'a Mutex<Cell<u32>>,
}

impl<'a, U: UartRegisters, const TX: usize, const RX: usize> SerialIsr<'a, U, TX, RX> {
    /// Transmit-complete: send the next buffered byte, or let the transmitter go idle.
    pub fn on_transmit_complete(&mut self) {
        let uart = self.uart;
        let tx = &mut self.tx;
        critical_section::with(|_| match tx.pop() {
            Some(byte) => uart.write_data(byte),
            None => uart.tx_drained(),
        });
    }

    /// Receive-complete: queue `byte` unless the hardware flagged it as corrupt.
    ///
    /// A full RX buffer loses its oldest byte.
    pub fn on_receive(&mut self, byte: u8, status: LineStatus) {
        if status.is_clean() {
            self.rx.push(byte);
        } else {
            critical_section::with(|cs| {
                let errors = self.line_errors.borrow(cs);
                errors.set(errors.get().wrapping_add(1));
            });
        }
    }
}
