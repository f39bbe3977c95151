// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART3 register glue for the interrupt-driven transport.
//!
//! The HAL brings the peripheral up (clock, pins, baud rate); after that the transport only
//! needs a handful of register operations, done here through the PAC:
//!
//! ```ignore
//! let serial = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, cfg);
//! let _ = serial.split();
//! Usart3::listen();
//! ```
//!
//! To watch the link from the host, connect to the ST-LINK virtual COM port at [`BAUD_RATE`].
//!
//! [`BAUD_RATE`]: crate::config::BAUD_RATE

use stm32f7xx_hal::pac;

use crate::serial::{LineStatus, SerialIsr, UartRegisters};

// ISR / ICR bits
const PE: u32 = 1 << 0;
const FE: u32 = 1 << 1;
const NF: u32 = 1 << 2;
const ORE: u32 = 1 << 3;
const RXNE: u32 = 1 << 5;
const TC: u32 = 1 << 6;
const TXE: u32 = 1 << 7;

// CR1 bits
const RXNEIE: u32 = 1 << 5;
const TCIE: u32 = 1 << 6;

/// Zero-sized handle to USART3. Every method is a single register access.
pub struct Usart3;

impl Usart3 {
    #[inline]
    fn regs() -> &'static pac::usart1::RegisterBlock {
        unsafe { &*pac::USART3::ptr() }
    }

    /// Enable the receive and transmit-complete interrupts.
    pub fn listen() {
        let usart = Self::regs();
        usart
            .cr1
            .modify(|r, w| unsafe { w.bits(r.bits() | RXNEIE | TCIE) });
    }

    /// Service a USART3 interrupt.
    ///
    /// Reception is handled first so a received byte is never lost behind a long TX burst.
    pub fn on_interrupt<const TX: usize, const RX: usize>(isr: &mut SerialIsr<'_, Self, TX, RX>) {
        let usart = Self::regs();
        let flags = usart.isr.read().bits();

        if flags & (RXNE | ORE | FE | PE) != 0 {
            // Reading RDR clears RXNE; the error flags need an explicit clear.
            let byte = usart.rdr.read().bits() as u8;
            let status = LineStatus {
                framing_error: flags & FE != 0,
                parity_error: flags & PE != 0,
            };
            usart
                .icr
                .write(|w| unsafe { w.bits(flags & (PE | FE | NF | ORE)) });
            if flags & RXNE != 0 {
                isr.on_receive(byte, status);
            }
        }

        if flags & TC != 0 {
            isr.on_transmit_complete();
        }
    }
}

impl UartRegisters for Usart3 {
    #[inline]
    fn tx_ready(&self) -> bool {
        Self::regs().isr.read().bits() & TXE != 0
    }

    #[inline]
    fn write_data(&self, byte: u8) {
        // Writing TDR also clears TC.
        Self::regs().tdr.write(|w| unsafe { w.bits(byte as u32) });
    }

    #[inline]
    fn tx_drained(&self) {
        Self::regs().icr.write(|w| unsafe { w.bits(TC) });
    }
}
