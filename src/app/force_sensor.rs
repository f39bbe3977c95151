// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Force sensor control loop.
//!
//! Each iteration:
//! 1. LED off while waiting for the load cells, on once a sample is in.
//! 2. Send the [`Reading`] (sequence number, raw counts, current calibration blob).
//! 3. Kick the watchdog and bump the sequence number.
//! 4. Drain every pending RX byte. Any valid frame is a calibration update: its payload is
//!    written to the store and the blob is re-read, so the next reading echoes what is actually
//!    stored.

use embedded_hal::digital::OutputPin;

use crate::app::{AppError, CalibrationStore, Watchdog};
use crate::config::LOAD_CELL_COUNT;
use crate::drivers::{Led, LoadCells};
use crate::protocol::{send_packet, Parser, Reading};
use crate::serial::SerialIo;

pub struct ForceSensor<S, P, C, W, L>
where
    L: OutputPin,
{
    cells: S,
    port: P,
    store: C,
    watchdog: W,
    led: Led<L>,
    parser: Parser,
    reading: Reading,
}

impl<S, P, C, W, L> ForceSensor<S, P, C, W, L>
where
    S: LoadCells<LOAD_CELL_COUNT>,
    P: SerialIo,
    C: CalibrationStore,
    W: Watchdog,
    L: OutputPin,
{
    /// Build the loop and load the stored calibration blob.
    pub fn new(cells: S, port: P, store: C, watchdog: W, led: Led<L>) -> Self {
        let mut app = Self {
            cells,
            port,
            store,
            watchdog,
            led,
            parser: Parser::new(),
            reading: Reading::new(),
        };
        if app.reload_calibration().is_err() {
            log::warn!("starting with an empty calibration blob");
        }
        app
    }

    /// The reading that will be sent next.
    #[inline]
    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    /// Run one iteration of the loop.
    ///
    /// A failed acquisition skips the send but still kicks the watchdog and services RX. The
    /// first error of the iteration is returned.
    pub fn run_once(&mut self) -> Result<(), AppError> {
        let sent = self.sample_and_send();
        self.watchdog.kick();
        let received = self.drain_rx();
        sent.and(received)
    }

    pub fn run(mut self) -> ! {
        loop {
            if let Err(e) = self.run_once() {
                log::warn!("force sensor: {}", e);
            }
        }
    }

    fn sample_and_send(&mut self) -> Result<(), AppError> {
        self.led.light(false);
        let raw = self.cells.acquire()?;
        self.led.light(true);

        for (slot, value) in self.reading.load_cell_raw.iter_mut().zip(raw) {
            *slot = value;
        }
        let payload = self.reading.encode();
        let port = &mut self.port;
        send_packet(&payload, |chunk: &[u8]| port.write(chunk))?;
        self.reading.seq_num = self.reading.seq_num.wrapping_add(1);
        Ok(())
    }

    fn drain_rx(&mut self) -> Result<(), AppError> {
        let mut result = Ok(());
        while let Ok(byte) = self.port.read() {
            if let Some(payload) = self.parser.push(byte) {
                log::debug!("calibration update, {} bytes", payload.len());
                if let Err(e) = self.store.store(payload) {
                    log::warn!("calibration write failed: {:?}", e);
                    result = Err(AppError::Calibration);
                }
                if self.reload_calibration().is_err() {
                    result = Err(AppError::Calibration);
                }
            }
        }
        result
    }

    fn reload_calibration(&mut self) -> Result<(), AppError> {
        self.store
            .load(&mut self.reading.calibration)
            .map_err(|e| {
                log::warn!("calibration read failed: {:?}", e);
                AppError::Calibration
            })
    }
}
