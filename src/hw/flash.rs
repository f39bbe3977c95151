// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Calibration blob kept in the last flash sector.
//!
//! Sector 11 (256 KiB at `0x081C_0000`) is kept for it; the firmware images fit well inside the
//! 1.75 MiB below it. Every store erases the whole sector and reprograms the blob.

use core::fmt;

use stm32f7xx_hal::{
    flash::{self, Flash},
    pac,
};

use crate::app::CalibrationStore;

const SECTOR: u8 = 11;
const FLASH_BASE: usize = 0x0800_0000;
const SECTOR_BASE: usize = 0x081C_0000;
const SECTOR_SIZE: usize = 256 * 1024;

#[derive(Debug)]
pub enum FlashError {
    /// The blob does not fit in the sector.
    TooLarge(usize),
    /// Erase or program failed.
    Controller(flash::Error),
}

impl From<flash::Error> for FlashError {
    fn from(e: flash::Error) -> Self {
        FlashError::Controller(e)
    }
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::TooLarge(n) => write!(f, "{} bytes exceed the calibration sector", n),
            FlashError::Controller(e) => write!(f, "flash error: {:?}", e),
        }
    }
}

pub struct FlashCalibration {
    flash: Flash,
}

impl FlashCalibration {
    pub fn new(flash: pac::FLASH) -> Self {
        Self {
            flash: Flash::new(flash),
        }
    }

    fn rewrite(&mut self, data: &[u8]) -> Result<(), FlashError> {
        self.flash.blocking_erase_sector(SECTOR)?;
        self.flash.blocking_program(SECTOR_BASE - FLASH_BASE, data)?;
        Ok(())
    }
}

impl CalibrationStore for FlashCalibration {
    type Error = FlashError;

    fn load(&mut self, out: &mut [u8]) -> Result<(), FlashError> {
        if out.len() > SECTOR_SIZE {
            return Err(FlashError::TooLarge(out.len()));
        }
        // The sector is memory mapped and only changes through `store`.
        let stored = unsafe { core::slice::from_raw_parts(SECTOR_BASE as *const u8, out.len()) };
        out.copy_from_slice(stored);
        Ok(())
    }

    fn store(&mut self, data: &[u8]) -> Result<(), FlashError> {
        if data.len() > SECTOR_SIZE {
            return Err(FlashError::TooLarge(data.len()));
        }
        log::info!("writing {} calibration bytes", data.len());
        self.flash.unlock();
        let result = self.rewrite(data);
        self.flash.lock();
        result
    }
}
