// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Firmware Control Loops
//!
//! The two firmware images share everything below this module and differ only in the loop they
//! run:
//!
//! - [`force_sensor`] – samples the load cells, streams readings, accepts calibration updates.
//! - [`stepper_drive`] – steps a motor as commanded by the host and reports the active command.
//!
//! Loops depend on hardware only through the traits here and in `drivers`/`serial`, so the same
//! code runs against the STM32 glue in `hw` and against fakes in tests.

pub mod force_sensor;
pub mod stepper_drive;

use core::fmt;

use crate::drivers::SampleError;
use crate::protocol::SendError;
use crate::serial::TransportError;

pub use force_sensor::ForceSensor;
pub use stepper_drive::StepperDrive;

/// Flat byte-blob non-volatile storage for the calibration data.
pub trait CalibrationStore {
    type Error: fmt::Debug;

    /// Fill `out` from the start of the store.
    fn load(&mut self, out: &mut [u8]) -> Result<(), Self::Error>;

    /// Replace the start of the store with `data`.
    fn store(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// Hardware watchdog. Must be kicked more often than its timeout.
pub trait Watchdog {
    fn kick(&mut self);
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AppError {
    Sample(SampleError),
    Transport(TransportError),
    /// An outgoing payload did not fit in a frame.
    Oversize(usize),
    /// The calibration store refused a read or write.
    Calibration,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Sample(e) => write!(f, "sampling failed: {}", e),
            AppError::Transport(e) => write!(f, "transport failed: {}", e),
            AppError::Oversize(n) => write!(f, "payload of {} bytes does not fit a frame", n),
            AppError::Calibration => f.write_str("calibration store failed"),
        }
    }
}

impl From<SampleError> for AppError {
    fn from(e: SampleError) -> Self {
        AppError::Sample(e)
    }
}

impl From<TransportError> for AppError {
    fn from(e: TransportError) -> Self {
        AppError::Transport(e)
    }
}

impl From<SendError<TransportError>> for AppError {
    fn from(e: SendError<TransportError>) -> Self {
        match e {
            SendError::Write(e) => AppError::Transport(e),
            SendError::PayloadTooLarge(n) => AppError::Oversize(n),
        }
    }
}
