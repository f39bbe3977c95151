// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Application payloads carried inside frames. All multi-byte fields are little-endian.

use crate::config::{CALIBRATION_SIZE, READING_CHANNELS};

/// Encoded size of a [`Reading`].
pub const READING_SIZE: usize = 80;

const SEQ_AT: usize = 0;
const RAW_AT: usize = 24;
const CAL_AT: usize = RAW_AT + 4 * READING_CHANNELS;

/// One force-sensor report.
///
/// ```text
/// seq_num u64 | reserved 16B | load_cell_raw [i32; 4] | calibration [u8; 40]
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Reading {
    pub seq_num: u64,
    /// Raw ADC counts, sign-extended to 32 bits. Unused slots stay zero.
    pub load_cell_raw: [i32; READING_CHANNELS],
    /// Opaque calibration blob echoed back so the host can verify what is stored.
    pub calibration: [u8; CALIBRATION_SIZE],
}

impl Reading {
    pub const fn new() -> Self {
        Self {
            seq_num: 0,
            load_cell_raw: [0; READING_CHANNELS],
            calibration: [0; CALIBRATION_SIZE],
        }
    }

    pub fn encode(&self) -> [u8; READING_SIZE] {
        let mut out = [0u8; READING_SIZE];
        out[SEQ_AT..SEQ_AT + 8].copy_from_slice(&self.seq_num.to_le_bytes());
        for (chunk, raw) in out[RAW_AT..CAL_AT]
            .chunks_exact_mut(4)
            .zip(self.load_cell_raw.iter())
        {
            chunk.copy_from_slice(&raw.to_le_bytes());
        }
        out[CAL_AT..].copy_from_slice(&self.calibration);
        out
    }

    /// Parse a reading. Returns `None` unless `bytes` is exactly [`READING_SIZE`] long.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != READING_SIZE {
            return None;
        }
        let mut seq = [0u8; 8];
        seq.copy_from_slice(&bytes[SEQ_AT..SEQ_AT + 8]);

        let mut load_cell_raw = [0i32; READING_CHANNELS];
        for (raw, chunk) in load_cell_raw
            .iter_mut()
            .zip(bytes[RAW_AT..CAL_AT].chunks_exact(4))
        {
            *raw = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let mut calibration = [0u8; CALIBRATION_SIZE];
        calibration.copy_from_slice(&bytes[CAL_AT..]);

        Some(Self {
            seq_num: u64::from_le_bytes(seq),
            load_cell_raw,
            calibration,
        })
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::new()
    }
}

/// Stepper drive command, also echoed back as the drive's status.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StepCommand {
    /// Step backward (pulls the arm up).
    Backward,
    Stop,
    /// Step forward (pushes the arm down).
    Forward,
}

impl StepCommand {
    pub const PAYLOAD_SIZE: usize = 4;

    pub fn as_i32(self) -> i32 {
        match self {
            StepCommand::Backward => -1,
            StepCommand::Stop => 0,
            StepCommand::Forward => 1,
        }
    }

    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            -1 => Some(StepCommand::Backward),
            0 => Some(StepCommand::Stop),
            1 => Some(StepCommand::Forward),
            _ => None,
        }
    }

    pub fn to_payload(self) -> [u8; Self::PAYLOAD_SIZE] {
        self.as_i32().to_le_bytes()
    }

    pub fn from_payload(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; Self::PAYLOAD_SIZE] = bytes.try_into().ok()?;
        Self::from_i32(i32::from_le_bytes(raw))
    }
}
