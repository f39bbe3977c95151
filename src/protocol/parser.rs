// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Incremental frame parser.
//!
//! Bytes are fed one at a time, straight out of the RX buffer, and the parser never blocks or
//! allocates. Any inconsistency (wrong magic byte, oversize length, bad CRC) quietly drops the
//! parser back to magic scanning.
//!
//! A magic mismatch always restarts from the first magic byte, even when the offending byte is
//! itself `MAGIC[0]`. Noise right before a frame can therefore delay resync by up to three bytes.

use crate::protocol::crc::{crc_update, CRC_INITIAL, CRC_RESIDUE};
use crate::protocol::frame::{MAGIC, MAX_PAYLOAD};

/// Where the parser is inside a frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Expecting magic byte `n` (0..=3, least significant first).
    Magic(u8),
    /// Expecting the payload size.
    Size,
    /// Expecting reserved byte `n` (0..=2).
    Reserved(u8),
    /// Collecting payload bytes.
    Payload,
    /// Expecting the CRC high byte.
    CrcHigh,
    /// Expecting the CRC low byte.
    CrcLow,
}

impl Stage {
    pub const START: Stage = Stage::Magic(0);
}

/// Frame parser with a fixed payload buffer of `N` bytes.
///
/// Frames announcing more than `N` payload bytes are dropped at the size byte.
pub struct Parser<const N: usize = MAX_PAYLOAD> {
    stage: Stage,
    payload: [u8; N],
    payload_size: usize,
    payload_offset: usize,
    crc: u16,
}

impl<const N: usize> Parser<N> {
    pub const fn new() -> Self {
        Self {
            stage: Stage::START,
            payload: [0; N],
            payload_size: 0,
            payload_offset: 0,
            crc: CRC_INITIAL,
        }
    }

    /// Process a single incoming byte. Returns the payload if this byte completed a valid frame.
    pub fn push(&mut self, byte: u8) -> Option<&[u8]> {
        let (next, complete) = self.advance(byte);
        self.stage = next;
        if complete {
            Some(self.payload())
        } else {
            None
        }
    }

    /// Current stage.
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Payload of the last completed frame.
    ///
    /// Holds until the size byte of the next frame arrives. From then on the length follows the
    /// new header and the bytes are overwritten as the new payload streams in; an oversize
    /// header leaves it empty. Copy it out before pushing further bytes if it must survive.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_size.min(N)]
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.stage = Stage::START;
    }

    /// Compute the next stage for `byte`, updating the payload buffer and CRC on the way.
    fn advance(&mut self, byte: u8) -> (Stage, bool) {
        match self.stage {
            Stage::Magic(i) => {
                if byte == (MAGIC >> (8 * u32::from(i))) as u8 {
                    if i == 3 {
                        (Stage::Size, false)
                    } else {
                        (Stage::Magic(i + 1), false)
                    }
                } else {
                    if i > 0 {
                        log::trace!("magic mismatch at byte {}, rescanning", i);
                    }
                    (Stage::START, false)
                }
            }
            Stage::Size => {
                self.payload_size = usize::from(byte);
                self.payload_offset = 0;
                self.crc = CRC_INITIAL;
                if self.payload_size > N {
                    log::debug!("dropping frame: payload {} > {}", self.payload_size, N);
                    self.payload_size = 0;
                    (Stage::START, false)
                } else {
                    (Stage::Reserved(0), false)
                }
            }
            Stage::Reserved(i) if i < 2 => (Stage::Reserved(i + 1), false),
            Stage::Reserved(_) => {
                if self.payload_size == 0 {
                    (Stage::CrcHigh, false)
                } else {
                    (Stage::Payload, false)
                }
            }
            Stage::Payload => {
                self.payload[self.payload_offset] = byte;
                self.crc = crc_update(self.crc, byte);
                self.payload_offset += 1;
                if self.payload_offset == self.payload_size {
                    (Stage::CrcHigh, false)
                } else {
                    (Stage::Payload, false)
                }
            }
            Stage::CrcHigh => {
                self.crc = crc_update(self.crc, byte);
                (Stage::CrcLow, false)
            }
            Stage::CrcLow => {
                self.crc = crc_update(self.crc, byte);
                let valid = self.crc == CRC_RESIDUE;
                if !valid {
                    log::debug!("dropping frame: crc residue {:#06x}", self.crc);
                }
                (Stage::START, valid)
            }
        }
    }
}

impl<const N: usize> Default for Parser<N> {
    fn default() -> Self {
        Self::new()
    }
}
