// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame builder for the outgoing direction.
//!
//! ```text
//! MAGIC (4B, LSB first) | size (1B) | reserved (3B, zero) | payload (size B) | CRC (2B, MSB first)
//! ```
//!
//! The CRC covers the payload only.

use core::fmt;

use crate::protocol::crc::Crc16;

/// Random constant marking the start of every frame.
pub const MAGIC: u32 = 0xF2EC_4CB4;

/// Magic + size + reserved.
pub const HEADER_SIZE: usize = 8;

pub const CRC_SIZE: usize = 2;

/// Largest payload a one-byte size field can describe.
pub const MAX_PAYLOAD: usize = 255;

/// Header + trailer bytes added around every payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CRC_SIZE;

/// Errors from [`send_packet`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SendError<E> {
    /// Payload does not fit the one-byte size field.
    PayloadTooLarge(usize),
    /// The injected writer failed.
    Write(E),
}

impl<E: fmt::Debug> fmt::Display for SendError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::PayloadTooLarge(n) => {
                write!(f, "payload of {} bytes exceeds {}", n, MAX_PAYLOAD)
            }
            SendError::Write(e) => write!(f, "writer failed: {:?}", e),
        }
    }
}

/// Build the 8-byte header for a payload of `size` bytes.
pub fn header(size: u8) -> [u8; HEADER_SIZE] {
    let m = MAGIC.to_le_bytes();
    [m[0], m[1], m[2], m[3], size, 0, 0, 0]
}

/// Emit one frame through `write`: header, payload, CRC.
///
/// No retries. Whatever `write` does when the link is busy (spin, drop, fail) is its business;
/// its first error is returned as [`SendError::Write`].
pub fn send_packet<E, W>(payload: &[u8], mut write: W) -> Result<(), SendError<E>>
where
    W: FnMut(&[u8]) -> Result<(), E>,
{
    let size = u8::try_from(payload.len()).map_err(|_| SendError::PayloadTooLarge(payload.len()))?;

    let mut crc = Crc16::new();
    crc.add(payload);

    write(&header(size)).map_err(SendError::Write)?;
    if !payload.is_empty() {
        write(payload).map_err(SendError::Write)?;
    }
    write(&crc.to_be_bytes()).map_err(SendError::Write)?;
    Ok(())
}

/// Encode one frame into `out`, returning the number of bytes used.
///
/// `out` must hold at least `payload.len() + FRAME_OVERHEAD` bytes.
pub fn encode_into(payload: &[u8], out: &mut [u8]) -> Result<usize, SendError<usize>> {
    let needed = payload.len() + FRAME_OVERHEAD;
    if payload.len() > MAX_PAYLOAD {
        return Err(SendError::PayloadTooLarge(payload.len()));
    }
    if out.len() < needed {
        return Err(SendError::Write(out.len()));
    }
    let mut at = 0;
    send_packet(payload, |chunk: &[u8]| {
        out[at..at + chunk.len()].copy_from_slice(chunk);
        at += chunk.len();
        Ok::<(), usize>(())
    })?;
    Ok(at)
}
