// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! CRC-16/CCITT-FALSE.
//!
//! - Polynomial: 0x1021, MSB-first
//! - Initial value: 0xFFFF
//! - No reflection, no output XOR
//! - Check (`"123456789"`): 0x29B1
//! - Residue: 0x0000
//!
//! The register is folded one byte at a time so that the receive path can run the same
//! accumulator over payload and trailing CRC bytes as they arrive. A message followed by its own
//! CRC (big-endian) always folds to [`CRC_RESIDUE`].

/// Register value before any byte has been folded in.
pub const CRC_INITIAL: u16 = 0xFFFF;

/// Register value after folding a message followed by its big-endian CRC.
pub const CRC_RESIDUE: u16 = 0x0000;

const POLY: u16 = 0x1021;

/// Returns the initial register value.
#[inline]
pub const fn crc_init() -> u16 {
    CRC_INITIAL
}

/// Fold one byte into the running CRC.
pub const fn crc_update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ ((byte as u16) << 8);
    let mut bit = 0;
    while bit < 8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ POLY
        } else {
            crc << 1
        };
        bit += 1;
    }
    crc
}

/// Fold a sequence of bytes into the running CRC. An empty slice returns `crc` unchanged.
pub fn crc_update_buffer(crc: u16, bytes: &[u8]) -> u16 {
    bytes.iter().fold(crc, |acc, &b| crc_update(acc, b))
}

/// Convenience accumulator around [`crc_update`].
///
/// ```
/// use forcerig::protocol::crc::Crc16;
///
/// let mut crc = Crc16::new();
/// crc.add(b"123456");
/// crc.add(b"789");
/// assert_eq!(crc.value(), 0x29B1);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Crc16 {
    value: u16,
}

impl Crc16 {
    pub const fn new() -> Self {
        Self { value: CRC_INITIAL }
    }

    #[inline]
    pub fn add_byte(&mut self, byte: u8) {
        self.value = crc_update(self.value, byte);
    }

    pub fn add(&mut self, bytes: &[u8]) {
        self.value = crc_update_buffer(self.value, bytes);
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.value
    }

    /// CRC as it goes on the wire (most significant byte first).
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 2] {
        self.value.to_be_bytes()
    }

    /// True if everything folded so far was a message followed by its valid CRC.
    #[inline]
    pub fn check_residue(&self) -> bool {
        self.value == CRC_RESIDUE
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}
