//! Helper for computing cyclic redundancy checks.
//!
//! The FIT checksum is CRC-16/ARC, evaluated a nibble at a time against a
//! 16-entry table. The trailing two bytes of a document hold this value over
//! every preceding byte, little-endian.

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800, 0xB401,
    0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Accumulate a slice of bytes into a cyclic redundancy check value.
pub fn compute_crc(init: u16, r: &[u8]) -> u16 {
    r.iter().fold(init, |acc, b| accumulate(acc, *b))
}

/// Accumulate a single byte into a cyclic redundancy check value.
///
/// The low nibble is folded in first, then the high nibble.
pub fn accumulate(crc: u16, b: u8) -> u16 {
    let crc = nibble(crc, b & 0xF);
    nibble(crc, (b >> 4) & 0xF)
}

fn nibble(crc: u16, n: u8) -> u16 {
    let tmp = CRC_TABLE[(crc & 0xF) as usize];
    let crc = (crc >> 4) & 0x0FFF;
    crc ^ tmp ^ CRC_TABLE[n as usize]
}
