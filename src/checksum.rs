//! Error-detection byte computation.
//!
//! The DCC error-detection byte is the XOR of every data byte that precedes
//! it. Decoders XOR the whole packet, checksum included, and drop it unless
//! the result is zero.

/// XOR-reduce `bytes` left to right.
///
/// ```
/// use rs_dcc::checksum::compute;
///
/// assert_eq!(compute(&[0x03, 0x3F, 0xBD]), 0x03 ^ 0x3F ^ 0xBD);
/// assert_eq!(compute(&[]), 0);
/// ```
#[inline]
pub fn compute(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Returns true if the last byte of `packet` is a valid checksum of the rest.
///
/// Packets shorter than two bytes (one data byte plus checksum) are invalid.
pub fn verify(packet: &[u8]) -> bool {
    packet.len() >= 2 && compute(packet) == 0
}
