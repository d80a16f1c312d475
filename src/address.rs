//! Locomotive and accessory address encoding.
//!
//! # Locomotive (short) addresses
//!
//! A short address occupies one data byte `0AAAAAAA`. Address 0 is the
//! broadcast address and 0xFF is the idle address, so neither may be given
//! to a real decoder. Extended (14-bit) addressing is not supported.
//!
//! # Accessory addresses
//!
//! Basic accessory packets spread a 9-bit decoder address over two bytes:
//!
//! ```text
//! 10AAAAAA 1AAACDDD
//!   ^^^^^^  ^^^
//!   A5..A0  !A8..!A6 (one's complement)
//! ```
//!
//! `C` is the activate bit and `DDD` selects the output (sub-state).

use crate::bits::{extract_bits, fits, insert_bits, with_bit};
use crate::error::{DccError, Result};

/// Highest short locomotive address.
pub const MAX_LOCO_ADDRESS: u8 = 127;

/// Highest basic accessory decoder address.
pub const MAX_ACCESSORY_ADDRESS: u16 = 511;

/// Highest accessory sub-state (3-bit `DDD` field).
pub const MAX_SUB_STATE: u8 = 7;

/// A validated short locomotive address (1..=127).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocoAddress(u8);

impl LocoAddress {
    /// Validate and wrap a short address.
    ///
    /// ```
    /// use rs_dcc::{DccError, LocoAddress};
    ///
    /// assert!(LocoAddress::new(3).is_ok());
    /// assert_eq!(LocoAddress::new(0), Err(DccError::InvalidAddress));
    /// assert_eq!(LocoAddress::new(128), Err(DccError::InvalidAddress));
    /// ```
    pub fn new(addr: u16) -> Result<Self> {
        if addr == 0 || addr > MAX_LOCO_ADDRESS as u16 {
            return Err(DccError::InvalidAddress);
        }
        Ok(Self(addr as u8))
    }

    /// The numeric address.
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// The address data byte (`0AAAAAAA`).
    pub const fn to_byte(&self) -> u8 {
        self.0 & 0x7F
    }
}

/// A validated basic accessory decoder address (1..=511).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessoryAddress(u16);

impl AccessoryAddress {
    /// Validate and wrap an accessory address.
    pub fn new(addr: u16) -> Result<Self> {
        if addr == 0 || addr > MAX_ACCESSORY_ADDRESS {
            return Err(DccError::InvalidAddress);
        }
        Ok(Self(addr))
    }

    /// The numeric address.
    pub const fn value(&self) -> u16 {
        self.0
    }
}

/// Encode a short locomotive address into its data byte.
///
/// ```
/// use rs_dcc::address::encode_loco_address;
///
/// assert_eq!(encode_loco_address(3), Ok(0b0000_0011));
/// assert!(encode_loco_address(200).is_err());
/// ```
pub fn encode_loco_address(addr: u16) -> Result<u8> {
    LocoAddress::new(addr).map(|a| a.to_byte())
}

/// Recover a short address from its data byte.
pub fn decode_loco_address(byte: u8) -> Result<LocoAddress> {
    if byte & 0x80 != 0 {
        return Err(DccError::InvalidAddress);
    }
    LocoAddress::new(byte as u16)
}

/// Encode the two basic accessory bytes.
///
/// ```
/// use rs_dcc::address::encode_accessory_address_bytes;
///
/// // Address 42, active, output 1
/// let (b1, b2) = encode_accessory_address_bytes(42, true, 1).unwrap();
/// assert_eq!(b1, 0b1010_1010);
/// assert_eq!(b2, 0b1111_1001);
/// ```
pub fn encode_accessory_address_bytes(addr: u16, active: bool, sub_state: u8) -> Result<(u8, u8)> {
    let addr = AccessoryAddress::new(addr)?;
    if sub_state > MAX_SUB_STATE {
        return Err(DccError::InvalidSubState);
    }
    Ok(encode_accessory(addr, active, sub_state))
}

/// Byte composition for an already-validated address. `sub_state` must fit
/// in three bits.
pub(crate) fn encode_accessory(addr: AccessoryAddress, active: bool, sub_state: u8) -> (u8, u8) {
    let a = addr.value();
    let low = (a & 0x3F) as u8;
    let high = ((a >> 6) & 0x07) as u8;

    let byte1 = insert_bits(0b1000_0000, low, 0, 6);

    let mut byte2 = 0b1000_0000;
    byte2 = insert_bits(byte2, !high, 4, 3);
    byte2 = with_bit(byte2, 3, active);
    byte2 = insert_bits(byte2, sub_state, 0, 3);

    (byte1, byte2)
}

/// Fields recovered from a basic accessory byte pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessoryFields {
    /// Decoder address.
    pub address: AccessoryAddress,
    /// Activate bit.
    pub active: bool,
    /// Output / sub-state (0..=7).
    pub sub_state: u8,
}

/// Decode a basic accessory byte pair.
pub fn decode_accessory_address_bytes(byte1: u8, byte2: u8) -> Result<AccessoryFields> {
    if byte1 & 0xC0 != 0x80 || byte2 & 0x80 != 0x80 {
        return Err(DccError::MalformedInstruction);
    }
    let low = extract_bits(byte1, 0, 6) as u16;
    let high = extract_bits(!byte2, 4, 3) as u16;
    let addr = (high << 6) | low;
    debug_assert!(fits(addr as u32, 9));

    Ok(AccessoryFields {
        address: AccessoryAddress::new(addr)?,
        active: extract_bits(byte2, 3, 1) == 1,
        sub_state: extract_bits(byte2, 0, 3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Locomotive addresses
    // =========================================================================

    #[test]
    fn loco_address_full_range() {
        for addr in 1..=127u16 {
            let byte = encode_loco_address(addr).unwrap();
            assert_eq!(byte & 0x80, 0, "top bit must be clear for {}", addr);
            assert_eq!(byte & 0x7F, addr as u8);
        }
    }

    #[test]
    fn loco_address_rejects_reserved() {
        assert_eq!(encode_loco_address(0), Err(DccError::InvalidAddress));
        assert_eq!(encode_loco_address(128), Err(DccError::InvalidAddress));
        assert_eq!(encode_loco_address(255), Err(DccError::InvalidAddress));
        assert_eq!(encode_loco_address(1000), Err(DccError::InvalidAddress));
    }

    #[test]
    fn loco_address_decode() {
        assert_eq!(decode_loco_address(3).unwrap().value(), 3);
        assert_eq!(decode_loco_address(0), Err(DccError::InvalidAddress));
        assert_eq!(decode_loco_address(0xFF), Err(DccError::InvalidAddress));
    }

    // =========================================================================
    // Accessory addresses
    // =========================================================================

    #[test]
    fn accessory_low_address() {
        // Address 1: high bits 000 -> complemented 111
        let (b1, b2) = encode_accessory_address_bytes(1, false, 0).unwrap();
        assert_eq!(b1, 0b1000_0001);
        assert_eq!(b2, 0b1111_0000);
    }

    #[test]
    fn accessory_high_bits_complemented() {
        // 0b1_0100_0000 = 320: low 6 bits 0, high bits 101 -> 010
        let (b1, b2) = encode_accessory_address_bytes(320, true, 5).unwrap();
        assert_eq!(b1, 0b1000_0000);
        assert_eq!(b2, 0b1010_1101);
    }

    #[test]
    fn accessory_max_address() {
        let (b1, b2) = encode_accessory_address_bytes(511, false, 7).unwrap();
        assert_eq!(b1, 0b1011_1111);
        assert_eq!(b2, 0b1000_0111);
    }

    #[test]
    fn accessory_rejects_out_of_range() {
        assert_eq!(
            encode_accessory_address_bytes(0, true, 0),
            Err(DccError::InvalidAddress)
        );
        assert_eq!(
            encode_accessory_address_bytes(512, true, 0),
            Err(DccError::InvalidAddress)
        );
        assert_eq!(
            encode_accessory_address_bytes(42, true, 8),
            Err(DccError::InvalidSubState)
        );
    }

    #[test]
    fn accessory_decode_recovers_fields() {
        for addr in [1u16, 42, 63, 64, 200, 320, 511] {
            for sub in 0..=7u8 {
                let (b1, b2) = encode_accessory_address_bytes(addr, sub % 2 == 0, sub).unwrap();
                let fields = decode_accessory_address_bytes(b1, b2).unwrap();
                assert_eq!(fields.address.value(), addr);
                assert_eq!(fields.active, sub % 2 == 0);
                assert_eq!(fields.sub_state, sub);
            }
        }
    }

    #[test]
    fn accessory_decode_rejects_loco_bytes() {
        assert_eq!(
            decode_accessory_address_bytes(0x03, 0x60),
            Err(DccError::MalformedInstruction)
        );
    }
}
