//! Fixed-width bit-field helpers.
//!
//! All packet bytes in this crate are composed with shifts and masks through
//! these helpers rather than by concatenating text, so the NMRA bit layout
//! lives in one place and can be checked against literal byte tables.

use heapless::String as HString;

/// Widest field [`format_bits`] renders.
pub const MAX_FIELD_WIDTH: usize = 32;

/// A rendered binary field, e.g. `"0011"`.
pub type BitString = HString<MAX_FIELD_WIDTH>;

/// Mask with the low `width` bits set.
///
/// ```
/// use rs_dcc::bits::mask;
///
/// assert_eq!(mask(3), 0b111);
/// assert_eq!(mask(8), 0xFF);
/// ```
#[inline]
pub const fn mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Returns true if `value` fits in `width` bits.
#[inline]
pub const fn fits(value: u32, width: u32) -> bool {
    value & !mask(width) == 0
}

/// Render `value` as a zero-padded binary string of exactly `width` digits.
///
/// Bits above `width` are dropped, matching a fixed-width field on the wire.
///
/// ```
/// use rs_dcc::bits::format_bits;
///
/// assert_eq!(format_bits(3, 8).as_str(), "00000011");
/// assert_eq!(format_bits(0b1_0110, 4).as_str(), "0110");
/// ```
pub fn format_bits(value: u32, width: usize) -> BitString {
    let width = width.min(MAX_FIELD_WIDTH);
    let mut out = BitString::new();
    for i in (0..width).rev() {
        let c = if (value >> i) & 1 == 1 { '1' } else { '0' };
        // Capacity equals MAX_FIELD_WIDTH, so this never overflows
        let _ = out.push(c);
    }
    out
}

/// Insert the low `width` bits of `field` into `byte` at bit position `pos`
/// (0 = least significant). Existing bits in that window are replaced.
///
/// ```
/// use rs_dcc::bits::insert_bits;
///
/// // 01D0_0000 with D = 1 at position 5
/// assert_eq!(insert_bits(0b0100_0000, 1, 5, 1), 0b0110_0000);
/// ```
#[inline]
pub const fn insert_bits(byte: u8, field: u8, pos: u32, width: u32) -> u8 {
    let m = (mask(width) << pos) as u8;
    (byte & !m) | ((field << pos) & m)
}

/// Extract `width` bits from `byte` starting at bit position `pos`.
///
/// ```
/// use rs_dcc::bits::extract_bits;
///
/// assert_eq!(extract_bits(0b1011_0110, 4, 4), 0b1011);
/// ```
#[inline]
pub const fn extract_bits(byte: u8, pos: u32, width: u32) -> u8 {
    (byte >> pos) & (mask(width) as u8)
}

/// Set or clear a single bit.
#[inline]
pub const fn with_bit(byte: u8, pos: u32, on: bool) -> u8 {
    insert_bits(byte, on as u8, pos, 1)
}

/// Move the least significant bit of a 5-bit value to the top of the field.
///
/// This is the 28-step speed layout: the transmitted `CSSSS` has the
/// intermediate-step bit `C` first, followed by the upper four bits.
///
/// ```
/// use rs_dcc::bits::rotate_low_bit_to_top;
///
/// assert_eq!(rotate_low_bit_to_top(0b00101), 0b10010);
/// ```
#[inline]
pub const fn rotate_low_bit_to_top(value: u8) -> u8 {
    ((value & 0x01) << 4) | ((value >> 1) & 0x0F)
}

/// Inverse of [`rotate_low_bit_to_top`].
#[inline]
pub const fn rotate_top_bit_to_low(field: u8) -> u8 {
    ((field & 0x0F) << 1) | ((field >> 4) & 0x01)
}
