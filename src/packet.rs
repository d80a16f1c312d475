//! Packets, framing and serial wire rendering.
//!
//! Building a frame is split into two steps that never mix:
//!
//! 1. [`Packet::new`] takes the data bytes and appends the checksum from
//!    [`checksum::compute`](crate::checksum::compute).
//! 2. [`frame`] lays those bytes out as the DCC bit stream:
//!
//! ```text
//! 1111111111111111 0 AAAAAAAA 0 IIIIIIII ... 0 EEEEEEEE 1
//! preamble         ^ address    instruction    checksum ^ stop
//! ```
//!
//! Framing performs no computation of its own.

use bitvec::prelude::*;
use heapless::Vec;

use crate::checksum;
use crate::error::{DccError, Result};

/// Longest packet in bytes, checksum included.
pub const MAX_PACKET_BYTES: usize = 6;

/// Minimum operations-mode preamble length.
pub const MIN_PREAMBLE_BITS: usize = 14;

/// Longest preamble a [`Frame`] can hold.
pub const MAX_PREAMBLE_BITS: usize = 32;

/// Bit capacity of a [`Frame`]: preamble, 9 bits per byte, stop bit.
pub const MAX_FRAME_BITS: usize = MAX_PREAMBLE_BITS + MAX_PACKET_BYTES * 9 + 1;

/// Bit buffer backing a [`Frame`].
pub type FrameBuffer = BitArr!(for MAX_FRAME_BITS, in u8, Msb0);

/// Capacity of a rendered serial message (markers + one byte per bit).
pub const MAX_WIRE_BYTES: usize = MAX_FRAME_BITS + 2;

/// Bytes written to the transport for one packet.
pub type WireBytes = Vec<u8, MAX_WIRE_BYTES>;

/// Start marker of a serial message.
pub const PACKET_START: u8 = b'<';

/// End marker of a serial message.
pub const PACKET_END: u8 = b'>';

/// A complete DCC packet: data bytes followed by their checksum.
///
/// Packets are transient: built, framed, written once, dropped.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    buf: [u8; MAX_PACKET_BYTES],
    len: usize,
}

impl Packet {
    /// Build a packet from data bytes, appending the checksum.
    ///
    /// ```
    /// use rs_dcc::Packet;
    ///
    /// let p = Packet::new(&[0x03, 0x60]).unwrap();
    /// assert_eq!(p.as_bytes(), &[0x03, 0x60, 0x63]);
    /// assert_eq!(p.checksum(), 0x63);
    /// ```
    pub fn new(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(DccError::MalformedInstruction);
        }
        if data.len() >= MAX_PACKET_BYTES {
            return Err(DccError::PacketTooLong);
        }
        let mut buf = [0u8; MAX_PACKET_BYTES];
        buf[..data.len()].copy_from_slice(data);
        buf[data.len()] = checksum::compute(data);
        Ok(Self {
            buf,
            len: data.len() + 1,
        })
    }

    /// A packet spelled out byte for byte, checksum included.
    ///
    /// Used for the standard's fixed broadcast packets; the caller is
    /// responsible for the checksum being correct.
    pub const fn literal<const N: usize>(bytes: [u8; N]) -> Self {
        assert!(N >= 2 && N <= MAX_PACKET_BYTES);
        let mut buf = [0u8; MAX_PACKET_BYTES];
        let mut i = 0;
        while i < N {
            buf[i] = bytes[i];
            i += 1;
        }
        Self { buf, len: N }
    }

    /// All bytes, checksum last.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Data bytes without the checksum.
    pub fn data(&self) -> &[u8] {
        &self.buf[..self.len - 1]
    }

    /// The checksum byte.
    pub fn checksum(&self) -> u8 {
        self.buf[self.len - 1]
    }

    /// Number of bytes, checksum included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the checksum matches the data bytes.
    pub fn is_valid(&self) -> bool {
        checksum::verify(self.as_bytes())
    }

    /// Frame with the given preamble length.
    pub fn frame(&self, preamble_bits: usize) -> Frame {
        frame(self.as_bytes(), preamble_bits)
    }

    /// Render for the serial line in the chosen format.
    pub fn to_wire(&self, format: WireFormat, preamble_bits: usize) -> WireBytes {
        let mut out = WireBytes::new();
        let _ = out.push(PACKET_START);
        match format {
            WireFormat::Bytes => {
                let _ = out.extend_from_slice(self.as_bytes());
            }
            WireFormat::AsciiBits => {
                let framed = self.frame(preamble_bits);
                for bit in framed.bits() {
                    let _ = out.push(if *bit { b'1' } else { b'0' });
                }
            }
        }
        let _ = out.push(PACKET_END);
        out
    }
}

impl core::fmt::Debug for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Packet[")?;
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        write!(f, "]")
    }
}

/// How a packet is written to the command-station serial line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WireFormat {
    /// `<`, raw packet bytes, `>`; the station generates preamble and bits.
    #[default]
    Bytes,
    /// `<`, the framed bit stream as ASCII `'0'`/`'1'`, `>`.
    AsciiBits,
}

/// A framed packet: preamble, separators, bytes and stop bit.
#[derive(Clone)]
pub struct Frame {
    bits: FrameBuffer,
    len: usize,
}

impl Frame {
    /// Number of bits in the frame.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The framed bits, first transmitted bit first.
    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits[..self.len]
    }

    /// Render as a string of `'0'` and `'1'`.
    pub fn to_bit_string(&self) -> heapless::String<MAX_FRAME_BITS> {
        let mut s = heapless::String::new();
        for bit in self.bits() {
            let _ = s.push(if *bit { '1' } else { '0' });
        }
        s
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Frame({})", self.to_bit_string())
    }
}

/// Frame bytes (checksum already appended) into the DCC bit stream.
///
/// `preamble_bits` is clamped to
/// [`MIN_PREAMBLE_BITS`]`..=`[`MAX_PREAMBLE_BITS`]; at most
/// [`MAX_PACKET_BYTES`] bytes are framed.
///
/// ```
/// use rs_dcc::packet::frame;
///
/// let f = frame(&[0xFF, 0x00, 0xFF], 14);
/// assert_eq!(
///     f.to_bit_string().as_str(),
///     "111111111111110111111110000000000111111111" // idle
/// );
/// ```
pub fn frame(bytes: &[u8], preamble_bits: usize) -> Frame {
    let preamble = preamble_bits.clamp(MIN_PREAMBLE_BITS, MAX_PREAMBLE_BITS);
    let bytes = &bytes[..bytes.len().min(MAX_PACKET_BYTES)];

    let mut bits = FrameBuffer::ZERO;
    bits[..preamble].fill(true);

    let mut pos = preamble;
    for byte in bytes {
        bits.set(pos, false); // byte start bit
        pos += 1;
        bits[pos..pos + 8].copy_from_bitslice(byte.view_bits::<Msb0>());
        pos += 8;
    }

    bits.set(pos, true); // packet end bit
    pos += 1;

    Frame { bits, len: pos }
}
