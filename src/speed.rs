//! Speed and direction instruction encoding for 14, 28 and 128 speed steps.
//!
//! # Speed values
//!
//! Speeds are signed so that the stop and emergency-stop codes sit just below
//! the first running step, with the same offsets the NMRA tables use:
//!
//! | Mode | Stop | Emergency stop | Running |
//! |------|------|----------------|---------|
//! | 14/28-step | -3 (or -2) | -1 (or 0) | 1..=28 |
//! | 128-step | -1 | 0 | 1..=126 |
//!
//! # Layouts
//!
//! ```text
//! 128-step: 0011_1111  DSSS_SSSS      S = speed + 1
//!  28-step: 01DC_SSSS                 CSSSS = rotate(speed + 3)
//! ```
//!
//! 14-step decoders are driven with the same baseline instruction and value
//! range as 28-step ones.

use heapless::Vec;

use crate::bits::{extract_bits, insert_bits, rotate_low_bit_to_top, rotate_top_bit_to_low, with_bit};
use crate::error::{DccError, Result};

/// Advanced operations instruction: 128 speed step control.
pub const ADVANCED_128_STEP: u8 = 0b0011_1111;

/// Base of the baseline speed/direction instruction (`01DCSSSS`).
const SPEED_DIRECTION_BASE: u8 = 0b0100_0000;

/// Instruction bytes produced by a speed command (one or two bytes).
pub type SpeedInstruction = Vec<u8, 2>;

/// Direction of travel as carried in the `D` bit.
///
/// DCC has no "stopped" direction: a stopped loco still has a direction,
/// which the decoder uses for directional lighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Forward travel (`D = 1`).
    #[default]
    Forward,
    /// Reverse travel (`D = 0`).
    Reverse,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }

    /// The `D` bit value.
    #[inline]
    pub const fn bit(&self) -> bool {
        matches!(self, Direction::Forward)
    }

    /// Direction from a `D` bit value.
    #[inline]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Parse direction from text input.
    ///
    /// Accepts `"forward"`/`"fwd"`/`"1"` and `"reverse"`/`"rev"`/`"0"`,
    /// trimmed and case-insensitive.
    ///
    /// ```
    /// use rs_dcc::Direction;
    ///
    /// assert_eq!(Direction::from_text(" FWD "), Some(Direction::Forward));
    /// assert_eq!(Direction::from_text("0"), Some(Direction::Reverse));
    /// assert_eq!(Direction::from_text("sideways"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("forward") || s.eq_ignore_ascii_case("fwd") || s == "1" {
            Some(Direction::Forward)
        } else if s.eq_ignore_ascii_case("reverse") || s.eq_ignore_ascii_case("rev") || s == "0" {
            Some(Direction::Reverse)
        } else {
            None
        }
    }
}

/// Speed step resolution a decoder is configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedStepMode {
    /// 14 steps, sent with the 28-step baseline instruction.
    Steps14,
    /// 28 steps, baseline packet with intermediate-step bit.
    Steps28,
    /// 128 steps, advanced operations packet.
    #[default]
    Steps128,
}

impl SpeedStepMode {
    /// Mode from a step count (14, 28 or 128).
    pub const fn from_steps(steps: u16) -> Option<Self> {
        match steps {
            14 => Some(SpeedStepMode::Steps14),
            28 => Some(SpeedStepMode::Steps28),
            128 => Some(SpeedStepMode::Steps128),
            _ => None,
        }
    }

    /// Number of steps.
    pub const fn steps(&self) -> u16 {
        match self {
            SpeedStepMode::Steps14 => 14,
            SpeedStepMode::Steps28 => 28,
            SpeedStepMode::Steps128 => 128,
        }
    }

    /// Lowest accepted speed value (normal stop).
    pub const fn min_speed(&self) -> i16 {
        match self {
            SpeedStepMode::Steps14 | SpeedStepMode::Steps28 => -3,
            SpeedStepMode::Steps128 => -1,
        }
    }

    /// Highest accepted speed value.
    pub const fn max_speed(&self) -> i16 {
        match self {
            SpeedStepMode::Steps14 | SpeedStepMode::Steps28 => 28,
            SpeedStepMode::Steps128 => 126,
        }
    }

    /// Speed value that encodes a normal stop.
    pub const fn stop(&self) -> i16 {
        self.min_speed()
    }

    /// Speed value that encodes an emergency stop.
    pub const fn emergency_stop(&self) -> i16 {
        match self {
            SpeedStepMode::Steps14 | SpeedStepMode::Steps28 => -1,
            SpeedStepMode::Steps128 => 0,
        }
    }

    /// Returns true if `speed` is within this mode's range.
    pub const fn accepts(&self, speed: i16) -> bool {
        speed >= self.min_speed() && speed <= self.max_speed()
    }
}

/// Encode speed and direction into instruction bytes.
///
/// ```
/// use rs_dcc::{Direction, SpeedStepMode};
/// use rs_dcc::speed::encode;
///
/// let bytes = encode(SpeedStepMode::Steps128, 60, Direction::Forward).unwrap();
/// assert_eq!(bytes.as_slice(), &[0x3F, 0x80 | 61]);
///
/// let bytes = encode(SpeedStepMode::Steps28, -3, Direction::Reverse).unwrap();
/// assert_eq!(bytes.as_slice(), &[0b0100_0000]);
/// ```
pub fn encode(mode: SpeedStepMode, speed: i16, direction: Direction) -> Result<SpeedInstruction> {
    if !mode.accepts(speed) {
        return Err(DccError::InvalidSpeed);
    }

    let mut out = SpeedInstruction::new();
    match mode {
        SpeedStepMode::Steps128 => {
            let mut byte = with_bit(0, 7, direction.bit());
            byte = insert_bits(byte, (speed + 1) as u8, 0, 7);
            let _ = out.push(ADVANCED_128_STEP);
            let _ = out.push(byte);
        }
        SpeedStepMode::Steps14 | SpeedStepMode::Steps28 => {
            let field = rotate_low_bit_to_top((speed + 3) as u8);
            let mut byte = with_bit(SPEED_DIRECTION_BASE, 5, direction.bit());
            byte = insert_bits(byte, field, 0, 5);
            let _ = out.push(byte);
        }
    }
    Ok(out)
}

/// Recover `(speed, direction)` from instruction bytes.
///
/// Every 28-step code maps back to exactly one value, so the alternate stop
/// (`-2`) and emergency stop (`0`) codes keep their own values.
pub fn decode(mode: SpeedStepMode, bytes: &[u8]) -> Result<(i16, Direction)> {
    match (mode, bytes) {
        (SpeedStepMode::Steps128, [ADVANCED_128_STEP, b]) => {
            let speed = extract_bits(*b, 0, 7) as i16 - 1;
            Ok((speed, Direction::from_bit(extract_bits(*b, 7, 1) == 1)))
        }
        (SpeedStepMode::Steps14 | SpeedStepMode::Steps28, [b])
            if b & 0xC0 == SPEED_DIRECTION_BASE =>
        {
            let v = rotate_top_bit_to_low(extract_bits(*b, 0, 5)) as i16;
            Ok((v - 3, Direction::from_bit(extract_bits(*b, 5, 1) == 1)))
        }
        _ => Err(DccError::MalformedInstruction),
    }
}
