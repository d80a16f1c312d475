//! Function group state and instruction encoding (F0..F12).
//!
//! Functions are sent in three independent groups. DCC decoders keep the
//! state of a group until they receive a new instruction for it, so a change
//! only needs to resend the group it belongs to.
//!
//! ```text
//! Group 1        100 F0 F4 F3 F2 F1
//! Group 2 upper  1011   F8 F7 F6 F5
//! Group 2 lower  1010  F12 F11 F10 F9
//! ```

use crate::bits::{insert_bits, with_bit};
use crate::error::{DccError, Result};

/// Number of function slots (F0..=F12).
pub const FUNCTION_COUNT: usize = 13;

const GROUP1_BASE: u8 = 0b1000_0000;
const GROUP2_UPPER_BASE: u8 = 0b1011_0000;
const GROUP2_LOWER_BASE: u8 = 0b1010_0000;

/// One of the three function group instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FunctionGroup {
    /// F0 (headlight) and F1..F4.
    One,
    /// F5..F8.
    TwoUpper,
    /// F9..F12.
    TwoLower,
}

impl FunctionGroup {
    /// All groups, in transmission order.
    pub const ALL: [FunctionGroup; 3] = [
        FunctionGroup::One,
        FunctionGroup::TwoUpper,
        FunctionGroup::TwoLower,
    ];

    /// Group containing function `index`.
    pub const fn of(index: usize) -> Result<Self> {
        match index {
            0..=4 => Ok(FunctionGroup::One),
            5..=8 => Ok(FunctionGroup::TwoUpper),
            9..=12 => Ok(FunctionGroup::TwoLower),
            _ => Err(DccError::FunctionNotAvailable),
        }
    }
}

/// The 13 function flags of a locomotive.
///
/// Created with every function off. Mutated in place by [`set`](Self::set);
/// nothing here tracks what the decoder itself currently believes.
///
/// # Example
///
/// ```
/// use rs_dcc::FunctionStates;
///
/// let mut f = FunctionStates::new();
/// let byte = f.set(0, true).unwrap(); // headlight on
/// assert_eq!(byte, 0b1001_0000);
/// assert!(f.get(0).unwrap());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionStates {
    states: [bool; FUNCTION_COUNT],
}

impl FunctionStates {
    /// All functions off.
    pub const fn new() -> Self {
        Self {
            states: [false; FUNCTION_COUNT],
        }
    }

    /// Current state of function `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.states
            .get(index)
            .copied()
            .ok_or(DccError::FunctionNotAvailable)
    }

    /// All 13 states, F0 first.
    pub fn as_array(&self) -> &[bool; FUNCTION_COUNT] {
        &self.states
    }

    /// Returns true if any function is on.
    pub fn any_on(&self) -> bool {
        self.states.iter().any(|s| *s)
    }

    /// Set function `index` and return the instruction byte for its group.
    ///
    /// An out-of-range index fails with [`DccError::FunctionNotAvailable`]
    /// and leaves every stored state untouched.
    pub fn set(&mut self, index: usize, on: bool) -> Result<u8> {
        let group = FunctionGroup::of(index)?;
        self.states[index] = on;
        Ok(self.group_byte(group))
    }

    /// Instruction byte for `group` from the current states.
    pub fn group_byte(&self, group: FunctionGroup) -> u8 {
        let s = &self.states;
        match group {
            FunctionGroup::One => {
                let byte = with_bit(GROUP1_BASE, 4, s[0]);
                insert_bits(byte, nibble(s[1], s[2], s[3], s[4]), 0, 4)
            }
            FunctionGroup::TwoUpper => {
                insert_bits(GROUP2_UPPER_BASE, nibble(s[5], s[6], s[7], s[8]), 0, 4)
            }
            FunctionGroup::TwoLower => {
                insert_bits(GROUP2_LOWER_BASE, nibble(s[9], s[10], s[11], s[12]), 0, 4)
            }
        }
    }

    /// Instruction bytes for every group, in [`FunctionGroup::ALL`] order.
    pub fn all_group_bytes(&self) -> [u8; 3] {
        FunctionGroup::ALL.map(|g| self.group_byte(g))
    }
}

/// Pack four flags, lowest function in bit 0.
#[inline]
fn nibble(a: bool, b: bool, c: bool, d: bool) -> u8 {
    (a as u8) | ((b as u8) << 1) | ((c as u8) << 2) | ((d as u8) << 3)
}
