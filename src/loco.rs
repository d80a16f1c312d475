//! Locomotive entity: address, step mode and function state.
//!
//! A [`Loco`] turns semantic operations into complete packets. It does not
//! transmit anything; hand the packets to a
//! [`CommandStation`](crate::CommandStation) or any other sink.
//!
//! # Example
//!
//! ```
//! use rs_dcc::{Direction, Loco, SpeedStepMode};
//!
//! let mut scotsman = Loco::new(3, SpeedStepMode::Steps128).unwrap();
//!
//! let p = scotsman.speed_and_direction(60, Direction::Forward).unwrap();
//! assert_eq!(p.as_bytes(), &[0x03, 0x3F, 0xBD, 0x03 ^ 0x3F ^ 0xBD]);
//!
//! let p = scotsman.set_function(0, true).unwrap();
//! assert_eq!(p.as_bytes(), &[0x03, 0x90, 0x93]);
//! ```

use heapless::Vec;

use crate::address::LocoAddress;
use crate::error::Result;
use crate::function::{FunctionGroup, FunctionStates};
use crate::packet::Packet;
use crate::speed::{self, Direction, SpeedStepMode};

/// Longest locomotive data sequence: address plus two instruction bytes.
const MAX_LOCO_DATA: usize = 3;

/// A locomotive decoder with a short address.
///
/// The step mode is fixed at construction. Function states start off and
/// change only through [`set_function`](Self::set_function); a broadcast
/// reset clears the decoder but not this model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loco {
    address: LocoAddress,
    mode: SpeedStepMode,
    functions: FunctionStates,
    speed: i16,
    direction: Direction,
    synced_epoch: Option<u32>,
}

impl Loco {
    /// Create a locomotive, stopped and facing forward, all functions off.
    pub fn new(address: u16, mode: SpeedStepMode) -> Result<Self> {
        Ok(Self {
            address: LocoAddress::new(address)?,
            mode,
            functions: FunctionStates::new(),
            speed: mode.stop(),
            direction: Direction::Forward,
            synced_epoch: None,
        })
    }

    /// Decoder address.
    pub fn address(&self) -> LocoAddress {
        self.address
    }

    /// Speed step mode.
    pub fn mode(&self) -> SpeedStepMode {
        self.mode
    }

    /// Function states.
    pub fn functions(&self) -> &FunctionStates {
        &self.functions
    }

    /// Last commanded speed value.
    pub fn speed(&self) -> i16 {
        self.speed
    }

    /// Last commanded direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Build the speed and direction packet and remember the command.
    ///
    /// Values outside the step mode's range fail with
    /// [`DccError::InvalidSpeed`](crate::DccError::InvalidSpeed) and leave
    /// the loco unchanged.
    pub fn speed_and_direction(&mut self, speed: i16, direction: Direction) -> Result<Packet> {
        let instr = speed::encode(self.mode, speed, direction)?;
        let packet = self.packet(&instr)?;
        self.speed = speed;
        self.direction = direction;
        Ok(packet)
    }

    /// Emergency stop this locomotive, keeping its direction.
    pub fn emergency_stop(&mut self) -> Result<Packet> {
        self.speed_and_direction(self.mode.emergency_stop(), self.direction)
    }

    /// Normal stop, keeping direction.
    pub fn stop(&mut self) -> Result<Packet> {
        self.speed_and_direction(self.mode.stop(), self.direction)
    }

    /// Set a function and build the packet for its group.
    ///
    /// Index > 12 fails with
    /// [`DccError::FunctionNotAvailable`](crate::DccError::FunctionNotAvailable)
    /// and no state changes.
    pub fn set_function(&mut self, index: usize, on: bool) -> Result<Packet> {
        let instr = self.functions.set(index, on)?;
        self.packet(&[instr])
    }

    /// Packet for one function group from the current states.
    pub fn function_group_packet(&self, group: FunctionGroup) -> Result<Packet> {
        self.packet(&[self.functions.group_byte(group)])
    }

    /// Packets for all three function groups, used to bring a decoder back
    /// in line with this model.
    pub fn function_packets(&self) -> Result<[Packet; 3]> {
        let [a, b, c] = self.functions.all_group_bytes();
        Ok([self.packet(&[a])?, self.packet(&[b])?, self.packet(&[c])?])
    }

    /// Reset epoch this loco's functions were last fully sent in.
    pub fn synced_epoch(&self) -> Option<u32> {
        self.synced_epoch
    }

    pub(crate) fn mark_synced(&mut self, epoch: u32) {
        self.synced_epoch = Some(epoch);
    }

    fn packet(&self, instr: &[u8]) -> Result<Packet> {
        let mut data: Vec<u8, MAX_LOCO_DATA> = Vec::new();
        let _ = data.push(self.address.to_byte());
        let _ = data.extend_from_slice(instr);
        Packet::new(&data)
    }
}
