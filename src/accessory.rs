//! Basic accessory decoders: turnouts, signals and similar devices.
//!
//! An [`Accessory`] owns its address, a fixed ordered set of sub-states and
//! the currently selected one. Commands are a tagged [`State`], validated
//! against that set before any packet is built.
//!
//! # Example
//!
//! ```
//! use rs_dcc::{Accessory, DccError, State};
//!
//! let mut signal = Accessory::with_states(42, &["green", "red", "yellow", "two yellow"]).unwrap();
//!
//! let packet = signal.set_named("red").unwrap();
//! assert_eq!(signal.sub_state(), 1);
//! assert!(signal.is_active());
//! assert_eq!(packet.as_bytes()[0], 0b1010_1010);
//!
//! // Unknown aspects are rejected and nothing changes
//! assert_eq!(signal.set_named("blue"), Err(DccError::StateNotAvailable));
//! assert_eq!(signal.sub_state(), 1);
//!
//! // Deactivate without forgetting the aspect
//! signal.set_state(State::Binary(false)).unwrap();
//! assert!(!signal.is_active());
//! assert_eq!(signal.state_name(), Some("red"));
//! ```

use heapless::Vec;

use crate::address::{encode_accessory, AccessoryAddress, MAX_SUB_STATE};
use crate::config::{short_string, ShortString};
use crate::error::{DccError, Result};
use crate::packet::Packet;

/// Number of outputs a basic accessory packet can select.
pub const MAX_ACCESSORY_STATES: usize = MAX_SUB_STATE as usize + 1;

/// A requested accessory state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum State {
    /// `false` deactivates, `true` activates the current sub-state.
    Binary(bool),
    /// Activate the sub-state at this index of the configured set.
    Named(usize),
}

/// A basic accessory decoder and its last commanded state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accessory {
    address: AccessoryAddress,
    names: Vec<ShortString, MAX_ACCESSORY_STATES>,
    state_count: usize,
    active: bool,
    sub_state: u8,
}

impl Accessory {
    /// An accessory with eight unnamed outputs, selected by index.
    ///
    /// Starts inactive on output 0.
    pub fn new(address: u16) -> Result<Self> {
        Ok(Self {
            address: AccessoryAddress::new(address)?,
            names: Vec::new(),
            state_count: MAX_ACCESSORY_STATES,
            active: false,
            sub_state: 0,
        })
    }

    /// An accessory with an ordered set of named sub-states.
    ///
    /// At most eight names fit the 3-bit output field; more fail with
    /// [`DccError::InvalidSubState`].
    pub fn with_states(address: u16, names: &[&str]) -> Result<Self> {
        if names.len() > MAX_ACCESSORY_STATES {
            return Err(DccError::InvalidSubState);
        }
        let mut acc = Self::new(address)?;
        for name in names {
            acc.names
                .push(short_string(name))
                .map_err(|_| DccError::InvalidSubState)?;
        }
        acc.state_count = names.len();
        Ok(acc)
    }

    /// Decoder address.
    pub fn address(&self) -> AccessoryAddress {
        self.address
    }

    /// Returns true if the accessory is currently activated.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the current sub-state.
    pub fn sub_state(&self) -> u8 {
        self.sub_state
    }

    /// Number of selectable sub-states.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Name of the current sub-state, if the accessory has named states.
    pub fn state_name(&self) -> Option<&str> {
        self.names.get(self.sub_state as usize).map(|s| s.as_str())
    }

    /// Configured state names, in index order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    /// Find the state for a configured name.
    pub fn lookup(&self, name: &str) -> Result<State> {
        self.names
            .iter()
            .position(|n| n.as_str() == name)
            .map(State::Named)
            .ok_or(DccError::StateNotAvailable)
    }

    /// Resolve a state to the `(active, sub_state)` pair it would produce,
    /// without changing anything.
    pub fn resolve(&self, state: State) -> Result<(bool, u8)> {
        match state {
            State::Binary(on) => Ok((on, self.sub_state)),
            State::Named(index) if index < self.state_count => Ok((true, index as u8)),
            State::Named(_) => Err(DccError::StateNotAvailable),
        }
    }

    /// Apply a state and return the basic accessory packet for it.
    ///
    /// On error the previous state is kept.
    pub fn set_state(&mut self, state: State) -> Result<Packet> {
        let (active, sub_state) = self.resolve(state)?;
        let (b1, b2) = encode_accessory(self.address, active, sub_state);
        let packet = Packet::new(&[b1, b2])?;
        self.active = active;
        self.sub_state = sub_state;
        Ok(packet)
    }

    /// Apply a state by name.
    pub fn set_named(&mut self, name: &str) -> Result<Packet> {
        let state = self.lookup(name)?;
        self.set_state(state)
    }

    /// Packet for the current state.
    pub fn packet(&self) -> Result<Packet> {
        let (b1, b2) = encode_accessory(self.address, self.active, self.sub_state);
        Packet::new(&[b1, b2])
    }
}

/// Build a basic accessory packet from raw values.
///
/// ```
/// use rs_dcc::accessory::basic_accessory_packet;
///
/// let p = basic_accessory_packet(42, true, 3).unwrap();
/// assert_eq!(p.as_bytes(), &[0b1010_1010, 0b1111_1011, 0b0101_0001]);
/// ```
pub fn basic_accessory_packet(address: u16, active: bool, sub_state: u8) -> Result<Packet> {
    let (b1, b2) = crate::address::encode_accessory_address_bytes(address, active, sub_state)?;
    Packet::new(&[b1, b2])
}
