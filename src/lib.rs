//! # rs-dcc
//!
//! An NMRA DCC packet encoder for model railway command stations: turns
//! locomotive and accessory intents into checksummed packets and writes
//! them to a serial-attached booster.
//!
//! ## Features
//!
//! - **Loco control**: short addresses 1..=127, 14/28/128 speed steps, F0..F12
//! - **Accessory control**: basic accessory decoders 1..=511 with named sub-states
//! - **Broadcasts**: reset, idle and stop-all
//! - **Framing**: preamble, start bits and end bit as a bit buffer or ASCII bit string
//! - **Hardware abstraction**: a [`Transport`](traits::Transport) byte sink and
//!   [`DelayNs`](traits::DelayNs) spacing, with mocks for desktop testing
//!
//! ## Architecture
//!
//! - `bits`, `checksum`, `address`, `speed`, `function` - pure field codecs
//! - `packet`, `broadcast` - packet assembly, framing and wire rendering
//! - `loco`, `accessory` - decoder models that remember their last state
//! - `station` - the single writer that owns the transport
//! - `hal` - concrete transports (mock for testing, `std::io` for serial devices)
//!
//! ## Example
//!
//! ```rust
//! use rs_dcc::{
//!     hal::{MockDelay, MockTransport},
//!     CommandStation, Direction, Loco, SpeedStepMode, StationConfig,
//! };
//!
//! let mut station = CommandStation::new(
//!     MockTransport::new(),
//!     MockDelay::new(),
//!     StationConfig::default(),
//! );
//!
//! let mut loco = Loco::new(3, SpeedStepMode::Steps128).unwrap();
//! station.set_speed(&mut loco, 0x1F, Direction::Forward).unwrap();
//!
//! // `<` + address, 128-step instruction, speed byte, checksum + `>`
//! assert_eq!(
//!     station.transport().last_write().unwrap(),
//!     [b'<', 0x03, 0x3F, 0xA0, 0x9C, b'>'].as_slice()
//! );
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Basic accessory decoders with named sub-states.
pub mod accessory;
/// Loco and accessory address field encoding.
pub mod address;
/// Fixed-width bit field helpers.
pub mod bits;
/// Reset, idle and stop-all broadcast packets.
pub mod broadcast;
/// XOR error-detection byte.
pub mod checksum;
/// Station and transport configuration.
pub mod config;
/// Encoding and transmission errors.
pub mod error;
/// Function groups F0..F12.
pub mod function;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Multi-function (locomotive) decoders.
pub mod loco;
/// Packet assembly, framing and wire rendering.
pub mod packet;
/// Speed and direction instructions.
pub mod speed;
/// Command station that owns the transport.
pub mod station;
/// Core traits for the transport and delay seams.
pub mod traits;

// Re-exports for convenience
pub use accessory::{Accessory, State};
pub use address::{AccessoryAddress, LocoAddress};
pub use broadcast::Broadcast;
pub use error::{DccError, Result, StationError};
pub use function::{FunctionGroup, FunctionStates};
pub use loco::Loco;
pub use packet::{Frame, Packet, WireFormat};
pub use speed::{Direction, SpeedStepMode};
pub use station::{CommandStation, StationResult};
pub use traits::{DelayNs, Transport};

// Config re-exports
pub use config::{Config, StationConfig, TransportConfig};
