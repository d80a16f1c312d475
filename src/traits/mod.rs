//! Trait definitions for the hardware seams.
//!
//! # Submodules
//!
//! - `transport`: the byte sink a command station writes frames to
//!
//! Inter-packet spacing uses [`embedded_hal::delay::DelayNs`], re-exported
//! here so callers can implement it without naming the HAL crate.

pub mod transport;

pub use embedded_hal::delay::DelayNs;
pub use transport::*;
