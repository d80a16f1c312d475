//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`].
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `io`: Serial device / `std::io::Write` transport and sleeping delay (requires `std`)

pub mod mock;

#[cfg(feature = "std")]
pub mod io;

pub use mock::*;

#[cfg(feature = "std")]
pub use io::*;
