//! Mock implementations for testing without hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockTransport`] | [`Transport`] | Records every write, can be told to fail |
//! | [`MockDelay`] | [`DelayNs`] | Records requested delays instead of sleeping |
//!
//! # Example
//!
//! ```rust
//! use rs_dcc::hal::{MockDelay, MockTransport};
//! use rs_dcc::{broadcast, CommandStation, StationConfig};
//!
//! let mut station = CommandStation::new(
//!     MockTransport::new(),
//!     MockDelay::new(),
//!     StationConfig::default(),
//! );
//! station.stop_all().unwrap();
//!
//! let transport = station.transport();
//! assert_eq!(transport.writes.len(), 1);
//! assert_eq!(&transport.writes[0][1..4], broadcast::STOP_ALL.as_bytes());
//! ```
//!
//! [`Transport`]: crate::traits::Transport
//! [`DelayNs`]: crate::traits::DelayNs

use alloc::vec::Vec;

use crate::traits::{DelayNs, Transport};

/// Error produced by [`MockTransport`] when failure is simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockTransportError {
    /// A write was attempted while `fail_writes` was set.
    WriteFailed,
    /// A write was attempted after `close`.
    Closed,
}

/// Mock transport for testing.
///
/// Every successful write is stored in [`writes`](Self::writes), one entry
/// per call, so tests can check exact frames and frame boundaries.
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Bytes of each write, in order.
    pub writes: Vec<Vec<u8>>,
    /// When true, every write fails with [`MockTransportError::WriteFailed`].
    pub fail_writes: bool,
    /// Set once `close` has been called.
    pub closed: bool,
}

impl MockTransport {
    /// Creates a new mock transport with no recorded writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock transport whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Number of writes recorded.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// The most recent write, if any.
    pub fn last_write(&self) -> Option<&[u8]> {
        self.writes.last().map(|w| w.as_slice())
    }

    /// Forget recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl Transport for MockTransport {
    type Error = MockTransportError;

    fn write(&mut self, bytes: &[u8]) -> Result<(), MockTransportError> {
        if self.closed {
            return Err(MockTransportError::Closed);
        }
        if self.fail_writes {
            return Err(MockTransportError::WriteFailed);
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<(), MockTransportError> {
        self.closed = true;
        Ok(())
    }
}

/// Mock delay for testing.
///
/// Records the requested delays in nanoseconds without blocking.
///
/// # Example
///
/// ```rust
/// use rs_dcc::hal::MockDelay;
/// use rs_dcc::traits::DelayNs;
///
/// let mut delay = MockDelay::new();
/// delay.delay_ms(100);
/// assert_eq!(delay.total_ms(), 100);
/// ```
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Each requested delay in nanoseconds.
    pub delays_ns: Vec<u64>,
}

impl MockDelay {
    /// Creates a new mock delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delays requested.
    pub fn count(&self) -> usize {
        self.delays_ns.len()
    }

    /// Sum of all requested delays in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.delays_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.delays_ns.push(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ns.push(ms as u64 * 1_000_000);
    }
}
