//! Transport abstraction for the command-station serial line.
//!
//! The encoding layer never talks to hardware. It produces bytes and hands
//! them to a [`Transport`], which owns the connection for its lifetime.
//!
//! # Implementations
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`MockTransport`](crate::hal::MockTransport) | Records writes for tests |
//! | `IoTransport` | Any `std::io::Write` (serial device file), `std` only |
//!
//! # Example Implementation
//!
//! ```rust,ignore
//! use rs_dcc::traits::Transport;
//!
//! struct Uart { /* peripheral handle */ }
//!
//! impl Transport for Uart {
//!     type Error = ();
//!
//!     fn write(&mut self, bytes: &[u8]) -> Result<(), ()> {
//!         // Push bytes to the UART FIFO...
//!         Ok(())
//!     }
//! }
//! ```

/// A byte sink connected to a DCC command station.
///
/// Writes are blocking and whole: a frame is either written completely or
/// an error is returned. Implementations must not interleave frames, so a
/// transport shared between threads needs a single writer or a mutex.
pub trait Transport {
    /// Error type for transport operations.
    type Error;

    /// Write one rendered packet.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Flush and release the underlying connection.
    ///
    /// Default implementation does nothing.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}
