//! `std`-backed transport and delay.
//!
//! A command station on a USB serial adapter shows up as a device file
//! (`/dev/ttyACM0`, `COM5`), so any [`std::io::Write`] can act as the
//! transport. Line settings (baud rate etc.) are left to the OS.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::traits::{DelayNs, Transport};

/// Transport over any writer.
///
/// Each packet is written with `write_all` and flushed immediately so
/// frames never sit half-sent in a buffer.
#[derive(Debug)]
pub struct IoTransport<W: Write> {
    writer: Option<W>,
}

impl<W: Write> IoTransport<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    /// Returns true until [`Transport::close`] has been called.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Take back the writer, closing the transport.
    pub fn into_inner(mut self) -> Option<W> {
        self.writer.take()
    }
}

impl IoTransport<File> {
    /// Open a serial device (or any file) for writing.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> Transport for IoTransport<W> {
    type Error = io::Error;

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "transport closed"))?;
        writer.write_all(bytes)?;
        writer.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Blocking delay using [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
