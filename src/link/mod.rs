//! Transport abstraction — any line-oriented byte channel.
//!
//! Concrete implementations:
//! - [`serial::SerialTransport`] — a real serial port on the host.
//! - [`mock::MockLink`] — an in-memory channel pair for tests and the
//!   simulated peer.
//!
//! Both the controller and the device loop are generic over `Transport`,
//! so either side can be driven without hardware.

pub mod mock;
pub mod serial;

use std::io;

/// A byte channel carrying newline-delimited lines.
pub trait Transport {
    /// Write raw bytes to the channel.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read one line, consuming at most `max_bytes` bytes.
    ///
    /// Blocks until a newline arrives, `max_bytes` bytes have been read, or
    /// the configured read timeout elapses.  Returns the line with framing
    /// and surrounding whitespace stripped; an empty string means the
    /// timeout fired with nothing useful received.
    fn read_line(&mut self, max_bytes: usize) -> io::Result<String>;

    /// Flush buffered output.
    fn flush(&mut self) -> io::Result<()>;

    /// Discard any unread inbound bytes.
    ///
    /// The controller calls this before every send so a stale reply from an
    /// earlier command can never be mistaken for the current one.
    fn clear_input(&mut self) -> io::Result<()>;
}
