//! Serial port transport for the host side.

use std::io::{self, Read, Write};
use std::time::Duration;

use log::error;
use serialport::{ClearBuffer, SerialPort};

use super::Transport;
use crate::error::Error;

/// A host-side serial connection to the switch microcontroller.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `port_name` at `baud`, with `timeout` bounding every blocking
    /// read.  Fails fast — an unopenable port is surfaced immediately as
    /// [`Error::Connection`], never silently degraded.
    pub fn open(port_name: &str, baud: u32, timeout: Duration) -> Result<Self, Error> {
        match serialport::new(port_name, baud).timeout(timeout).open() {
            Ok(port) => Ok(Self { port }),
            Err(e) => {
                let msg = format!("could not open serial port {port_name}: {e}");
                error!("{msg}");
                Err(Error::Connection(msg))
            }
        }
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)
    }

    fn read_line(&mut self, max_bytes: usize) -> io::Result<String> {
        let mut buf = Vec::with_capacity(max_bytes);
        let mut byte = [0u8; 1];
        while buf.len() < max_bytes {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    buf.push(byte[0]);
                }
                // Timeout mid-line: hand back whatever arrived, which may
                // be nothing — the caller decides whether that is fatal.
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e),
            }
        }
        Ok(String::from_utf8_lossy(&buf).trim().to_owned())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }

    fn clear_input(&mut self) -> io::Result<()> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(io::Error::from)
    }
}
