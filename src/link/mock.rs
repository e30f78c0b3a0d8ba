//! In-memory bidirectional line channel.
//!
//! [`link_pair`] returns two connected ends: bytes written to one end are
//! read from the other, with an independent queue per direction and a
//! configurable read timeout.  This is enough to drive the controller and
//! the device loop against each other without hardware, from one thread or
//! two.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use super::Transport;

type Shared = Arc<Mutex<VecDeque<u8>>>;

/// Poll interval while waiting for inbound bytes.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

fn lock(shared: &Shared) -> MutexGuard<'_, VecDeque<u8>> {
    // A poisoned queue just means a test thread panicked mid-write; the
    // byte stream itself is still usable.
    match shared.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// One end of an in-memory channel pair.
pub struct MockLink {
    rx: Shared,
    tx: Shared,
    timeout: Duration,
}

/// Create a connected pair of links sharing the given read timeout.
pub fn link_pair(timeout: Duration) -> (MockLink, MockLink) {
    let a = Arc::new(Mutex::new(VecDeque::new()));
    let b = Arc::new(Mutex::new(VecDeque::new()));
    (
        MockLink {
            rx: Arc::clone(&a),
            tx: Arc::clone(&b),
            timeout,
        },
        MockLink {
            rx: b,
            tx: a,
            timeout,
        },
    )
}

impl MockLink {
    /// Change this end's read timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}

impl Transport for MockLink {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        lock(&self.tx).extend(data);
        Ok(())
    }

    fn read_line(&mut self, max_bytes: usize) -> io::Result<String> {
        let deadline = Instant::now() + self.timeout;
        let mut buf: Vec<u8> = Vec::with_capacity(max_bytes);
        loop {
            {
                let mut queue = lock(&self.rx);
                while buf.len() < max_bytes {
                    match queue.pop_front() {
                        Some(b'\n') => {
                            return Ok(String::from_utf8_lossy(&buf).trim().to_owned());
                        }
                        Some(byte) => buf.push(byte),
                        None => break,
                    }
                }
                if buf.len() >= max_bytes {
                    return Ok(String::from_utf8_lossy(&buf).trim().to_owned());
                }
            }
            if Instant::now() >= deadline {
                return Ok(String::from_utf8_lossy(&buf).trim().to_owned());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn clear_input(&mut self) -> io::Result<()> {
        lock(&self.rx).clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_cross_the_pair() {
        let (mut a, mut b) = link_pair(Duration::from_millis(50));
        a.write_all(b"1000000!\n").unwrap();
        assert_eq!(b.read_line(16).unwrap(), "1000000!");
        b.write_all(b"STATES:1000000\n").unwrap();
        assert_eq!(a.read_line(16).unwrap(), "STATES:1000000");
    }

    #[test]
    fn timeout_yields_empty_line() {
        let (mut a, _b) = link_pair(Duration::from_millis(10));
        let start = Instant::now();
        assert_eq!(a.read_line(16).unwrap(), "");
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn read_is_bounded_by_max_bytes() {
        let (mut a, mut b) = link_pair(Duration::from_millis(50));
        a.write_all(b"110010011").unwrap();
        assert_eq!(b.read_line(4).unwrap(), "1100");
    }

    #[test]
    fn clear_input_discards_stale_bytes() {
        let (mut a, mut b) = link_pair(Duration::from_millis(10));
        a.write_all(b"STATES:0000000\n").unwrap();
        b.clear_input().unwrap();
        assert_eq!(b.read_line(16).unwrap(), "");
    }
}
