//! Simulated switch peer.
//!
//! Stands in for the microcontroller during development and tests: a bank
//! of [`SimPin`]s serviced by the real codec over a mock link, so the whole
//! controller ↔ device round trip runs in-process.  The induced-failure
//! mode inverts every command bit before it is applied, which is how the
//! verification-mismatch paths get exercised end to end.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::codec;
use crate::device::PinBank;
use crate::link::Transport;
use crate::link::mock::MockLink;
use crate::ports::SwitchPin;

// ───────────────────────────────────────────────────────────────
// SimPin
// ───────────────────────────────────────────────────────────────

/// In-memory stand-in for a GPIO pin.
#[derive(Debug)]
pub struct SimPin {
    gpio: u8,
    state: bool,
}

impl SimPin {
    pub fn new(gpio: u8) -> Self {
        Self { gpio, state: false }
    }

    pub fn gpio(&self) -> u8 {
        self.gpio
    }
}

impl SwitchPin for SimPin {
    fn set(&mut self, high: bool) {
        self.state = high;
    }

    fn get(&mut self) -> bool {
        self.state
    }
}

// ───────────────────────────────────────────────────────────────
// SimulatedPeer
// ───────────────────────────────────────────────────────────────

type SharedBank = Arc<Mutex<PinBank<SimPin>>>;

fn lock_bank(bank: &SharedBank) -> MutexGuard<'_, PinBank<SimPin>> {
    match bank.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// A microcontroller double on the far end of a [`MockLink`].
pub struct SimulatedPeer {
    link: MockLink,
    bank: SharedBank,
    fail: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl SimulatedPeer {
    /// Build a peer with one simulated pin per GPIO in `gpios`.
    pub fn new(link: MockLink, gpios: &[u8]) -> Self {
        let pins = gpios.iter().copied().map(SimPin::new).collect();
        Self {
            link,
            bank: Arc::new(Mutex::new(PinBank::new(pins))),
            fail: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enable or disable the induced switching failure.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// Current pin states, index order.
    pub fn pin_states(&self) -> Vec<bool> {
        lock_bank(&self.bank).states()
    }

    /// Drive every pin high; lets tests watch a powerdown take effect.
    pub fn raise_all_pins(&self) {
        let mut bank = lock_bank(&self.bank);
        for pin in bank.pins_mut() {
            pin.set(true);
        }
    }

    /// Service at most one pending command, exactly like the real device
    /// loop, except that failure mode may corrupt the command first.
    pub fn service_one(&mut self) -> io::Result<()> {
        let mut bank = lock_bank(&self.bank);
        let line = self.link.read_line(bank.len() + 2)?;
        if line.is_empty() {
            return Ok(());
        }
        let line = if self.fail.load(Ordering::Relaxed) {
            invert_bits(&line)
        } else {
            line
        };
        if let Some(reply) = codec::decode_and_apply(&line, bank.pins_mut()) {
            self.link.write_all(reply.as_bytes())?;
            self.link.flush()?;
        }
        Ok(())
    }

    /// Move the peer onto a background thread that services commands until
    /// the returned handle is dropped.
    pub fn spawn(mut self) -> PeerHandle {
        // Short read timeout so the stop flag is polled promptly.
        self.link.set_timeout(Duration::from_millis(5));
        let bank = Arc::clone(&self.bank);
        let fail = Arc::clone(&self.fail);
        let stop = Arc::clone(&self.stop);
        let thread = thread::spawn(move || {
            while !self.stop.load(Ordering::Relaxed) {
                if self.service_one().is_err() {
                    break;
                }
            }
        });
        PeerHandle {
            bank,
            fail,
            stop,
            thread: Some(thread),
        }
    }
}

/// Flip `0` ↔ `1`, leaving the marker and anything else untouched.
fn invert_bits(line: &str) -> String {
    line.chars()
        .map(|c| match c {
            '0' => '1',
            '1' => '0',
            other => other,
        })
        .collect()
}

// ───────────────────────────────────────────────────────────────
// PeerHandle
// ───────────────────────────────────────────────────────────────

/// Handle to a spawned [`SimulatedPeer`]; stops and joins it on drop.
pub struct PeerHandle {
    bank: SharedBank,
    fail: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PeerHandle {
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    pub fn pin_states(&self) -> Vec<bool> {
        lock_bank(&self.bank).states()
    }

    pub fn raise_all_pins(&self) {
        let mut bank = lock_bank(&self.bank);
        for pin in bank.pins_mut() {
            pin.set(true);
        }
    }
}

impl Drop for PeerHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::mock::link_pair;

    #[test]
    fn inversion_spares_the_marker() {
        assert_eq!(invert_bits("1000000!"), "0111111!");
        assert_eq!(invert_bits("0101"), "1010");
    }

    #[test]
    fn peer_services_a_command_in_place() {
        let (mut host, peer_link) = link_pair(Duration::from_millis(20));
        let mut peer = SimulatedPeer::new(peer_link, &[0, 1]);
        host.write_all(b"10!\n").unwrap();
        peer.service_one().unwrap();
        assert_eq!(peer.pin_states(), [true, false]);
        assert_eq!(host.read_line(16).unwrap(), "STATES:10");
    }

    #[test]
    fn failure_mode_applies_inverted_bits() {
        let (mut host, peer_link) = link_pair(Duration::from_millis(20));
        let mut peer = SimulatedPeer::new(peer_link, &[0, 1]);
        peer.set_fail(true);
        host.write_all(b"10!\n").unwrap();
        peer.service_one().unwrap();
        assert_eq!(peer.pin_states(), [false, true]);
        assert_eq!(host.read_line(16).unwrap(), "STATES:01");
    }
}
