//! Receiving-side command loop.
//!
//! Runs on the microcontroller next to the switch bank: read one line,
//! apply it, maybe reply, repeat.  Single-threaded and strictly one command
//! at a time — there is no queueing and no pipelining on this link.
//!
//! Malformed input never escapes the loop; only a transport failure does.

use std::io;

use crate::codec;
use crate::link::Transport;
use crate::ports::SwitchPin;

// ───────────────────────────────────────────────────────────────
// Pin bank
// ───────────────────────────────────────────────────────────────

/// Ordered, owned bank of switch control pins.
///
/// Index position determines bit-position correspondence with every path.
/// Constructed once at startup; the codec is the only mutator.
pub struct PinBank<P: SwitchPin> {
    pins: Vec<P>,
}

impl<P: SwitchPin> PinBank<P> {
    pub fn new(pins: Vec<P>) -> Self {
        Self { pins }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// The pins as a slice, for the codec to apply commands to.
    pub fn pins_mut(&mut self) -> &mut [P] {
        &mut self.pins
    }

    /// Re-read every pin, in index order.
    pub fn states(&mut self) -> Vec<bool> {
        self.pins.iter_mut().map(SwitchPin::get).collect()
    }
}

// ───────────────────────────────────────────────────────────────
// Command loop
// ───────────────────────────────────────────────────────────────

/// Service at most one pending command.
///
/// Reads one line (bounded to the longest legal command: one byte per pin,
/// the verification marker, and the newline), applies it, and writes the
/// reply if one is due.  A timed-out or malformed read is a no-op.
pub fn poll_once<T, P>(link: &mut T, bank: &mut PinBank<P>) -> io::Result<()>
where
    T: Transport,
    P: SwitchPin,
{
    let line = link.read_line(bank.len() + 2)?;
    if line.is_empty() {
        return Ok(());
    }
    if let Some(reply) = codec::decode_and_apply(&line, bank.pins_mut()) {
        link.write_all(reply.as_bytes())?;
        link.flush()?;
    }
    Ok(())
}

/// Run the command loop until the transport fails.
///
/// This is the device's whole job; it only returns on a transport error.
pub fn run_command_loop<T, P>(link: &mut T, bank: &mut PinBank<P>) -> io::Result<()>
where
    T: Transport,
    P: SwitchPin,
{
    loop {
        poll_once(link, bank)?;
    }
}
