//! Wire codec for the pin command protocol.
//!
//! Wire format (newline-terminated text lines):
//! ```text
//! request:  <bit>{N}      set pins, no reply
//!           <bit>{N}!     set pins, echo actual states back
//! reply:    STATES:<bit>{N}
//! ```
//! where `N` is the pin count and each `<bit>` is `0` or `1`.
//!
//! The decode side is deliberately lenient: anything that does not parse is
//! dropped without a reply and without an error, so line noise can never
//! halt the receiving loop.  The one sharp edge is preserved from the
//! deployed firmware: a decimal digit outside `{0,1}` aborts the command
//! *mid-application*, leaving pins before the bad digit at their new values
//! (a non-digit byte, by contrast, drops the line before any pin is
//! touched).

use log::warn;

use crate::ports::SwitchPin;

/// Trailing request character asking the receiver to echo pin states.
pub const VERIFY_MARKER: char = '!';

/// Prefix tag carried by every verification reply.
pub const REPLY_TAG: &str = "STATES:";

/// Upper bound on command width the decoder will buffer.
pub const MAX_PINS: usize = 16;

// ───────────────────────────────────────────────────────────────
// Receiving side
// ───────────────────────────────────────────────────────────────

/// Decode one command line and apply it to `pins`.
///
/// Returns the reply line (newline-terminated) if the command requested
/// verification and was applied; `None` otherwise — including every
/// malformed-input case, which is silently dropped by contract.
pub fn decode_and_apply<P: SwitchPin>(line: &str, pins: &mut [P]) -> Option<String> {
    let (payload, verify) = match line.strip_suffix(VERIFY_MARKER) {
        Some(rest) => (rest, true),
        None => (line, false),
    };

    // Parse up front: a non-digit byte anywhere is line noise and drops the
    // whole command before any pin is touched.
    let mut states: heapless::Vec<u8, MAX_PINS> = heapless::Vec::new();
    for c in payload.chars() {
        let Some(digit) = c.to_digit(10) else {
            warn!("dropping command with non-digit byte: {line:?}");
            return None;
        };
        if states.push(digit as u8).is_err() {
            warn!("dropping command wider than {MAX_PINS} states: {line:?}");
            return None;
        }
    }

    if states.len() != pins.len() {
        warn!(
            "dropping command: {} states for {} pins",
            states.len(),
            pins.len()
        );
        return None;
    }

    for (pin, &state) in pins.iter_mut().zip(&states) {
        if state > 1 {
            // Abort here; earlier pins keep their freshly applied values.
            warn!("invalid state value: {state}");
            return None;
        }
        pin.set(state == 1);
    }

    verify.then(|| format_reply(pins))
}

/// Build a reply line from the *actual* pin states, re-read in index order.
pub fn format_reply<P: SwitchPin>(pins: &mut [P]) -> String {
    let mut bits = String::with_capacity(pins.len());
    for pin in pins.iter_mut() {
        bits.push(if pin.get() { '1' } else { '0' });
    }
    format!("{REPLY_TAG}{bits}\n")
}

// ───────────────────────────────────────────────────────────────
// Sending side
// ───────────────────────────────────────────────────────────────

/// Build an outgoing request line for `bits`, newline-terminated.
pub fn encode_request(bits: &str, verify: bool) -> String {
    if verify {
        format!("{bits}{VERIFY_MARKER}\n")
    } else {
        format!("{bits}\n")
    }
}

/// Extract the reported bits from a reply line.
///
/// Returns `None` unless the line starts with the [`REPLY_TAG`].  The bits
/// are trimmed of surrounding whitespace, matching the deployed firmware's
/// tolerance for a stray carriage return.
pub fn parse_reply(line: &str) -> Option<&str> {
    line.strip_prefix(REPLY_TAG).map(str::trim)
}
