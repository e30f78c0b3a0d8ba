//! GPIO / serial assignments for the switch control board.
//!
//! Single source of truth — the device loop and the simulated peer both
//! reference this module rather than hard-coding pin numbers.  The *index*
//! of a pin in [`SWITCH_GPIOS`] is its bit position in every path, so the
//! order here is load-bearing: change it and every path table entry changes
//! meaning.

/// GPIO numbers of the RF switch control lines, in bit-position order.
///
/// Bit 0 of a path drives GPIO 4, bit 1 drives GPIO 3, and so on.
pub const SWITCH_GPIOS: [u8; 7] = [4, 3, 1, 0, 2, 6, 7];

/// Number of switch control lines (= path bit-string width).
pub const SWITCH_PIN_COUNT: usize = SWITCH_GPIOS.len();

/// Line rate of the serial link between host and microcontroller.
pub const SERIAL_BAUD: u32 = 115_200;
