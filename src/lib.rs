//! RF switch network control over a serial link.
//!
//! Two cooperating halves of one wire protocol:
//!
//! ```text
//!   host                                    microcontroller
//!   ┌──────────────────┐   <bits>[!]\n      ┌──────────────────┐
//!   │  SwitchNetwork   │ ─────────────────▶ │  command loop    │
//!   │  (controller)    │                    │  (codec + pins)  │
//!   │                  │ ◀───────────────── │                  │
//!   └──────────────────┘   STATES:<bits>\n  └──────────────────┘
//! ```
//!
//! The controller translates named paths into fixed-width bit strings and
//! optionally verifies that the far side applied them; the device loop
//! parses bit strings, drives GPIO pins, and echoes actual states back on
//! request.  Both halves are generic over the [`link::Transport`] seam, so
//! the whole round trip runs in-process against the simulated peer.

#![deny(unused_must_use)]

pub mod codec;
pub mod config;
pub mod controller;
pub mod device;
pub mod link;
pub mod paths;
pub mod pins;
pub mod ports;
pub mod sim;

mod error;

pub use controller::{SwitchNetwork, SwitchOutcome};
pub use error::{Error, Result, TableError};
