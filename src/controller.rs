//! Host-side switch network controller.
//!
//! Owns the path table and the serial link.  Each [`switch`] call walks the
//! same state machine: resolve the path, encode the request, flush stale
//! input, send, wait for the hardware to settle, and — when verification is
//! requested — read back the reported pin states and reconcile them against
//! what was asked for.
//!
//! One outstanding command at a time; callers that share a controller
//! across threads must serialize access themselves.
//!
//! [`switch`]: SwitchNetwork::switch

use std::thread;
use std::time::Duration;

use log::{error, info};

use crate::codec;
use crate::config::ControllerConfig;
use crate::error::{Error, Result};
use crate::link::Transport;
use crate::link::serial::SerialTransport;
use crate::paths::PathTable;
use crate::ports::MetadataSink;

/// Metadata key the observation mode is recorded under.
const OBS_MODE_KEY: &str = "obs_mode";

// ───────────────────────────────────────────────────────────────
// Outcome
// ───────────────────────────────────────────────────────────────

/// Result of a verified switch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    /// Bit string the microcontroller reported after applying the command.
    pub set_bits: String,
    /// Path name those bits correspond to: the requested name on a match,
    /// otherwise the reverse lookup of `set_bits` (or the `UNKNOWN`
    /// sentinel).
    pub set_pathname: String,
    /// Whether the reported bits equal the requested bits.
    pub matched: bool,
}

// ───────────────────────────────────────────────────────────────
// SwitchNetwork
// ───────────────────────────────────────────────────────────────

/// Controller for a bank of RF switches on the far end of a serial link.
pub struct SwitchNetwork<T: Transport> {
    table: PathTable,
    link: T,
    settle: Duration,
    metadata: Option<Box<dyn MetadataSink>>,
}

impl<T: Transport> core::fmt::Debug for SwitchNetwork<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SwitchNetwork").finish_non_exhaustive()
    }
}

impl SwitchNetwork<SerialTransport> {
    /// Open the serial port named in `config` and build a controller
    /// around it.  Fails fast with [`Error::Connection`] if the port
    /// cannot be opened, and [`Error::Table`] if the configured path table
    /// is inconsistent.
    pub fn open(config: &ControllerConfig) -> Result<Self> {
        let table = PathTable::new(config.paths.clone())?;
        let link = SerialTransport::open(&config.serial_port, config.baud, config.timeout())?;
        Ok(Self::with_link(table, link, config.settle()))
    }
}

impl<T: Transport> SwitchNetwork<T> {
    /// Build a controller over an already-open transport.  Used directly by
    /// tests and simulations; [`open`](SwitchNetwork::open) is the hardware
    /// entry point.
    pub fn with_link(table: PathTable, link: T, settle: Duration) -> Self {
        Self {
            table,
            link,
            settle,
            metadata: None,
        }
    }

    /// Attach a telemetry sink; every subsequent switch records its
    /// observation mode there.
    pub fn set_metadata_sink(&mut self, sink: Box<dyn MetadataSink>) {
        self.metadata = Some(sink);
    }

    pub fn table(&self) -> &PathTable {
        &self.table
    }

    /// Route the network along `pathname`.
    ///
    /// With `verify` the microcontroller echoes its actual pin states back
    /// and the reconciled [`SwitchOutcome`] is returned; without it the
    /// command is fire-and-forget and `None` is returned.
    ///
    /// Either way, the resulting observation mode is recorded to the
    /// metadata sink if one is attached: the requested name normally, the
    /// reverse-looked-up (or `UNKNOWN`) name on a verification mismatch.
    pub fn switch(&mut self, pathname: &str, verify: bool) -> Result<Option<SwitchOutcome>> {
        let bits = self
            .table
            .bits(pathname)
            .ok_or_else(|| Error::UnknownPath(pathname.to_owned()))?
            .to_owned();
        let request = codec::encode_request(&bits, verify);

        // Drop anything stale in the inbound buffer so an old reply cannot
        // masquerade as this command's verification.
        self.link.clear_input()?;
        self.link.write_all(request.as_bytes())?;
        self.link.flush()?;

        // Give the physical switches time to actuate before reading back.
        thread::sleep(self.settle);
        info!("{pathname} is set");

        let outcome = if verify {
            let set_bits = self.read_reported_state()?;
            let matched = set_bits == bits;
            let set_pathname = if matched {
                info!("switch verified: {set_bits}");
                pathname.to_owned()
            } else {
                error!("switch verification failed: {set_bits}");
                self.table.name_for(&set_bits).to_owned()
            };
            Some(SwitchOutcome {
                set_bits,
                set_pathname,
                matched,
            })
        } else {
            None
        };

        let obs_mode = outcome
            .as_ref()
            .map_or(pathname, |o| o.set_pathname.as_str());
        if let Some(sink) = self.metadata.as_mut() {
            sink.record(OBS_MODE_KEY, obs_mode);
        }

        Ok(outcome)
    }

    /// Switch to the low-power state: the table's all-pins-low entry.
    pub fn powerdown(&mut self, verify: bool) -> Result<Option<SwitchOutcome>> {
        info!("switching to low power mode");
        let pathname = self
            .table
            .low_power_name()
            .ok_or_else(|| Error::UnknownPath("<low power>".to_owned()))?
            .to_owned();
        self.switch(&pathname, verify)
    }

    /// Read and validate one verification reply, returning the reported
    /// bit string.
    fn read_reported_state(&mut self) -> Result<String> {
        let max = codec::REPLY_TAG.len() + self.table.width() + 2;
        let reply = self.link.read_line(max)?;
        if reply.is_empty() {
            error!("no reply from the switch");
            return Err(Error::SwitchTimeout);
        }
        match codec::parse_reply(&reply) {
            Some(bits) => Ok(bits.to_owned()),
            None => {
                error!("unexpected reply from switch: {reply}");
                Err(Error::MalformedReply(reply))
            }
        }
    }
}
