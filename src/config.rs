//! Controller configuration.
//!
//! Everything the host needs to talk to a switch bank: where the serial
//! link lives, how long to wait for it, and which path table to load.
//! Defaults match the deployed instrument.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paths::DEFAULT_PATHS;
use crate::pins::SERIAL_BAUD;

/// Host-side controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Serial device the switch microcontroller is attached to.
    pub serial_port: String,
    /// Line rate of the serial link.
    pub baud: u32,
    /// Verification read timeout, in seconds.
    pub timeout_secs: u64,
    /// Settle delay after each command, in milliseconds.  This is how long
    /// the mechanical/RF switches need, not a protocol requirement.
    pub settle_ms: u64,
    /// Path table: name → bit string, one bit per control pin.
    pub paths: BTreeMap<String, String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyACM0".into(),
            baud: SERIAL_BAUD,
            timeout_secs: 10,
            settle_ms: 50,
            paths: DEFAULT_PATHS
                .iter()
                .map(|&(name, bits)| (name.to_owned(), bits.to_owned()))
                .collect(),
        }
    }
}

impl ControllerConfig {
    /// Verification read timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Settle delay as a [`Duration`].
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = ControllerConfig::default();
        assert!(c.baud > 0);
        assert!(c.timeout_secs > 0);
        assert_eq!(c.paths.len(), DEFAULT_PATHS.len());
        // Settle must be well under the verify timeout or every verified
        // switch would eat most of its budget just waiting.
        assert!(c.settle() < c.timeout());
    }

    #[test]
    fn serde_roundtrip() {
        let c = ControllerConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.serial_port, c2.serial_port);
        assert_eq!(c.baud, c2.baud);
        assert_eq!(c.timeout_secs, c2.timeout_secs);
        assert_eq!(c.paths, c2.paths);
    }

    #[test]
    fn default_paths_build_a_valid_table() {
        let c = ControllerConfig::default();
        let table = crate::paths::PathTable::new(c.paths).unwrap();
        assert_eq!(table.low_power_name(), Some("RFANT"));
    }
}
