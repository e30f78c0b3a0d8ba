//! Path table — bidirectional mapping between path names and pin states.
//!
//! A *path* is a physical signal route through the switch bank, named for
//! where it starts (`RF`, the port on the LNA, or `VNA`) and where it ends
//! (`ANT` antenna, `O`/`S`/`L` calibration standards, `N` noise source).
//! Its bit string holds one binary digit per control pin, in
//! [`SWITCH_GPIOS`](crate::pins::SWITCH_GPIOS) index order.
//!
//! The low-power entry is *computed* from the table (the all-zeros pattern)
//! rather than maintained by hand, so it cannot drift from the real entries.

use std::collections::HashMap;

use crate::error::TableError;

/// Sentinel name reported when a bit pattern matches no table entry.
pub const UNKNOWN_PATH: &str = "UNKNOWN";

/// The deployed switch bank layout.  Must match the firmware on the other
/// end of the link exactly.
pub const DEFAULT_PATHS: [(&str, &str); 8] = [
    ("VNAO", "1000000"),
    ("VNAS", "1100000"),
    ("VNAL", "0010000"),
    ("VNAANT", "0000010"),
    ("VNAN", "0000011"),
    ("VNARF", "0001100"),
    ("RFN", "0000001"),
    ("RFANT", "0000000"),
];

// ---------------------------------------------------------------------------
// PathTable
// ---------------------------------------------------------------------------

/// Validated bidirectional name ⇄ bits lookup.
///
/// Invariants enforced at construction: at least one entry, every bit string
/// the same width, only `0`/`1` characters, no duplicate names, no two names
/// sharing a bit pattern.
#[derive(Debug, Clone)]
pub struct PathTable {
    by_name: HashMap<String, String>,
    by_bits: HashMap<String, String>,
    width: usize,
    low_power: Option<String>,
}

impl PathTable {
    /// Build a table from `(name, bits)` pairs, validating the invariants.
    pub fn new<I, N, B>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: Into<String>,
    {
        let mut by_name = HashMap::new();
        let mut by_bits = HashMap::new();
        let mut width = None;

        for (name, bits) in entries {
            let name = name.into();
            let bits = bits.into();
            if bits.chars().any(|c| c != '0' && c != '1') {
                return Err(TableError::NonBinary);
            }
            match width {
                None => width = Some(bits.len()),
                Some(w) if w != bits.len() => return Err(TableError::MixedWidths),
                Some(_) => {}
            }
            if by_bits.insert(bits.clone(), name.clone()).is_some() {
                return Err(TableError::DuplicateBits);
            }
            if by_name.insert(name, bits).is_some() {
                return Err(TableError::DuplicateName);
            }
        }

        let width = width.ok_or(TableError::Empty)?;
        let all_zero = "0".repeat(width);
        let low_power = by_bits.get(&all_zero).cloned();

        Ok(Self {
            by_name,
            by_bits,
            width,
            low_power,
        })
    }

    /// The deployed table from [`DEFAULT_PATHS`].
    pub fn standard() -> Self {
        // DEFAULT_PATHS is statically well-formed; rebuild without the
        // fallible surface so callers get an infallible constructor.
        let mut by_name = HashMap::new();
        let mut by_bits = HashMap::new();
        let mut low_power = None;
        let width = DEFAULT_PATHS[0].1.len();
        for (name, bits) in DEFAULT_PATHS {
            by_name.insert(name.to_owned(), bits.to_owned());
            by_bits.insert(bits.to_owned(), name.to_owned());
            if bits.chars().all(|c| c == '0') {
                low_power = Some(name.to_owned());
            }
        }
        Self {
            by_name,
            by_bits,
            width,
            low_power,
        }
    }

    /// Bit string for `name`.  `None` if the path is not in the table.
    pub fn bits(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Name for `bits`, or the [`UNKNOWN_PATH`] sentinel if no entry
    /// matches.  Not an error — mismatch reporting depends on this.
    pub fn name_for(&self, bits: &str) -> &str {
        self.by_bits.get(bits).map_or(UNKNOWN_PATH, String::as_str)
    }

    /// Name of the all-pins-low entry, if the table has one.
    pub fn low_power_name(&self) -> Option<&str> {
        self.low_power.as_deref()
    }

    /// Bit-string width shared by every entry (= expected pin count).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterate over path names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

impl Default for PathTable {
    fn default() -> Self {
        Self::standard()
    }
}
