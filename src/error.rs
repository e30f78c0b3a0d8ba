//! Unified error types for the switch network stack.
//!
//! A single `Error` enum that the host-side controller and transport layer
//! funnel into, keeping caller-side error handling uniform.  The receiving
//! side deliberately does *not* use these: malformed commands are absorbed
//! silently there (see [`crate::codec`]), so a noisy line never takes the
//! device loop down.

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible host-side operation funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The serial transport could not be opened.  Fatal at construction.
    Connection(String),
    /// The requested path name is absent from the path table.
    UnknownPath(String),
    /// No verification reply arrived before the read timeout elapsed.
    /// The physical switch state is unknown after this.
    SwitchTimeout,
    /// A verification reply arrived but did not carry the `STATES:` tag.
    /// The offending line is preserved for diagnostics.
    MalformedReply(String),
    /// The configured path table is internally inconsistent.
    Table(TableError),
    /// Transport I/O failed mid-operation.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "connection: {msg}"),
            Self::UnknownPath(name) => write!(f, "unknown path: {name}"),
            Self::SwitchTimeout => write!(f, "no reply from the switch"),
            Self::MalformedReply(line) => {
                write!(f, "unexpected reply from switch: {line}")
            }
            Self::Table(e) => write!(f, "path table: {e}"),
            Self::Io(e) => write!(f, "I/O: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<TableError> for Error {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

// ---------------------------------------------------------------------------
// Path table validation errors
// ---------------------------------------------------------------------------

/// Rejections raised while building a [`PathTable`](crate::paths::PathTable)
/// from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The table has no entries.
    Empty,
    /// Not every bit string has the same length.
    MixedWidths,
    /// A bit string contains a character other than `0` or `1`.
    NonBinary,
    /// Two entries share the same path name.
    DuplicateName,
    /// Two names map to the same bit pattern.
    DuplicateBits,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "table has no entries"),
            Self::MixedWidths => write!(f, "bit strings differ in length"),
            Self::NonBinary => write!(f, "bit string contains a non-binary character"),
            Self::DuplicateName => write!(f, "duplicate path name"),
            Self::DuplicateBits => write!(f, "duplicate bit pattern"),
        }
    }
}

impl std::error::Error for TableError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
