//! Error types returned by the control-side API.
//!
//! Nothing on the render path returns an error: out-of-range input there is
//! clamped instead.

use thiserror::Error;

/// Failures when sending a control intent to the render context.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// The key has no entry in the key map.
    #[error("key {0:#04x} is not mapped to a note")]
    InvalidKey(u8),
    /// The previous command has not been picked up by the render context yet.
    #[error("command channel busy: previous command not yet acknowledged")]
    ChannelBusy,
    /// The render context did not take the command within the timeout.
    #[error("render context did not acknowledge within {0} ms")]
    AckTimeout(u64),
}

/// Rejected impulse response data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("impulse response table is empty")]
    Empty,
    #[error("table has {count} entries, at most {max} azimuths are supported")]
    TooManyEntries { count: usize, max: usize },
    #[error("response length {len} exceeds the {max} tap limit")]
    TooLong { len: usize, max: usize },
    #[error("entry {index} has {found} taps, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Failures loading a configuration or patch file.
#[cfg(feature = "serde")]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
