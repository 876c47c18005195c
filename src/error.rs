use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

/// Audioset's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Audioset's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs. Decode internals still use `anyhow` for
/// context chaining and convert at the boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// A global segment index was outside `[0, len())`.
    #[error("segment index {index} out of range (collection holds {len} segments)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A decoded file did not match the requested sample rate / channel count and
    /// conversion was not enabled.
    #[error(
        "expected {} to be {expected_rate} Hz / {expected_channels} ch, \
         got {actual_rate} Hz / {actual_channels} ch (conversion disabled)",
        .path.display()
    )]
    FormatMismatch {
        path: PathBuf,
        expected_rate: u32,
        actual_rate: u32,
        expected_channels: usize,
        actual_channels: usize,
    },

    /// A channel layout change the converter does not implement.
    #[error("unsupported channel conversion: {from} -> {to} channels")]
    UnsupportedConversion { from: usize, to: usize },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
