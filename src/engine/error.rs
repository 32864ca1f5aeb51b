//! Engine error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while computing or handling SHA-256 digests
#[derive(Error, Debug)]
pub enum Error {
    /// Message bit length does not fit in the 64-bit length field
    #[error("message too long: {bytes} bytes exceeds the 2^64-1 bit length limit")]
    LengthOverflow {
        /// Message length in bytes (saturated)
        bytes: u64,
    },

    /// Hex text could not be parsed as a digest
    #[error("invalid hex digest: {reason}")]
    InvalidHex {
        /// What was wrong with the input
        reason: String,
    },

    /// Checksum list entry could not be parsed
    #[error("invalid checksum line {line}: {reason}")]
    InvalidChecksumLine {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Reader configuration is unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error from an unnamed source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error while reading a named file
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
