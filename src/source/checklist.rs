//! Checksum list format
//!
//! One entry per line, in the layout used by coreutils `sha256sum`:
//!
//! ```text
//! <64 hex chars><space><space or '*'><path>
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use super::{ReaderConfig, digest_files};
use crate::engine::{DIGEST_SIZE, Digest, Error, Result};

const HEX_LEN: usize = DIGEST_SIZE * 2;

/// One `digest  path` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumLine {
    /// Expected digest
    pub digest: Digest,
    /// File the digest belongs to
    pub path: PathBuf,
}

impl ChecksumLine {
    /// Pair a digest with its path.
    #[must_use]
    pub fn new(digest: Digest, path: impl Into<PathBuf>) -> Self {
        Self {
            digest,
            path: path.into(),
        }
    }

    /// Parse a single entry. `line_no` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChecksumLine`] if the line does not follow the
    /// expected layout.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidChecksumLine {
            line: line_no,
            reason: reason.to_string(),
        };

        let (hex, rest) = line
            .split_at_checked(HEX_LEN)
            .ok_or_else(|| invalid("line too short for a SHA-256 digest"))?;
        let digest = Digest::from_hex(hex).map_err(|err| Error::InvalidChecksumLine {
            line: line_no,
            reason: err.to_string(),
        })?;

        let path = rest
            .strip_prefix("  ")
            .or_else(|| rest.strip_prefix(" *"))
            .ok_or_else(|| invalid("expected two spaces or \" *\" after the digest"))?;
        if path.is_empty() {
            return Err(invalid("missing file name"));
        }

        Ok(Self::new(digest, path))
    }
}

impl fmt::Display for ChecksumLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.digest, self.path.display())
    }
}

/// Parse every entry of a checksum list.
///
/// # Errors
///
/// Returns the first [`Error::InvalidChecksumLine`] encountered.
pub fn parse_checklist(text: &str) -> Result<Vec<ChecksumLine>> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| ChecksumLine::parse(line, line_no))
        .collect()
}

/// Result of re-checking one entry.
#[derive(Debug)]
pub enum Outcome {
    /// File digest equals the listed digest
    Ok,
    /// File was read but its digest differs
    Mismatch {
        /// Digest actually computed
        actual: Digest,
    },
    /// File could not be read
    Failed(Error),
}

/// Verification record for one listed file.
#[derive(Debug)]
pub struct Verification {
    /// Listed path
    pub path: PathBuf,
    /// Listed digest
    pub expected: Digest,
    /// What happened when the file was re-digested
    pub outcome: Outcome,
}

impl Verification {
    /// True when the file matched.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok)
    }
}

/// Re-digest every file named in `text` and compare against the list.
///
/// Relative paths are resolved against the current directory.
///
/// # Errors
///
/// Returns an error if the list cannot be parsed or `config` is invalid.
/// Per-file problems are reported through [`Outcome`] instead.
pub fn verify_checklist(text: &str, config: &ReaderConfig) -> Result<Vec<Verification>> {
    let entries = parse_checklist(text)?;
    let paths: Vec<&PathBuf> = entries.iter().map(|entry| &entry.path).collect();
    let digests = digest_files(&paths, config)?;

    let verified: Vec<Verification> = entries
        .iter()
        .zip(digests)
        .map(|(entry, file)| {
            let outcome = match file.result {
                Ok(actual) if actual == entry.digest => Outcome::Ok,
                Ok(actual) => Outcome::Mismatch { actual },
                Err(err) => Outcome::Failed(err),
            };
            Verification {
                path: file.path,
                expected: entry.digest,
                outcome,
            }
        })
        .collect();

    let bad = verified.iter().filter(|v| !v.is_ok()).count();
    debug!(entries = verified.len(), bad, "checklist verified");
    Ok(verified)
}
