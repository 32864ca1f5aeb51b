//! Finished SHA-256 digest value

use std::fmt;
use std::str::FromStr;

use super::{DIGEST_SIZE, Error};

/// 32-byte SHA-256 digest.
///
/// Formats as 64 lowercase hex characters with `{}` and `{:x}`, or
/// uppercase with `{:X}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Consume into the raw digest bytes.
    #[must_use]
    pub const fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.0
    }

    /// Lowercase hex rendering (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{self:x}")
    }

    /// Parse a 64-character hex string, accepting either case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHex`] on a wrong length or a non-hex character.
    pub fn from_hex(text: &str) -> Result<Self, Error> {
        let text = text.as_bytes();
        if text.len() != DIGEST_SIZE * 2 {
            return Err(Error::InvalidHex {
                reason: format!("expected {} characters, got {}", DIGEST_SIZE * 2, text.len()),
            });
        }

        let mut out = [0u8; DIGEST_SIZE];
        for (idx, (byte, pair)) in out.iter_mut().zip(text.chunks_exact(2)).enumerate() {
            let high = nibble(pair[0], idx * 2)?;
            let low = nibble(pair[1], idx * 2 + 1)?;
            *byte = (high << 4) | low;
        }
        Ok(Self(out))
    }
}

fn nibble(ch: u8, position: usize) -> Result<u8, Error> {
    match ch {
        b'0'..=b'9' => Ok(ch - b'0'),
        b'a'..=b'f' => Ok(ch - b'a' + 10),
        b'A'..=b'F' => Ok(ch - b'A' + 10),
        _ => Err(Error::InvalidHex {
            reason: format!("unexpected character {:?} at position {position}", ch as char),
        }),
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_SIZE] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = Error;

    /// Like [`Digest::from_hex`], but ignores surrounding whitespace so a
    /// digest pasted from a file or terminal parses as-is.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim())
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self:x})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Digest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
