//! Message padding
//!
//! SHA-256 pads every message to a whole number of 64-byte blocks:
//!
//! ```text
//! [MESSAGE] [0x80] [0x00 ...] [BIT LENGTH (8 bytes, big-endian)]
//! ```
//!
//! The zero run is sized so the length field ends exactly on a block
//! boundary. An empty message still produces one full block.

use std::slice::ChunksExact;

use bytes::{BufMut, Bytes, BytesMut};

use super::{BLOCK_SIZE, Block, Error, LENGTH_FIELD_SIZE, Result};

/// First padding byte: a single `1` bit followed by seven zero bits.
const MARKER: u8 = 0x80;

/// Offset inside the final block where the length field begins.
const LENGTH_OFFSET: usize = BLOCK_SIZE - LENGTH_FIELD_SIZE;

/// Longest possible tail: marker + 63 zeros + length field.
const MAX_TAIL: usize = BLOCK_SIZE + LENGTH_FIELD_SIZE;

/// Bit length of a message of `bytes` bytes.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] when `bytes * 8` does not fit in a `u64`.
pub fn bit_length(bytes: u64) -> Result<u64> {
    bytes
        .checked_mul(8)
        .ok_or(Error::LengthOverflow { bytes })
}

/// Padding bytes that follow a message, held on the stack.
#[derive(Clone, Copy)]
pub struct Tail {
    buf: [u8; MAX_TAIL],
    len: usize,
}

impl Tail {
    /// Padding bytes in order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl std::fmt::Debug for Tail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tail").field("len", &self.len).finish()
    }
}

/// Build the tail appended to a message of `message_len` bytes.
///
/// The tail is the `0x80` marker, enough zeros to reach 56 mod 64, then the
/// message bit length as a big-endian `u64`.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] when the bit length does not fit in 64 bits.
pub fn padding_tail(message_len: u64) -> Result<Tail> {
    let bits = bit_length(message_len)?;

    // Bytes of the message that land in its final, partial block.
    let used = (message_len % BLOCK_SIZE as u64) as usize;
    let zeros = (BLOCK_SIZE + LENGTH_OFFSET - used - 1) % BLOCK_SIZE;

    let mut buf = [0u8; MAX_TAIL];
    buf[0] = MARKER;
    let length_at = 1 + zeros;
    buf[length_at..length_at + LENGTH_FIELD_SIZE].copy_from_slice(&bits.to_be_bytes());

    Ok(Tail {
        buf,
        len: length_at + LENGTH_FIELD_SIZE,
    })
}

/// A message with its padding applied.
///
/// Always a positive multiple of [`BLOCK_SIZE`] bytes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedMessage {
    bytes: Bytes,
}

impl PaddedMessage {
    /// Padded bytes, original message first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Give up the underlying buffer.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Number of 64-byte blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.bytes.len() / BLOCK_SIZE
    }

    /// Iterate over the blocks in order.
    #[must_use]
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            inner: self.bytes.chunks_exact(BLOCK_SIZE),
        }
    }
}

/// Iterator over the blocks of a [`PaddedMessage`].
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    inner: ChunksExact<'a, u8>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.inner.next()?;
        let Ok(block) = <&Block>::try_from(chunk) else {
            unreachable!("chunks_exact yields {BLOCK_SIZE}-byte chunks");
        };
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Blocks<'_> {}

/// Pad `message` into whole 64-byte blocks.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] if the message bit length does not fit
/// in 64 bits.
pub fn pad(message: &[u8]) -> Result<PaddedMessage> {
    let tail = padding_tail(message.len() as u64)?;

    let mut buf = BytesMut::with_capacity(message.len() + tail.as_bytes().len());
    buf.put_slice(message);
    buf.put_slice(tail.as_bytes());
    debug_assert_eq!(buf.len() % BLOCK_SIZE, 0);

    Ok(PaddedMessage {
        bytes: buf.freeze(),
    })
}
