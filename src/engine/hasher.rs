//! Incremental SHA-256 hasher.
//!
//! Input may arrive in pieces of any size. Whole blocks are compressed as
//! soon as they are complete; the remainder waits in a fixed 64-byte buffer
//! until more input or [`Sha256::finalize`] arrives. Finalizing consumes the
//! hasher, so a finished computation can never absorb more input.

use std::fmt;
use std::io;

use super::padding::padding_tail;
use super::{BLOCK_SIZE, Block, Digest, Error, HashState, Result};

/// Lifecycle of a live hasher.
///
/// The terminal finalized state is represented by the hasher having been
/// consumed by [`Sha256::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing absorbed yet
    Empty,
    /// At least one byte absorbed
    Absorbing,
}

/// Streaming SHA-256 computation.
#[derive(Clone)]
pub struct Sha256 {
    state: HashState,
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    // Total bytes fed to `update`; `None` once the count left u64 range.
    length: Option<u64>,
}

impl Sha256 {
    /// Start a new computation from the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: HashState::new(),
            buffer: [0u8; BLOCK_SIZE],
            buffer_len: 0,
            length: Some(0),
        }
    }

    /// Feed more message bytes.
    pub fn update(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }

        self.length = self
            .length
            .and_then(|total| total.checked_add(data.len() as u64));
        self.absorb(data);
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.length == Some(0) {
            Phase::Empty
        } else {
            Phase::Absorbing
        }
    }

    /// Number of message bytes absorbed so far, or `None` if the count
    /// overflowed.
    #[must_use]
    pub fn bytes_absorbed(&self) -> Option<u64> {
        self.length
    }

    /// Apply the padding tail and produce the digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthOverflow`] if more than 2^61 - 1 bytes were fed in.
    pub fn finalize(mut self) -> Result<Digest> {
        let length = self
            .length
            .ok_or(Error::LengthOverflow { bytes: u64::MAX })?;
        let tail = padding_tail(length)?;

        self.absorb(tail.as_bytes());
        debug_assert_eq!(self.buffer_len, 0);

        Ok(self.state.into_digest())
    }

    /// One-shot convenience over a fresh hasher.
    ///
    /// # Errors
    ///
    /// Same as [`Sha256::finalize`].
    pub fn digest(data: &[u8]) -> Result<Digest> {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    fn absorb(&mut self, data: &[u8]) {
        let mut remaining = data;

        if self.buffer_len > 0 {
            let take = (BLOCK_SIZE - self.buffer_len).min(remaining.len());
            let (head, tail) = remaining.split_at(take);
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(head);
            self.buffer_len += take;
            remaining = tail;

            if self.buffer_len < BLOCK_SIZE {
                return;
            }
            self.state.absorb(&self.buffer);
            self.buffer_len = 0;
        }

        let mut blocks = remaining.chunks_exact(BLOCK_SIZE);
        for chunk in blocks.by_ref() {
            let Ok(block) = <&Block>::try_from(chunk) else {
                unreachable!("chunks_exact yields {BLOCK_SIZE}-byte chunks");
            };
            self.state.absorb(block);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha256")
            .field("phase", &self.phase())
            .field("bytes_absorbed", &self.length)
            .finish_non_exhaustive()
    }
}

impl io::Write for Sha256 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::digest;

    fn hex(digest: Digest) -> String {
        digest.to_hex()
    }

    #[test]
    fn digest_longer_message() {
        let message = b"The quick brown fox jumps over the lazy dog";
        let expected = "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592";
        assert_eq!(hex(Sha256::digest(message).unwrap()), expected);
    }

    #[test]
    fn million_a() {
        let mut hasher = Sha256::new();
        let chunk = [b'a'; 1000];
        for _ in 0..1000 {
            hasher.update(&chunk);
        }
        let expected = "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0";
        assert_eq!(hex(hasher.finalize().unwrap()), expected);
    }

    #[test]
    fn incremental_vs_single_shot() {
        let mut hasher = Sha256::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        let incremental = hasher.finalize().unwrap();
        let single = Sha256::digest(b"hello world").unwrap();
        assert_eq!(incremental, single);
    }

    #[test]
    fn every_split_point_agrees() {
        let message: Vec<u8> = (0..150u8).collect();
        let expected = digest(&message).unwrap();

        for split in 0..=message.len() {
            let (head, tail) = message.split_at(split);
            let mut hasher = Sha256::new();
            hasher.update(head);
            hasher.update(tail);
            assert_eq!(hasher.finalize().unwrap(), expected, "split at {split}");
        }
    }

    #[test]
    fn block_aligned_updates() {
        let message: Vec<u8> = (0..=255u8).collect();
        let expected = digest(&message).unwrap();

        // Whole blocks go straight to the compressor without buffering.
        let mut hasher = Sha256::new();
        hasher.update(&message[..BLOCK_SIZE]);
        hasher.update(&message[BLOCK_SIZE..3 * BLOCK_SIZE]);
        hasher.update(&message[3 * BLOCK_SIZE..]);
        assert_eq!(hasher.buffer_len, 0);
        assert_eq!(hasher.finalize().unwrap(), expected);
    }

    #[test]
    fn phase_transitions() {
        let mut hasher = Sha256::new();
        assert_eq!(hasher.phase(), Phase::Empty);

        hasher.update(b"");
        assert_eq!(hasher.phase(), Phase::Empty);

        hasher.update(b"x");
        assert_eq!(hasher.phase(), Phase::Absorbing);
        assert_eq!(hasher.bytes_absorbed(), Some(1));
    }

    #[test]
    fn empty_finalize_matches_empty_digest() {
        assert_eq!(Sha256::new().finalize().unwrap(), digest(b"").unwrap());
    }

    #[test]
    fn interleaved_hashers_do_not_interfere() {
        let mut a = Sha256::new();
        let mut b = Sha256::new();

        a.update(b"first half of A, ");
        b.update(b"all of B");
        let b_digest = b.finalize().unwrap();
        a.update(b"second half of A");

        assert_eq!(
            a.finalize().unwrap(),
            digest(b"first half of A, second half of A").unwrap()
        );
        assert_eq!(b_digest, digest(b"all of B").unwrap());
    }

    #[test]
    fn clone_forks_state() {
        let mut base = Sha256::new();
        base.update(&[0x11; 100]);

        let mut fork = base.clone();
        fork.update(b"fork");
        base.update(b"base");

        let mut expected_base = vec![0x11; 100];
        expected_base.extend_from_slice(b"base");
        let mut expected_fork = vec![0x11; 100];
        expected_fork.extend_from_slice(b"fork");

        assert_eq!(base.finalize().unwrap(), digest(&expected_base).unwrap());
        assert_eq!(fork.finalize().unwrap(), digest(&expected_fork).unwrap());
    }

    #[test]
    fn io_copy_feeds_hasher() {
        let data = vec![0x42u8; 10_000];
        let mut hasher = Sha256::new();
        io::copy(&mut data.as_slice(), &mut hasher).unwrap();
        assert_eq!(hasher.finalize().unwrap(), digest(&data).unwrap());
    }

    #[test]
    fn length_overflow_is_an_error() {
        let mut hasher = Sha256::new();
        hasher.length = Some(u64::MAX - 1);
        hasher.update(b"abc");
        assert_eq!(hasher.bytes_absorbed(), None);
        assert!(matches!(
            hasher.finalize(),
            Err(Error::LengthOverflow { .. })
        ));

        let mut hasher = Sha256::new();
        hasher.length = Some(1 << 61);
        assert!(matches!(
            hasher.finalize(),
            Err(Error::LengthOverflow { bytes }) if bytes == 1 << 61
        ));
    }

    #[test]
    fn debug_hides_buffer() {
        let mut hasher = Sha256::new();
        hasher.update(b"secret");
        let rendered = format!("{hasher:?}");
        assert!(rendered.contains("Absorbing"));
        assert!(!rendered.contains("secret"));
    }
}
