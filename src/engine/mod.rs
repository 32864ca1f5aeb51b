//! SHA-256 engine (FIPS 180-4)
//!
//! This module holds the pure hashing core: padding, the compression
//! function, state chaining and the digest value. Nothing in here touches
//! the filesystem or the console.

mod compress;
mod constants;
mod digest;
mod error;
mod hasher;
mod padding;

use tracing::trace;

pub use compress::{HashState, compress, compress_in_place, schedule};
pub use constants::{INITIAL_STATE, ROUND_CONSTANTS};
pub use digest::Digest;
pub use error::{Error, Result};
pub use hasher::{Phase, Sha256};
pub use padding::{Blocks, PaddedMessage, Tail, bit_length, pad, padding_tail};

/// Size of one compression block in bytes (512 bits)
pub const BLOCK_SIZE: usize = 64;

/// Size of the finished digest in bytes (256 bits)
pub const DIGEST_SIZE: usize = 32;

/// Number of 32-bit words in the hash state
pub const STATE_WORDS: usize = 8;

/// Number of 32-bit words in the per-block message schedule
pub const SCHEDULE_WORDS: usize = 64;

/// Size of the trailing big-endian bit-length field
pub const LENGTH_FIELD_SIZE: usize = 8;

/// One 512-bit block of padded input.
pub type Block = [u8; BLOCK_SIZE];

/// Compute the SHA-256 digest of `message`.
///
/// Pads the message, then folds the compression function over the blocks
/// in order starting from the initial state.
///
/// # Errors
///
/// Returns [`Error::LengthOverflow`] if the bit length of `message` does
/// not fit in 64 bits.
pub fn digest(message: &[u8]) -> Result<Digest> {
    let padded = pad(message)?;
    trace!(
        len = message.len(),
        blocks = padded.block_count(),
        "computing digest"
    );

    let state = padded
        .blocks()
        .fold(HashState::new(), |mut state, block| {
            state.absorb(block);
            state
        });

    Ok(state.into_digest())
}

/// Compute the digest of `message` rendered as 64 lowercase hex characters.
///
/// # Errors
///
/// Same as [`digest`].
pub fn digest_hex(message: &[u8]) -> Result<String> {
    digest(message).map(|d| d.to_hex())
}
