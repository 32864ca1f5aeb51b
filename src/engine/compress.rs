//! SHA-256 compression function.

use super::constants::{INITIAL_STATE, ROUND_CONSTANTS};
use super::{Block, DIGEST_SIZE, Digest, SCHEDULE_WORDS, STATE_WORDS};

#[inline(always)]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[inline(always)]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
fn choice(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
fn majority(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

/// Expand one block into the 64-word message schedule.
#[must_use]
pub fn schedule(block: &Block) -> [u32; SCHEDULE_WORDS] {
    let mut w = [0u32; SCHEDULE_WORDS];
    for (word, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for t in 16..SCHEDULE_WORDS {
        w[t] = small_sigma1(w[t - 2])
            .wrapping_add(w[t - 7])
            .wrapping_add(small_sigma0(w[t - 15]))
            .wrapping_add(w[t - 16]);
    }

    w
}

/// Advance `state` by one block in place.
pub fn compress_in_place(state: &mut [u32; STATE_WORDS], block: &Block) {
    let w = schedule(block);

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for (k, w) in ROUND_CONSTANTS.iter().zip(w.iter()) {
        let t1 = h
            .wrapping_add(big_sigma1(e))
            .wrapping_add(choice(e, f, g))
            .wrapping_add(*k)
            .wrapping_add(*w);
        let t2 = big_sigma0(a).wrapping_add(majority(a, b, c));

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (word, working) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *word = word.wrapping_add(working);
    }
}

/// Return the state that follows `state` after absorbing `block`.
#[must_use]
pub fn compress(mut state: [u32; STATE_WORDS], block: &Block) -> [u32; STATE_WORDS] {
    compress_in_place(&mut state, block);
    state
}

/// Chaining value for a single digest computation.
///
/// Every computation starts from its own copy of the initial state, so two
/// hashers can never observe each other's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashState {
    words: [u32; STATE_WORDS],
}

impl HashState {
    /// Fresh state seeded with the standard initial value.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: INITIAL_STATE,
        }
    }

    /// Current chaining words.
    #[must_use]
    pub const fn words(&self) -> &[u32; STATE_WORDS] {
        &self.words
    }

    /// Absorb one block.
    pub fn absorb(&mut self, block: &Block) {
        compress_in_place(&mut self.words, block);
    }

    /// Serialize the words big-endian into the final digest.
    #[must_use]
    pub fn into_digest(self) -> Digest {
        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, value) in out.chunks_exact_mut(4).zip(self.words.iter()) {
            chunk.copy_from_slice(&value.to_be_bytes());
        }
        Digest::from(out)
    }
}

impl Default for HashState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pad;

    #[test]
    fn round_functions() {
        assert_eq!(choice(0xFFFF_0000, 0x1234_5678, 0x9ABC_DEF0), 0x1234_DEF0);
        assert_eq!(majority(0xFF00_FF00, 0xF0F0_F0F0, 0x0000_FFFF), 0xF000_FFF0);
        assert_eq!(small_sigma0(0), 0);
        assert_eq!(big_sigma1(1), (1u32 << 26) | (1 << 21) | (1 << 7));
    }

    #[test]
    fn schedule_copies_block_words() {
        let padded = pad(b"abc").unwrap();
        let block = padded.blocks().next().unwrap();
        let w = schedule(block);

        assert_eq!(w[0], 0x6162_6380);
        assert!(w[1..15].iter().all(|&word| word == 0));
        assert_eq!(w[15], 0x0000_0018);
        // FIPS 180-4 example, "abc" one-block message schedule.
        assert_eq!(w[16], 0x6162_6380);
        assert_eq!(w[17], 0x000F_0000);
    }

    #[test]
    fn abc_single_block_state() {
        let padded = pad(b"abc").unwrap();
        let block = padded.blocks().next().unwrap();
        let state = compress(INITIAL_STATE, block);

        assert_eq!(
            state,
            [
                0xBA78_16BF,
                0x8F01_CFEA,
                0x4141_40DE,
                0x5DAE_2223,
                0xB003_61A3,
                0x9617_7A9C,
                0xB410_FF61,
                0xF200_15AD,
            ]
        );
    }

    #[test]
    fn in_place_matches_pure_form() {
        let padded = pad(&[0x5A; 100]).unwrap();
        let mut in_place = INITIAL_STATE;
        let mut pure = INITIAL_STATE;
        for block in padded.blocks() {
            compress_in_place(&mut in_place, block);
            pure = compress(pure, block);
        }
        assert_eq!(in_place, pure);
    }

    #[test]
    fn fresh_states_are_independent() {
        let padded = pad(b"abc").unwrap();
        let mut used = HashState::new();
        used.absorb(padded.blocks().next().unwrap());

        assert_ne!(used, HashState::new());
        assert_eq!(HashState::new().words(), &INITIAL_STATE);
    }
}
