//! Entry cipher: LCRNG keystream XOR followed by a four-block shuffle.
//!
//! The first four bytes of an entry (the seed) are never encrypted. The seed
//! drives both the keystream and the choice of block order, so decryption
//! needs nothing but the entry itself. This is a format detail to be
//! reproduced bit for bit, not a confidentiality mechanism.

use crate::layout::{
    read_u16, read_u32, EntryBytes, ENTRY_BLOCK_COUNT, ENTRY_BLOCK_SIZE, ENTRY_CHECKSUM_OFFSET,
    ENTRY_HEADER_SIZE, ENTRY_STORED_END,
};

const LCRNG_MULT: u32 = 0x41C6_4E6D;
const LCRNG_ADD: u32 = 0x0000_6073;

const SHUFFLED_LEN: usize = ENTRY_BLOCK_SIZE * ENTRY_BLOCK_COUNT;

/// For each selector, the shuffled position of original blocks 0..4.
///
/// Selectors 24..=31 repeat 0..=7 exactly; the producer only ever defines 24
/// distinct orders and the five-bit selector wraps onto the first eight.
pub const BLOCK_POSITION: [[u8; 4]; 32] = [
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 1, 3],
    [0, 3, 1, 2],
    [0, 2, 3, 1],
    [0, 3, 2, 1],
    [1, 0, 2, 3],
    [1, 0, 3, 2],
    [2, 0, 1, 3],
    [3, 0, 1, 2],
    [2, 0, 3, 1],
    [3, 0, 2, 1],
    [1, 2, 0, 3],
    [1, 3, 0, 2],
    [2, 1, 0, 3],
    [3, 1, 0, 2],
    [2, 3, 0, 1],
    [3, 2, 0, 1],
    [1, 2, 3, 0],
    [1, 3, 2, 0],
    [2, 1, 3, 0],
    [3, 1, 2, 0],
    [2, 3, 1, 0],
    [3, 2, 1, 0],
    [0, 1, 2, 3],
    [0, 1, 3, 2],
    [0, 2, 1, 3],
    [0, 3, 1, 2],
    [0, 2, 3, 1],
    [0, 3, 2, 1],
    [1, 0, 2, 3],
    [1, 0, 3, 2],
];

/// 32-bit linear congruential generator producing 16-bit keystream words.
#[derive(Debug, Clone, Copy)]
pub struct Lcrng {
    state: u32,
}

impl Lcrng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_word(&mut self) -> u16 {
        self.state = self
            .state
            .wrapping_mul(LCRNG_MULT)
            .wrapping_add(LCRNG_ADD);
        (self.state >> 16) as u16
    }
}

/// Seed stored in the first four bytes of the entry.
#[inline]
pub fn entry_seed(entry: &EntryBytes) -> u32 {
    read_u32(entry, 0)
}

/// Bits 13..=17 of the seed.
#[inline]
pub fn shuffle_selector(seed: u32) -> usize {
    ((seed >> 13) & 31) as usize
}

/// Decrypt an entry in place.
pub fn decrypt(entry: &mut EntryBytes) {
    let seed = entry_seed(entry);
    apply_keystream(entry, seed);
    unshuffle(entry, seed);
}

/// Inverse of [`decrypt`]: shuffle into stored order, then apply the keystream.
pub fn encrypt(entry: &mut EntryBytes) {
    let seed = entry_seed(entry);
    shuffle(entry, seed);
    apply_keystream(entry, seed);
}

/// Wrapping sum of the little-endian words in the shuffled region of a
/// decrypted entry.
pub fn compute_checksum(entry: &EntryBytes) -> u16 {
    entry[ENTRY_HEADER_SIZE..ENTRY_STORED_END]
        .chunks_exact(2)
        .fold(0u16, |sum, word| {
            sum.wrapping_add(u16::from_le_bytes([word[0], word[1]]))
        })
}

/// Checksum the producer stored in the entry header.
pub fn stored_checksum(entry: &EntryBytes) -> u16 {
    read_u16(entry, ENTRY_CHECKSUM_OFFSET)
}

fn apply_keystream(entry: &mut EntryBytes, seed: u32) {
    let mut rng = Lcrng::new(seed);
    for word in entry[ENTRY_HEADER_SIZE..].chunks_exact_mut(2) {
        let key = rng.next_word().to_le_bytes();
        word[0] ^= key[0];
        word[1] ^= key[1];
    }
}

fn unshuffle(entry: &mut EntryBytes, seed: u32) {
    let order = &BLOCK_POSITION[shuffle_selector(seed)];
    let mut scratch = [0u8; SHUFFLED_LEN];
    for (block, &position) in order.iter().enumerate() {
        let from = ENTRY_HEADER_SIZE + position as usize * ENTRY_BLOCK_SIZE;
        scratch[block * ENTRY_BLOCK_SIZE..(block + 1) * ENTRY_BLOCK_SIZE]
            .copy_from_slice(&entry[from..from + ENTRY_BLOCK_SIZE]);
    }
    entry[ENTRY_HEADER_SIZE..ENTRY_STORED_END].copy_from_slice(&scratch);
}

fn shuffle(entry: &mut EntryBytes, seed: u32) {
    let order = &BLOCK_POSITION[shuffle_selector(seed)];
    let mut scratch = [0u8; SHUFFLED_LEN];
    for (block, &position) in order.iter().enumerate() {
        let from = ENTRY_HEADER_SIZE + block * ENTRY_BLOCK_SIZE;
        let to = position as usize * ENTRY_BLOCK_SIZE;
        scratch[to..to + ENTRY_BLOCK_SIZE].copy_from_slice(&entry[from..from + ENTRY_BLOCK_SIZE]);
    }
    entry[ENTRY_HEADER_SIZE..ENTRY_STORED_END].copy_from_slice(&scratch);
}
