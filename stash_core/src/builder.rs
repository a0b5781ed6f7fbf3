//! Assembles raw stash blocks from plain entries.

use crate::cipher;
use crate::layout::{
    EntryBytes, ENTRY_CHECKSUM_OFFSET, ENTRY_OFFSET, ENTRY_SIZE, HASH_SIZE, MAX_SLOTS, SLOT_SIZE,
    SPECIES_OFFSET, STASH_SIZE, TERMINATOR_HASH,
};

/// Writes slots front to back; unwritten slots stay zeroed.
#[derive(Debug, Clone)]
pub struct StashBlockBuilder {
    block: Vec<u8>,
    next_slot: usize,
}

impl Default for StashBlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StashBlockBuilder {
    pub fn new() -> Self {
        Self {
            block: vec![0u8; STASH_SIZE],
            next_slot: 0,
        }
    }

    /// Append a populated slot with a valid checksum.
    pub fn entry(self, hash: u64, seed: u32, species_internal: u16) -> Self {
        let mut plain = [0u8; ENTRY_SIZE];
        plain[..4].copy_from_slice(&seed.to_le_bytes());
        plain[SPECIES_OFFSET..SPECIES_OFFSET + 2].copy_from_slice(&species_internal.to_le_bytes());
        self.plain_entry(hash, plain)
    }

    /// Append a slot from a full decrypted entry, stamping its checksum.
    pub fn plain_entry(mut self, hash: u64, mut plain: EntryBytes) -> Self {
        let checksum = cipher::compute_checksum(&plain);
        plain[ENTRY_CHECKSUM_OFFSET..ENTRY_CHECKSUM_OFFSET + 2]
            .copy_from_slice(&checksum.to_le_bytes());
        cipher::encrypt(&mut plain);
        if let Some(start) = self.claim_slot(hash) {
            self.block[start + ENTRY_OFFSET..start + ENTRY_OFFSET + ENTRY_SIZE]
                .copy_from_slice(&plain);
        }
        self
    }

    /// Append a slot holding only the terminator hash.
    pub fn terminator(mut self) -> Self {
        self.claim_slot(TERMINATOR_HASH);
        self
    }

    /// Skip a slot, leaving it zeroed.
    pub fn skip(mut self) -> Self {
        self.next_slot += 1;
        self
    }

    /// Flip the stored checksum of an already written slot.
    pub fn corrupt_checksum(mut self, slot: usize) -> Self {
        let at = slot * SLOT_SIZE + ENTRY_OFFSET + ENTRY_CHECKSUM_OFFSET;
        if let Some(byte) = self.block.get_mut(at) {
            *byte ^= 0xFF;
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.block
    }

    fn claim_slot(&mut self, hash: u64) -> Option<usize> {
        if self.next_slot >= MAX_SLOTS {
            return None;
        }
        let start = self.next_slot * SLOT_SIZE;
        self.block[start..start + HASH_SIZE].copy_from_slice(&hash.to_le_bytes());
        self.next_slot += 1;
        Some(start)
    }
}
