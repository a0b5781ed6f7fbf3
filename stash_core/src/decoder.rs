//! Splits a raw stash block into slots and decodes the populated ones.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cipher;
use crate::hashing::HexHash;
use crate::layout::{
    read_u16, read_u64, EntryBytes, ENTRY_OFFSET, ENTRY_SIZE, MAX_SLOTS, SLOT_SIZE,
    SPECIES_OFFSET, STASH_SIZE, TERMINATOR_HASH,
};
use crate::species::resolve_species;

/// One decoded stash entry. Hashes are unique within a single decode pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StashRecord {
    pub hash: u64,
    pub species_internal: u16,
    pub species_id: u16,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("stash block is {actual} bytes, expected {expected}")]
    InputSizeMismatch { expected: usize, actual: usize },
}

/// What to do when a decrypted entry's stored checksum disagrees with its
/// contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumPolicy {
    #[default]
    Ignore,
    Warn,
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StashDecoder {
    checksum_policy: ChecksumPolicy,
}

impl StashDecoder {
    pub fn new(checksum_policy: ChecksumPolicy) -> Self {
        Self { checksum_policy }
    }

    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum_policy
    }

    /// Decode every populated slot up to the first terminating hash.
    ///
    /// Output order follows slot order. Slots with a zero species ordinal,
    /// repeated hashes and (under [`ChecksumPolicy::Reject`]) bad checksums
    /// are skipped without ending the pass.
    pub fn decode(&self, raw: &[u8]) -> Result<Vec<StashRecord>, DecodeError> {
        if raw.len() != STASH_SIZE {
            return Err(DecodeError::InputSizeMismatch {
                expected: STASH_SIZE,
                actual: raw.len(),
            });
        }

        let mut records: Vec<StashRecord> = Vec::with_capacity(MAX_SLOTS);
        for (slot_index, slot) in raw.chunks_exact(SLOT_SIZE).enumerate() {
            let hash = read_u64(slot, 0);
            if hash == 0 || hash == TERMINATOR_HASH {
                tracing::trace!(
                    target: "shiny_stash::decode",
                    slot = slot_index,
                    "decode.terminated"
                );
                break;
            }

            let mut entry: EntryBytes = [0u8; ENTRY_SIZE];
            entry.copy_from_slice(&slot[ENTRY_OFFSET..ENTRY_OFFSET + ENTRY_SIZE]);
            cipher::decrypt(&mut entry);

            let species_internal = read_u16(&entry, SPECIES_OFFSET);
            if species_internal == 0 {
                tracing::debug!(
                    target: "shiny_stash::decode",
                    slot = slot_index,
                    hash = %HexHash(hash),
                    "decode.slot_skipped=empty"
                );
                continue;
            }

            if !self.checksum_accepted(&entry, slot_index, hash) {
                continue;
            }

            if records.iter().any(|record| record.hash == hash) {
                tracing::debug!(
                    target: "shiny_stash::decode",
                    slot = slot_index,
                    hash = %HexHash(hash),
                    "decode.slot_skipped=duplicate"
                );
                continue;
            }

            records.push(StashRecord {
                hash,
                species_internal,
                species_id: resolve_species(species_internal),
            });
        }

        tracing::debug!(
            target: "shiny_stash::decode",
            records = records.len(),
            "decode.complete"
        );
        Ok(records)
    }

    fn checksum_accepted(&self, entry: &EntryBytes, slot_index: usize, hash: u64) -> bool {
        if self.checksum_policy == ChecksumPolicy::Ignore {
            return true;
        }
        let stored = cipher::stored_checksum(entry);
        let computed = cipher::compute_checksum(entry);
        if stored == computed {
            return true;
        }
        tracing::warn!(
            target: "shiny_stash::decode",
            slot = slot_index,
            hash = %HexHash(hash),
            stored,
            computed,
            "decode.checksum_mismatch"
        );
        self.checksum_policy != ChecksumPolicy::Reject
    }
}

/// Decode with the default decoder (checksums ignored).
pub fn decode_stash(raw: &[u8]) -> Result<Vec<StashRecord>, DecodeError> {
    StashDecoder::default().decode(raw)
}
