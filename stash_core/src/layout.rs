//! Byte layout of the stash block and of the entry embedded in each slot.

/// Size of one stash slot.
pub const SLOT_SIZE: usize = 0x1F0;
/// Number of slots in the stash block.
pub const MAX_SLOTS: usize = 10;
/// Exact byte length of a raw stash block.
pub const STASH_SIZE: usize = SLOT_SIZE * MAX_SLOTS;

/// Hash value the producer writes into the first unused slot.
pub const TERMINATOR_HASH: u64 = 0xCBF2_9CE4_8422_2645;

/// Width of the identity hash at the start of every slot.
pub const HASH_SIZE: usize = 8;
/// Offset of the encrypted entry inside a slot (directly after the hash).
pub const ENTRY_OFFSET: usize = HASH_SIZE;
/// Length of the encrypted entry.
pub const ENTRY_SIZE: usize = 0x158;

/// Seed (4) + sanity (2) + checksum (2).
pub const ENTRY_HEADER_SIZE: usize = 8;
pub const ENTRY_CHECKSUM_OFFSET: usize = 6;
/// Size of each of the four shuffled segments after the header.
pub const ENTRY_BLOCK_SIZE: usize = 0x50;
pub const ENTRY_BLOCK_COUNT: usize = 4;
/// End of the shuffled region; bytes past it are only keystream-XORed.
pub const ENTRY_STORED_END: usize = ENTRY_HEADER_SIZE + ENTRY_BLOCK_SIZE * ENTRY_BLOCK_COUNT;

/// Internal species ordinal, little-endian, in the decrypted entry.
pub const SPECIES_OFFSET: usize = 0x08;

/// Fixed-size encrypted or decrypted entry buffer.
pub type EntryBytes = [u8; ENTRY_SIZE];

const _: () = assert!(STASH_SIZE == 4960);
const _: () = assert!(ENTRY_OFFSET + ENTRY_SIZE <= SLOT_SIZE);
const _: () = assert!(ENTRY_STORED_END <= ENTRY_SIZE);

#[inline]
pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[inline]
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
pub(crate) fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(raw)
}
