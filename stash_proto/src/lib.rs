//! Wire types describing one finished stash read.
//!
//! A [`StashSnapshot`] is what the core hands to anything outside the
//! process: the inspector's JSON mode, dump files, or a renderer running
//! elsewhere. Every read produces a fresh snapshot; nothing here is diffed
//! against a previous one.

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::hash::{BuildHasher, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SnapshotHeader {
    /// Display label of the detected process build, empty for raw dumps.
    pub version: String,
    /// Hex rendering of the build id the version was detected from.
    pub build_id: String,
    pub record_count: u32,
    pub located_count: u32,
    pub hash: u64,
}

impl SnapshotHeader {
    pub fn new(
        version: impl Into<String>,
        build_id: impl Into<String>,
        record_count: usize,
        located_count: usize,
    ) -> Self {
        Self {
            version: version.into(),
            build_id: build_id.into(),
            record_count: record_count as u32,
            located_count: located_count as u32,
            hash: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationState {
    pub map: u8,
    pub map_name: String,
    pub label: String,
    pub world: [f32; 3],
    /// Position in the map image's own pixel space; `None` when the map
    /// selector has no known definition.
    pub pixel: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordState {
    pub hash: u64,
    pub species_internal: u16,
    pub species_id: u16,
    pub species_name: String,
    pub location: Option<LocationState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StashSnapshot {
    pub header: SnapshotHeader,
    pub records: Vec<RecordState>,
}

impl StashSnapshot {
    pub fn finalize(mut self) -> Self {
        self.header.hash = hash_snapshot(&self);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Deterministic content hash over the bincode encoding with the header hash
/// zeroed, so two reads of the same stash compare equal across runs.
pub fn hash_snapshot(snapshot: &StashSnapshot) -> u64 {
    let mut clone = snapshot.clone();
    clone.header.hash = 0;
    let encoded = bincode::serialize(&clone).expect("snapshot serialization for hashing");
    let mut hasher = RandomState::with_seeds(0, 0, 0, 0).build_hasher();
    hasher.write(&encoded);
    hasher.finish()
}

pub fn encode_snapshot(snapshot: &StashSnapshot) -> bincode::Result<Vec<u8>> {
    bincode::serialize(snapshot)
}

pub fn decode_snapshot(data: &[u8]) -> bincode::Result<StashSnapshot> {
    bincode::deserialize(data)
}

pub fn encode_snapshot_json(snapshot: &StashSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

pub fn encode_snapshot_json_pretty(snapshot: &StashSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

pub fn decode_snapshot_json(data: &str) -> serde_json::Result<StashSnapshot> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StashSnapshot {
        StashSnapshot {
            header: SnapshotHeader::new("2.0.1", "BCE5D5393B5AA3A8", 2, 1),
            records: vec![
                RecordState {
                    hash: 0x1122_3344_5566_7788,
                    species_internal: 25,
                    species_id: 25,
                    species_name: "Pikachu".to_string(),
                    location: Some(LocationState {
                        map: 0,
                        map_name: "Lumiose City".to_string(),
                        label: "North Boulevard".to_string(),
                        world: [10.0, 0.0, 5.0],
                        pixel: Some([48.0, 62.0]),
                    }),
                },
                RecordState {
                    hash: 0x0102_0304_0506_0708,
                    species_internal: 920,
                    species_id: 919,
                    species_name: "Species #919".to_string(),
                    location: None,
                },
            ],
        }
    }

    #[test]
    fn finalize_ignores_previous_hash() {
        let a = sample().finalize();
        let mut b = sample();
        b.header.hash = 0xdead_beef;
        let b = b.finalize();
        assert_ne!(a.header.hash, 0);
        assert_eq!(a.header.hash, b.header.hash);
    }

    #[test]
    fn hash_tracks_record_changes() {
        let a = sample().finalize();
        let mut b = sample();
        b.records.pop();
        let b = b.finalize();
        assert_ne!(a.header.hash, b.header.hash);
    }

    #[test]
    fn hash_covers_the_encoded_snapshot() {
        let snapshot = sample();
        let encoded = encode_snapshot(&snapshot).expect("encode");
        let mut hasher = RandomState::with_seeds(0, 0, 0, 0).build_hasher();
        hasher.write(&encoded);
        assert_eq!(hash_snapshot(&snapshot), hasher.finish());

        let mut empty = RandomState::with_seeds(0, 0, 0, 0).build_hasher();
        empty.write(&[]);
        assert_ne!(hash_snapshot(&snapshot), empty.finish());
    }

    #[test]
    fn json_keeps_unknown_location_as_null() {
        let json = encode_snapshot_json(&sample()).expect("encode");
        assert!(json.contains("\"location\":null"));
        let decoded = decode_snapshot_json(&json).expect("decode");
        assert_eq!(decoded, sample());
    }

    #[test]
    fn bincode_restores_snapshot() {
        let bytes = encode_snapshot(&sample()).expect("encode");
        assert_eq!(decode_snapshot(&bytes).expect("decode"), sample());
    }
}
