mod common;

use stash_core::{
    capture_snapshot, SpeciesNames, StashBlockBuilder, StashDecoder, StashReader, VERSIONS,
};
use stash_proto::{decode_snapshot, decode_snapshot_json, encode_snapshot, encode_snapshot_json};

fn names() -> SpeciesNames {
    let mut source = String::new();
    for id in 0..1000 {
        source.push_str(&format!("Species{id}\n"));
    }
    SpeciesNames::parse(&source)
}

fn read_snapshot(seed_offset: u32) -> stash_proto::StashSnapshot {
    let catalog = common::fixture_catalog();
    let reader = StashReader::new(StashDecoder::default(), &catalog);
    let stash = StashBlockBuilder::new()
        .entry(0x0A1B2C3D4E5F6071, 0x1000 + seed_offset, 25)
        .entry(0x0123456789ABCDEF, 0x2000 + seed_offset, 920)
        .entry(0x7777_7777_7777_7777, 0x3000 + seed_offset, 3)
        .build();
    let mut image = common::process_image(&VERSIONS[0], stash);
    let report = reader.read(&mut image).expect("read succeeds");
    capture_snapshot(&report, &names())
}

#[test]
fn snapshot_carries_names_and_pixels() {
    let snapshot = read_snapshot(0);
    assert_eq!(snapshot.header.version, "2.0.1");
    assert_eq!(snapshot.header.build_id, "BCE5D5393B5AA3A8");
    assert_eq!(snapshot.header.record_count, 3);
    assert_eq!(snapshot.header.located_count, 2);

    let sewer = &snapshot.records[1];
    assert_eq!(sewer.species_id, 919);
    assert_eq!(sewer.species_name, "Species919");
    let location = sewer.location.as_ref().expect("located");
    assert_eq!(location.map_name, "The Sewers");
    assert!(location.pixel.is_some());

    assert!(snapshot.records[2].location.is_none());
}

#[test]
fn snapshot_hash_ignores_encryption_seed() {
    let a = read_snapshot(0);
    let b = read_snapshot(0x0101_0101);
    assert_eq!(a.header.hash, b.header.hash);
    assert_eq!(a, b);
}

#[test]
fn snapshot_survives_both_encodings() -> anyhow::Result<()> {
    let snapshot = read_snapshot(0);

    let binary = encode_snapshot(&snapshot)?;
    assert_eq!(decode_snapshot(&binary)?, snapshot);

    let json = encode_snapshot_json(&snapshot)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["records"].as_array().map(Vec::len), Some(3));
    assert_eq!(decode_snapshot_json(&json)?, snapshot);
    Ok(())
}
