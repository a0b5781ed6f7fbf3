#![allow(dead_code)]

use std::path::PathBuf;

use stash_core::{
    GameVersion, MemoryImage, ProcessMetadata, SpawnCatalog, POINTER_CHAIN, TITLE_ID,
};

pub const MAIN_BASE: u64 = 0x0000_0080_0000_0000;
const HOP_BASE: u64 = 0x0000_0002_1000_0000;
pub const STASH_ADDRESS: u64 = 0x0000_0002_2000_0000;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Catalog with the Lumiose fixture on map 0 and the sewers fixture on map 2.
pub fn fixture_catalog() -> SpawnCatalog {
    let mut catalog = SpawnCatalog::new();
    catalog
        .load_file(&fixture("lumiose_spawners.txt"), 0)
        .expect("lumiose fixture");
    catalog
        .load_file(&fixture("sewers_spawners.txt"), 2)
        .expect("sewers fixture");
    catalog
}

pub fn metadata_for(version: &GameVersion) -> ProcessMetadata {
    let mut build_id = version.build_id.to_vec();
    build_id.resize(0x20, 0x5A);
    ProcessMetadata {
        title_id: TITLE_ID,
        main_base: MAIN_BASE,
        build_id,
    }
}

/// Process image whose pointer chain for `version` ends at [`STASH_ADDRESS`]
/// holding `stash`.
pub fn process_image(version: &GameVersion, stash: Vec<u8>) -> MemoryImage {
    let mut image = MemoryImage::new(metadata_for(version));
    let mut address = MAIN_BASE + version.base_offset;
    let last = POINTER_CHAIN.len() - 1;
    for (hop, offset) in POINTER_CHAIN.iter().enumerate() {
        let target = if hop == last {
            STASH_ADDRESS
        } else {
            HOP_BASE + 0x1000 * hop as u64
        };
        image.map_u64(address, target - offset);
        address = target;
    }
    image.map(STASH_ADDRESS, stash);
    image
}
