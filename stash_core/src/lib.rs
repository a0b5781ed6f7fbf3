//! Decode-and-resolve pipeline for the shiny stash snapshot.
//!
//! A fixed-size block captured from the game's memory is split into slots,
//! each slot's entry is decrypted, species ordinals are mapped to canonical
//! ids, identity hashes are joined against the spawn catalog and known
//! locations are projected into map image pixels. [`StashReader::read`]
//! performs the whole pass against a live process through
//! [`ProcessMemory`]; [`StashReader::decode_block`] starts from captured
//! bytes.

pub mod builder;
pub mod catalog;
pub mod cipher;
pub mod decoder;
mod hashing;
pub mod layout;
pub mod memory;
pub mod overlay;
pub mod pipeline;
pub mod reader_config;
mod snapshot;
pub mod spawn;
pub mod species;
pub mod transform;
pub mod version;

pub use builder::StashBlockBuilder;
pub use catalog::{
    parse_catalog_line, CatalogEntry, CatalogError, LineRejection, LoadSummary, SpawnCatalog,
};
pub use decoder::{decode_stash, ChecksumPolicy, DecodeError, StashDecoder, StashRecord};
pub use hashing::HexHash;
pub use layout::{MAX_SLOTS, SLOT_SIZE, STASH_SIZE, TERMINATOR_HASH};
pub use memory::{MemoryError, MemoryImage, MemorySession, ProcessMemory, ProcessMetadata};
pub use overlay::MapOverlay;
pub use pipeline::{PipelineError, StashReader, StashReport};
pub use reader_config::{
    load_reader_config, CatalogLoad, CatalogSource, ReaderConfig, ReaderConfigError,
    ReaderConfigMetadata,
};
pub use snapshot::capture_snapshot;
pub use spawn::{resolve_records, resolve_spawn, ResolvedRecord};
pub use species::{resolve_species, SpeciesNames};
pub use transform::{project, AxisDirection, MapDefinition, PixelPoint, MAPS};
pub use version::{format_build_id, GameVersion, POINTER_CHAIN, TITLE_ID, VERSIONS};
