mod common;

use stash_core::{load_reader_config, CatalogError, LoadSummary, SpawnCatalog};

#[test]
fn fixture_files_load_with_skips_and_duplicates() {
    let mut catalog = SpawnCatalog::new();
    let summary = catalog
        .load_file(&common::fixture("lumiose_spawners.txt"), 0)
        .expect("fixture loads");
    assert_eq!(
        summary,
        LoadSummary {
            accepted: 3,
            skipped: 3,
            duplicates: 1,
        }
    );

    let entry = catalog.get(0x0A1B2C3D4E5F6071).expect("indexed");
    assert_eq!(entry.label, "Plaza fountain");
    assert_eq!((entry.x, entry.y, entry.z), (120.5, 3.0, -410.25));
    assert_eq!(catalog.duplicate_count(), 1);
}

#[test]
fn missing_catalog_file_is_an_error() {
    let mut catalog = SpawnCatalog::new();
    let err = catalog
        .load_file(&common::fixture("does_not_exist.txt"), 1)
        .expect_err("missing file");
    assert!(matches!(err, CatalogError::Read { .. }));
    assert!(catalog.is_empty());
}

#[test]
fn builtin_config_tolerates_missing_data() {
    let (config, _) = load_reader_config(None);
    let load = config.load_catalog(&common::fixture("no_such_dir"));
    assert!(load.catalog.is_empty());
    assert_eq!(load.failures.len(), config.catalogs.len());
    assert!(config
        .load_species_names(&common::fixture("no_such_dir"))
        .is_empty());
}
