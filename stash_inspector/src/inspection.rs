use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use stash_core::{
    capture_snapshot, load_reader_config, SpawnCatalog, SpeciesNames, StashDecoder, StashReader,
    StashReport,
};
use stash_proto::StashSnapshot;

/// Static data plus the dump file being inspected. Each `read` is an
/// independent decode of whatever the file holds at that moment.
pub struct Inspection {
    snapshot_path: PathBuf,
    config_source: String,
    decoder: StashDecoder,
    catalog: SpawnCatalog,
    names: SpeciesNames,
}

impl Inspection {
    pub fn load(
        snapshot_path: PathBuf,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        let (config, metadata) = load_reader_config(config_path.as_deref());
        let base_dir = data_dir.unwrap_or_else(|| metadata.base_dir());
        let load = config.load_catalog(&base_dir);
        if load.catalog.duplicate_count() > 0 {
            tracing::warn!(
                duplicates = load.catalog.duplicate_count(),
                "Catalog has repeated hashes; first entry wins"
            );
        }
        Self {
            snapshot_path,
            config_source: metadata.source_label(),
            decoder: config.decoder(),
            catalog: load.catalog,
            names: config.load_species_names(&base_dir),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    pub fn catalog(&self) -> &SpawnCatalog {
        &self.catalog
    }

    pub fn names(&self) -> &SpeciesNames {
        &self.names
    }

    pub fn read(&self) -> Result<StashReport> {
        let raw = fs::read(&self.snapshot_path)
            .wrap_err_with(|| format!("failed to read {}", self.snapshot_path.display()))?;
        let reader = StashReader::new(self.decoder, &self.catalog);
        let report = reader
            .decode_block(&raw)
            .wrap_err_with(|| format!("failed to decode {}", self.snapshot_path.display()))?;
        Ok(report)
    }

    pub fn snapshot(&self) -> Result<StashSnapshot> {
        let report = self.read()?;
        Ok(capture_snapshot(&report, &self.names))
    }
}
