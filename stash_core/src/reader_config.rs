//! Where the reader finds its static data, and how strict decoding is.
//!
//! Loaded from `reader_config.json`; `STASH_READER_CONFIG` points at an
//! override file. Relative data paths resolve against the directory of the
//! file the config came from, or the working directory for the builtin copy.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{CatalogError, SpawnCatalog};
use crate::decoder::{ChecksumPolicy, StashDecoder};
use crate::species::SpeciesNames;
use crate::transform::MapDefinition;

pub const BUILTIN_READER_CONFIG: &str = include_str!("data/reader_config.json");
pub const READER_CONFIG_ENV: &str = "STASH_READER_CONFIG";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogSource {
    pub map: u8,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ReaderConfig {
    pub species_names: Option<PathBuf>,
    pub catalogs: Vec<CatalogSource>,
    pub checksum_policy: ChecksumPolicy,
}

#[derive(Debug, Error)]
pub enum ReaderConfigError {
    #[error("failed to parse reader config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read reader config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("catalog {path:?} names map {map}, which has no definition")]
    UnknownMap { map: u8, path: PathBuf },
}

/// Catalog assembled from every configured source, plus the sources that
/// could not be read.
#[derive(Debug, Default)]
pub struct CatalogLoad {
    pub catalog: SpawnCatalog,
    pub failures: Vec<CatalogError>,
}

impl ReaderConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            ReaderConfig::from_json_str(BUILTIN_READER_CONFIG)
                .expect("builtin reader config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReaderConfigError> {
        let config: ReaderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ReaderConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ReaderConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ReaderConfig::from_json_str(&contents)
    }

    fn validate(&self) -> Result<(), ReaderConfigError> {
        for source in &self.catalogs {
            if MapDefinition::lookup(source.map).is_none() {
                return Err(ReaderConfigError::UnknownMap {
                    map: source.map,
                    path: source.path.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn decoder(&self) -> StashDecoder {
        StashDecoder::new(self.checksum_policy)
    }

    /// Missing or unreadable name tables leave every species unnamed.
    pub fn load_species_names(&self, base_dir: &Path) -> SpeciesNames {
        let Some(relative) = self.species_names.as_ref() else {
            return SpeciesNames::default();
        };
        let path = base_dir.join(relative);
        match SpeciesNames::from_file(&path) {
            Ok(names) => {
                tracing::info!(
                    target: "shiny_stash::config",
                    path = %path.display(),
                    count = names.len(),
                    "species_names.loaded"
                );
                names
            }
            Err(err) => {
                tracing::warn!(
                    target: "shiny_stash::config",
                    path = %path.display(),
                    error = %err,
                    "species_names.load_failed"
                );
                SpeciesNames::default()
            }
        }
    }

    pub fn load_catalog(&self, base_dir: &Path) -> CatalogLoad {
        let mut load = CatalogLoad::default();
        for source in &self.catalogs {
            let path = base_dir.join(&source.path);
            if let Err(err) = load.catalog.load_file(&path, source.map) {
                tracing::warn!(
                    target: "shiny_stash::config",
                    error = %err,
                    "catalog.load_failed"
                );
                load.failures.push(err);
            }
        }
        load
    }
}

#[derive(Debug, Clone)]
pub struct ReaderConfigMetadata {
    path: Option<PathBuf>,
}

impl ReaderConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Where the active config came from, for status display.
    pub fn source_label(&self) -> String {
        match self.path() {
            Some(path) => path.display().to_string(),
            None => "builtin".to_string(),
        }
    }

    /// Directory relative data paths resolve against.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Load the config named by `explicit`, else by [`READER_CONFIG_ENV`], else
/// fall back to the builtin copy.
pub fn load_reader_config(explicit: Option<&Path>) -> (Arc<ReaderConfig>, ReaderConfigMetadata) {
    let candidate = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var(READER_CONFIG_ENV).ok().map(PathBuf::from));

    if let Some(path) = candidate {
        match ReaderConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "shiny_stash::config",
                    path = %path.display(),
                    "reader_config.loaded=file"
                );
                return (Arc::new(config), ReaderConfigMetadata::new(Some(path)));
            }
            Err(err) => {
                tracing::warn!(
                    target: "shiny_stash::config",
                    path = %path.display(),
                    error = %err,
                    "reader_config.load_failed"
                );
            }
        }
    }

    let config = ReaderConfig::builtin();
    tracing::info!(target: "shiny_stash::config", "reader_config.loaded=builtin");
    (config, ReaderConfigMetadata::new(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = ReaderConfig::builtin();
        assert_eq!(config.catalogs.len(), 4);
        assert_eq!(config.checksum_policy, ChecksumPolicy::Ignore);
        let maps: Vec<u8> = config.catalogs.iter().map(|c| c.map).collect();
        assert_eq!(maps, vec![0, 1, 2, 3]);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = ReaderConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, ReaderConfig::default());
        assert_eq!(config.decoder().checksum_policy(), ChecksumPolicy::Ignore);
    }

    #[test]
    fn checksum_policy_parses_snake_case() {
        let config =
            ReaderConfig::from_json_str(r#"{ "checksum_policy": "reject" }"#).expect("parse");
        assert_eq!(config.checksum_policy, ChecksumPolicy::Reject);
    }

    #[test]
    fn unknown_map_selector_is_rejected() {
        let err = ReaderConfig::from_json_str(
            r#"{ "catalogs": [ { "map": 7, "path": "t8.txt" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReaderConfigError::UnknownMap { map: 7, .. }));
    }

    #[test]
    fn unreadable_sources_are_collected_not_fatal() {
        let config = ReaderConfig::from_json_str(
            r#"{ "species_names": "nope.txt", "catalogs": [ { "map": 1, "path": "nope.txt" } ] }"#,
        )
        .expect("parse");
        let base = Path::new("/nonexistent-stash-data");
        assert!(config.load_species_names(base).is_empty());
        let load = config.load_catalog(base);
        assert!(load.catalog.is_empty());
        assert_eq!(load.failures.len(), 1);
    }

    #[test]
    fn metadata_base_dir_is_config_parent() {
        let meta = ReaderConfigMetadata::new(Some(PathBuf::from("/etc/stash/reader.json")));
        assert_eq!(meta.base_dir(), PathBuf::from("/etc/stash"));
        assert_eq!(ReaderConfigMetadata::new(None).base_dir(), PathBuf::from("."));
    }

    #[test]
    fn metadata_labels_its_source() {
        let meta = ReaderConfigMetadata::new(Some(PathBuf::from("/etc/stash/reader.json")));
        assert_eq!(meta.path(), Some(Path::new("/etc/stash/reader.json")));
        assert_eq!(meta.source_label(), "/etc/stash/reader.json");

        let builtin = ReaderConfigMetadata::new(None);
        assert_eq!(builtin.path(), None);
        assert_eq!(builtin.source_label(), "builtin");
    }
}
