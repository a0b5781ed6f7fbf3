//! Known spawn placements keyed by identity hash.
//!
//! Sources are line oriented, one placement per line:
//!
//! ```text
//! "North Boulevard" - 0123456789ABCDEF - Spawner V3f(12.5, 0.0, -40.25)
//! ```
//!
//! Lines that do not match are skipped and counted; a malformed line never
//! fails the whole load.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::hashing::{HexHash, PrehashedMap};

const MIN_LINE_LEN: usize = 20;
const FIELD_DELIMITER: &str = " - ";
const COORDS_OPEN: &str = "V3f(";
const HASH_DIGITS: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub hash: u64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub map: u8,
    pub label: String,
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum LineRejection {
    #[error("line too short")]
    TooShort,
    #[error("missing ' - ' delimiter")]
    MissingDelimiter,
    #[error("hash is not {HASH_DIGITS} hex digits")]
    BadHash,
    #[error("missing V3f(...) coordinates")]
    MissingCoordinates,
    #[error("coordinates are not three floats")]
    BadCoordinates,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read spawn catalog from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Counts from loading one catalog source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub accepted: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

pub fn parse_catalog_line(line: &str, map: u8) -> Result<CatalogEntry, LineRejection> {
    if line.len() < MIN_LINE_LEN {
        return Err(LineRejection::TooShort);
    }

    let label_end = line
        .find(FIELD_DELIMITER)
        .ok_or(LineRejection::MissingDelimiter)?;
    let hash_start = label_end + FIELD_DELIMITER.len();
    let hash_len = line[hash_start..]
        .find(FIELD_DELIMITER)
        .ok_or(LineRejection::MissingDelimiter)?;
    let hash_text = &line[hash_start..hash_start + hash_len];
    if hash_text.len() != HASH_DIGITS || !hash_text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LineRejection::BadHash);
    }
    let hash = u64::from_str_radix(hash_text, 16).map_err(|_| LineRejection::BadHash)?;

    let coords_start = line
        .find(COORDS_OPEN)
        .ok_or(LineRejection::MissingCoordinates)?
        + COORDS_OPEN.len();
    let coords_len = line[coords_start..]
        .find(')')
        .ok_or(LineRejection::MissingCoordinates)?;
    let [x, y, z] = parse_coordinates(&line[coords_start..coords_start + coords_len])?;

    let label = line[..label_end]
        .trim_matches(|c| c == ' ' || c == '\t' || c == '"')
        .to_string();

    Ok(CatalogEntry {
        hash,
        x,
        y,
        z,
        map,
        label,
    })
}

fn parse_coordinates(text: &str) -> Result<[f32; 3], LineRejection> {
    let mut parts = text.split(',');
    let mut out = [0f32; 3];
    for slot in out.iter_mut() {
        *slot = parts
            .next()
            .and_then(leading_float)
            .ok_or(LineRejection::BadCoordinates)?;
    }
    Ok(out)
}

/// Longest numeric prefix of `text` after leading whitespace, so `3.0f`
/// reads as `3.0`. Characters after the number are ignored.
fn leading_float(text: &str) -> Option<f32> {
    let text = text.trim_start();
    let numeric_len = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(text.len());
    (1..=numeric_len)
        .rev()
        .find_map(|len| text[..len].parse::<f32>().ok())
}

/// Ordered collection of placements with a first-wins hash index.
#[derive(Debug, Clone, Default)]
pub struct SpawnCatalog {
    entries: Vec<CatalogEntry>,
    by_hash: PrehashedMap<usize>,
    duplicates: usize,
}

impl SpawnCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns `false` when the hash was already present;
    /// the entry is kept for iteration but lookups keep resolving to the
    /// earlier one.
    pub fn push(&mut self, entry: CatalogEntry) -> bool {
        let index = self.entries.len();
        let hash = entry.hash;
        self.entries.push(entry);
        if self.by_hash.contains_key(&hash) {
            self.duplicates += 1;
            tracing::warn!(
                target: "shiny_stash::catalog",
                hash = %HexHash(hash),
                "catalog.duplicate_hash"
            );
            return false;
        }
        self.by_hash.insert(hash, index);
        true
    }

    /// Parse a textual source and append every valid line to the catalog.
    pub fn parse_source(&mut self, source: &str, map: u8) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for (line_no, line) in source.split('\n').enumerate() {
            match parse_catalog_line(line, map) {
                Ok(entry) => {
                    if self.push(entry) {
                        summary.accepted += 1;
                    } else {
                        summary.duplicates += 1;
                    }
                }
                Err(reason) => {
                    summary.skipped += 1;
                    if reason != LineRejection::TooShort {
                        tracing::debug!(
                            target: "shiny_stash::catalog",
                            map,
                            line = line_no + 1,
                            %reason,
                            "catalog.line_skipped"
                        );
                    }
                }
            }
        }
        summary
    }

    pub fn load_file(&mut self, path: &Path, map: u8) -> Result<LoadSummary, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let summary = self.parse_source(&contents, map);
        tracing::info!(
            target: "shiny_stash::catalog",
            path = %path.display(),
            map,
            accepted = summary.accepted,
            skipped = summary.skipped,
            duplicates = summary.duplicates,
            "catalog.loaded"
        );
        Ok(summary)
    }

    pub fn get(&self, hash: u64) -> Option<&CatalogEntry> {
        self.by_hash.get(&hash).map(|&index| &self.entries[index])
    }

    pub fn entries_on_map(&self, map: u8) -> impl Iterator<Item = &CatalogEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.map == map)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose hash was already claimed by an earlier entry.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}
