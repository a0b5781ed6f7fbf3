//! Joins decoded stash records to catalog placements.

use crate::catalog::{CatalogEntry, SpawnCatalog};
use crate::decoder::StashRecord;

/// A decoded record and, when known, where it was encountered.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    pub record: StashRecord,
    pub location: Option<CatalogEntry>,
}

impl ResolvedRecord {
    pub fn is_located(&self) -> bool {
        self.location.is_some()
    }

    pub fn map(&self) -> Option<u8> {
        self.location.as_ref().map(|location| location.map)
    }
}

/// Catalog placement sharing the record's identity hash.
///
/// No match is the normal outcome for records encountered outside the
/// known catalog.
pub fn resolve_spawn<'a>(record: &StashRecord, catalog: &'a SpawnCatalog) -> Option<&'a CatalogEntry> {
    catalog.get(record.hash)
}

pub fn resolve_records(records: &[StashRecord], catalog: &SpawnCatalog) -> Vec<ResolvedRecord> {
    records
        .iter()
        .map(|record| ResolvedRecord {
            record: *record,
            location: resolve_spawn(record, catalog).cloned(),
        })
        .collect()
}
