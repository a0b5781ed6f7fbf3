use stash_proto::{LocationState, RecordState, SnapshotHeader, StashSnapshot};

use crate::pipeline::StashReport;
use crate::spawn::ResolvedRecord;
use crate::species::SpeciesNames;
use crate::transform::MapDefinition;

/// Convert a report into its wire form, naming species and projecting every
/// known location into its map's pixel space.
pub fn capture_snapshot(report: &StashReport, names: &SpeciesNames) -> StashSnapshot {
    let records: Vec<RecordState> = report
        .records
        .iter()
        .map(|resolved| record_state(resolved, names))
        .collect();
    let located = records.iter().filter(|r| r.location.is_some()).count();

    StashSnapshot {
        header: SnapshotHeader::new(
            report.version.unwrap_or_default(),
            report.build_id.clone().unwrap_or_default(),
            records.len(),
            located,
        ),
        records,
    }
    .finalize()
}

fn record_state(resolved: &ResolvedRecord, names: &SpeciesNames) -> RecordState {
    let record = resolved.record;
    RecordState {
        hash: record.hash,
        species_internal: record.species_internal,
        species_id: record.species_id,
        species_name: names.display_name(record.species_id),
        location: resolved.location.as_ref().map(|entry| {
            let map = MapDefinition::lookup(entry.map);
            LocationState {
                map: entry.map,
                map_name: map.map(|m| m.name.to_string()).unwrap_or_default(),
                label: entry.label.clone(),
                world: [entry.x, entry.y, entry.z],
                pixel: map.map(|m| {
                    let point = m.project(entry.x as f64, entry.z as f64);
                    [point.x, point.y]
                }),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::decoder::StashRecord;

    fn resolved(hash: u64, species: u16, location: Option<CatalogEntry>) -> ResolvedRecord {
        ResolvedRecord {
            record: StashRecord {
                hash,
                species_internal: species,
                species_id: species,
            },
            location,
        }
    }

    #[test]
    fn snapshot_names_and_projects_records() {
        let names = SpeciesNames::parse("Egg\nBulbasaur\nIvysaur");
        let report = StashReport {
            version: Some("1.0.3"),
            build_id: Some("179C3843B984F878".to_string()),
            records: vec![
                resolved(
                    0xAA,
                    1,
                    Some(CatalogEntry {
                        hash: 0xAA,
                        x: 10.0,
                        y: 3.0,
                        z: 5.0,
                        map: 2,
                        label: "Sewer Gate".to_string(),
                    }),
                ),
                resolved(0xBB, 2, None),
                resolved(
                    0xCC,
                    40,
                    Some(CatalogEntry {
                        hash: 0xCC,
                        x: 0.0,
                        y: 0.0,
                        z: 0.0,
                        map: 9,
                        label: "Unmapped".to_string(),
                    }),
                ),
            ],
        };

        let snapshot = capture_snapshot(&report, &names);
        assert_eq!(snapshot.header.version, "1.0.3");
        assert_eq!(snapshot.header.record_count, 3);
        assert_eq!(snapshot.header.located_count, 2);
        assert_ne!(snapshot.header.hash, 0);

        let first = snapshot.records[0].location.as_ref().expect("located");
        assert_eq!(snapshot.records[0].species_name, "Bulbasaur");
        assert_eq!(first.map_name, "The Sewers");
        let expected = MapDefinition::lookup(2).expect("map").project(10.0, 5.0);
        assert_eq!(first.pixel, Some([expected.x, expected.y]));

        assert!(snapshot.records[1].location.is_none());
        assert_eq!(snapshot.records[2].species_name, "Species #40");
        let unmapped = snapshot.records[2].location.as_ref().expect("located");
        assert_eq!(unmapped.pixel, None);
        assert_eq!(unmapped.map_name, "");
    }
}
