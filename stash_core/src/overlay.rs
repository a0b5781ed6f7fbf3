//! Points a renderer needs to draw the map for one focused record.

use crate::catalog::SpawnCatalog;
use crate::pipeline::StashReport;
use crate::transform::{MapDefinition, PixelPoint};

#[derive(Debug, Clone, PartialEq)]
pub struct MapOverlay {
    pub map: &'static MapDefinition,
    pub focus_index: usize,
    pub focus: PixelPoint,
    /// Other stash records placed on the same map, with their report index.
    pub stash_points: Vec<(usize, PixelPoint)>,
    /// Every catalog placement on the map.
    pub spawner_points: Vec<PixelPoint>,
}

impl MapOverlay {
    /// Build the overlay for `focus_index`, or `None` when that record has
    /// no known location or its map selector has no definition.
    pub fn for_focus(
        report: &StashReport,
        focus_index: usize,
        catalog: &SpawnCatalog,
    ) -> Option<Self> {
        let location = report.get(focus_index)?.location.as_ref()?;
        let map = MapDefinition::lookup(location.map)?;
        let focus = map.project(location.x as f64, location.z as f64);

        let stash_points = report
            .records
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != focus_index)
            .filter_map(|(index, record)| {
                let other = record.location.as_ref()?;
                (other.map == location.map)
                    .then(|| (index, map.project(other.x as f64, other.z as f64)))
            })
            .collect();

        let spawner_points = catalog
            .entries_on_map(location.map)
            .map(|entry| map.project(entry.x as f64, entry.z as f64))
            .collect();

        Some(Self {
            map,
            focus_index,
            focus,
            stash_points,
            spawner_points,
        })
    }
}
