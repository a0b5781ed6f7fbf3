//! Internal species ordinal to canonical id conversion, and display names.

use std::{fs, io, path::Path};

/// First internal ordinal covered by [`SPECIES_DELTA`].
pub const SPECIES_DELTA_BASE: u16 = 917;

/// Signed correction per internal ordinal starting at [`SPECIES_DELTA_BASE`].
pub const SPECIES_DELTA: [i8; 109] = [
    65, -1, -1, -1, -1, 31, 31, 47, 47, 29, 29, 53, 31, 31, 46, 44, 30, 30, -7, -7, -7, 13, 13,
    -2, -2, 23, 23, 24, -21, -21, 27, 27, 47, 47, 47, 26, 14, -33, -33, -33, -17, -17, 3, -29,
    12, -12, -31, -31, -31, 3, 3, -24, -24, -44, -44, -30, -30, -28, -28, 23, 23, 6, 7, 29, 8,
    3, 4, 4, 20, 4, 23, 6, 3, 3, 4, -1, 13, 9, 7, 5, 7, 9, 9, -43, -43, -43, -68, -68, -68, -58,
    -58, -25, -29, -31, 6, -1, 6, 0, 0, 0, 3, 3, 4, 2, 3, 3, -5, -12, -12,
];

/// Convert an internal species ordinal into its canonical id.
///
/// Ordinals outside the corrected window are already canonical.
pub fn resolve_species(internal: u16) -> u16 {
    let index = match internal.checked_sub(SPECIES_DELTA_BASE) {
        Some(index) => index as usize,
        None => return internal,
    };
    match SPECIES_DELTA.get(index) {
        Some(&delta) => (internal as i32 + delta as i32) as u16,
        None => internal,
    }
}

/// Display names indexed by canonical species id.
#[derive(Debug, Clone, Default)]
pub struct SpeciesNames {
    names: Vec<String>,
}

impl SpeciesNames {
    /// One name per line; the line number is the canonical id.
    pub fn parse(source: &str) -> Self {
        Self {
            names: source
                .lines()
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect(),
        }
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    pub fn get(&self, species_id: u16) -> Option<&str> {
        self.names.get(species_id as usize).map(String::as_str)
    }

    pub fn display_name(&self, species_id: u16) -> String {
        match self.get(species_id) {
            Some(name) => name.to_string(),
            None => format!("Species #{species_id}"),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrected_window_applies_delta() {
        assert_eq!(resolve_species(917), 982);
        assert_eq!(resolve_species(920), 919);
        assert_eq!(
            resolve_species(920),
            (920 + SPECIES_DELTA[3] as i32) as u16
        );
        let last = SPECIES_DELTA_BASE + SPECIES_DELTA.len() as u16 - 1;
        assert_eq!(resolve_species(last), last - 12);
    }

    #[test]
    fn outside_window_is_identity() {
        for ordinal in [0u16, 1, 25, 916] {
            assert_eq!(resolve_species(ordinal), ordinal);
        }
        let past_end = SPECIES_DELTA_BASE + SPECIES_DELTA.len() as u16;
        for ordinal in past_end..past_end + 64 {
            assert_eq!(resolve_species(ordinal), ordinal);
        }
        assert_eq!(resolve_species(u16::MAX), u16::MAX);
    }

    #[test]
    fn names_strip_carriage_returns() {
        let names = SpeciesNames::parse("Egg\r\nBulbasaur\r\nIvysaur");
        assert_eq!(names.len(), 3);
        assert_eq!(names.get(1), Some("Bulbasaur"));
        assert_eq!(names.display_name(2), "Ivysaur");
        assert_eq!(names.display_name(3), "Species #3");

        let bare = SpeciesNames::parse("Egg\r\nBulbasaur\r");
        assert_eq!(bare.len(), 2);
        assert_eq!(bare.get(1), Some("Bulbasaur"));
    }

    #[test]
    fn empty_source_has_no_names() {
        let names = SpeciesNames::parse("");
        assert!(names.is_empty());
        assert_eq!(names.display_name(0), "Species #0");
    }
}
