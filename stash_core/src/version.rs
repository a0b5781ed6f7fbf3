//! Supported process builds and where each keeps the stash.

use std::fmt::Write;

/// Title id of the process the stash is read from.
pub const TITLE_ID: u64 = 0x0100_F430_08C4_4000;

/// Per-hop offsets added after each pointer dereference.
pub const POINTER_CHAIN: [u64; 3] = [0x120, 0x168, 0x0];

/// Number of build id bytes used for detection.
pub const BUILD_ID_PREFIX: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameVersion {
    pub build_id: [u8; BUILD_ID_PREFIX],
    pub label: &'static str,
    /// Offset of the pointer chain root from the main module base.
    pub base_offset: u64,
}

pub const VERSIONS: [GameVersion; 3] = [
    GameVersion {
        build_id: [0xBC, 0xE5, 0xD5, 0x39, 0x3B, 0x5A, 0xA3, 0xA8],
        label: "2.0.1",
        base_offset: 0x610A710,
    },
    GameVersion {
        build_id: [0x8A, 0x1C, 0x86, 0xC4, 0x37, 0x39, 0x4B, 0x69],
        label: "2.0.0",
        base_offset: 0x6105710,
    },
    GameVersion {
        build_id: [0x17, 0x9C, 0x38, 0x43, 0xB9, 0x84, 0xF8, 0x78],
        label: "1.0.3",
        base_offset: 0x5F0E250,
    },
];

impl GameVersion {
    /// Match the leading bytes of a module build id against known builds.
    pub fn detect(build_id: &[u8]) -> Option<&'static GameVersion> {
        let prefix = build_id.get(..BUILD_ID_PREFIX)?;
        VERSIONS.iter().find(|version| version.build_id == prefix)
    }
}

/// Upper-case hex of the detection prefix, e.g. `BCE5D5393B5AA3A8`.
pub fn format_build_id(build_id: &[u8]) -> String {
    let mut out = String::with_capacity(BUILD_ID_PREFIX * 2);
    for byte in build_id.iter().take(BUILD_ID_PREFIX) {
        let _ = write!(out, "{byte:02X}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_builds_by_prefix() {
        let mut build_id = [0u8; 32];
        build_id[..8].copy_from_slice(&[0x8A, 0x1C, 0x86, 0xC4, 0x37, 0x39, 0x4B, 0x69]);
        build_id[8..].fill(0xEE);
        let version = GameVersion::detect(&build_id).expect("2.0.0");
        assert_eq!(version.label, "2.0.0");
        assert_eq!(version.base_offset, 0x6105710);
    }

    #[test]
    fn unknown_or_short_build_id_is_unsupported() {
        assert!(GameVersion::detect(&[0u8; 32]).is_none());
        assert!(GameVersion::detect(&[0xBC, 0xE5]).is_none());
    }

    #[test]
    fn build_id_renders_first_eight_bytes() {
        let mut build_id = VERSIONS[0].build_id.to_vec();
        build_id.extend_from_slice(&[0xFF; 4]);
        assert_eq!(format_build_id(&build_id), "BCE5D5393B5AA3A8");
    }
}
