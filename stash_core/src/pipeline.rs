//! One full read: attach, locate, decode, resolve.

use thiserror::Error;

use crate::catalog::SpawnCatalog;
use crate::decoder::{DecodeError, StashDecoder};
use crate::layout::STASH_SIZE;
use crate::memory::{MemoryError, MemorySession, ProcessMemory};
use crate::spawn::{resolve_records, ResolvedRecord};
use crate::version::{format_build_id, GameVersion, POINTER_CHAIN, TITLE_ID};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("target process is {title_id:016X}, not the supported title")]
    WrongTitle { title_id: u64 },
    #[error("unsupported game version (build id {build_id})")]
    UnsupportedVersion { build_id: String },
    #[error("pointer resolve failed at hop {hop}: {source}")]
    PointerResolve {
        hop: usize,
        #[source]
        source: MemoryError,
    },
    #[error("stash read at {address:#x} failed: {source}")]
    StashRead {
        address: u64,
        #[source]
        source: MemoryError,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl PipelineError {
    /// Build id to show alongside the error, when one was detected.
    pub fn build_id(&self) -> Option<&str> {
        match self {
            PipelineError::UnsupportedVersion { build_id } => Some(build_id),
            _ => None,
        }
    }
}

/// Result of one read. A newer report fully replaces an older one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StashReport {
    /// Label of the detected build; `None` when decoding a raw block.
    pub version: Option<&'static str>,
    pub build_id: Option<String>,
    pub records: Vec<ResolvedRecord>,
}

impl StashReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with a known placement, in stash order.
    pub fn located(&self) -> impl Iterator<Item = &ResolvedRecord> + '_ {
        self.records.iter().filter(|record| record.is_located())
    }

    pub fn get(&self, index: usize) -> Option<&ResolvedRecord> {
        self.records.get(index)
    }

    pub fn status_line(&self) -> String {
        if self.records.is_empty() {
            return "Shiny stash is empty".to_string();
        }
        match self.version {
            Some(label) => format!("{} shiny entries loaded (v{label})", self.records.len()),
            None => format!("{} shiny entries loaded", self.records.len()),
        }
    }
}

pub struct StashReader<'c> {
    decoder: StashDecoder,
    catalog: &'c SpawnCatalog,
}

impl<'c> StashReader<'c> {
    pub fn new(decoder: StashDecoder, catalog: &'c SpawnCatalog) -> Self {
        Self { decoder, catalog }
    }

    /// Decode and resolve an already captured stash block.
    pub fn decode_block(&self, raw: &[u8]) -> Result<StashReport, PipelineError> {
        let records = self.decoder.decode(raw)?;
        Ok(StashReport {
            version: None,
            build_id: None,
            records: resolve_records(&records, self.catalog),
        })
    }

    /// Attach to the process, locate the stash through the version's pointer
    /// chain and decode it. The session is closed before this returns,
    /// whatever the outcome.
    pub fn read<M: ProcessMemory + ?Sized>(
        &self,
        memory: &mut M,
    ) -> Result<StashReport, PipelineError> {
        let mut session = MemorySession::open(memory)?;
        let metadata = session.metadata()?;
        if metadata.title_id != TITLE_ID {
            return Err(PipelineError::WrongTitle {
                title_id: metadata.title_id,
            });
        }

        let build_id = format_build_id(&metadata.build_id);
        let version = GameVersion::detect(&metadata.build_id).ok_or_else(|| {
            PipelineError::UnsupportedVersion {
                build_id: build_id.clone(),
            }
        })?;
        tracing::debug!(
            target: "shiny_stash::pipeline",
            version = version.label,
            build_id = %build_id,
            "pipeline.version_detected"
        );

        let root = metadata.main_base.wrapping_add(version.base_offset);
        let address = session
            .resolve_pointer_chain(root, &POINTER_CHAIN)
            .map_err(|(hop, source)| PipelineError::PointerResolve { hop, source })?;

        let mut raw = vec![0u8; STASH_SIZE];
        session
            .read(address, &mut raw)
            .map_err(|source| PipelineError::StashRead { address, source })?;

        let records = self.decoder.decode(&raw)?;
        let report = StashReport {
            version: Some(version.label),
            build_id: Some(build_id),
            records: resolve_records(&records, self.catalog),
        };
        tracing::info!(
            target: "shiny_stash::pipeline",
            records = report.len(),
            located = report.located().count(),
            version = version.label,
            "pipeline.read_complete"
        );
        Ok(report)
    }
}
