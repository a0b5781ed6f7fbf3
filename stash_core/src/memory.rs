//! Access to the target process's memory.
//!
//! The actual memory service lives outside this crate; [`ProcessMemory`] is
//! the seam it plugs into. Every read happens inside a [`MemorySession`],
//! which closes the service on every exit path.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("memory service unavailable: {0}")]
    Unavailable(String),
    #[error("no debuggable target process is running")]
    NoProcess,
    #[error("failed to read process metadata: {0}")]
    Metadata(String),
    #[error("read of {len} bytes at {address:#x} failed")]
    Read { address: u64, len: usize },
}

/// Identity of the attached process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMetadata {
    pub title_id: u64,
    /// Load address of the main module.
    pub main_base: u64,
    pub build_id: Vec<u8>,
}

pub trait ProcessMemory {
    /// Attach to the target. An implementation that fails part way must
    /// release whatever it acquired before returning the error.
    fn open(&mut self) -> Result<(), MemoryError>;
    fn close(&mut self);
    fn metadata(&mut self) -> Result<ProcessMetadata, MemoryError>;
    fn read(&mut self, address: u64, buf: &mut [u8]) -> Result<(), MemoryError>;
}

/// An open attachment; closed on drop.
pub struct MemorySession<'a, M: ProcessMemory + ?Sized> {
    memory: &'a mut M,
}

impl<'a, M: ProcessMemory + ?Sized> MemorySession<'a, M> {
    pub fn open(memory: &'a mut M) -> Result<Self, MemoryError> {
        memory.open()?;
        tracing::trace!(target: "shiny_stash::memory", "memory.session_opened");
        Ok(Self { memory })
    }

    pub fn metadata(&mut self) -> Result<ProcessMetadata, MemoryError> {
        self.memory.metadata()
    }

    pub fn read(&mut self, address: u64, buf: &mut [u8]) -> Result<(), MemoryError> {
        self.memory.read(address, buf)
    }

    pub fn read_u64(&mut self, address: u64) -> Result<u64, MemoryError> {
        let mut raw = [0u8; 8];
        self.memory.read(address, &mut raw)?;
        Ok(u64::from_le_bytes(raw))
    }

    /// Follow `hops.len()` pointers starting at `root`, adding each hop's
    /// offset to the value read. Returns the final address, or the failing
    /// hop index with its error.
    pub fn resolve_pointer_chain(
        &mut self,
        root: u64,
        hops: &[u64],
    ) -> Result<u64, (usize, MemoryError)> {
        let mut address = root;
        for (hop, offset) in hops.iter().enumerate() {
            let pointer = self.read_u64(address).map_err(|err| (hop, err))?;
            address = pointer.wrapping_add(*offset);
        }
        Ok(address)
    }
}

impl<M: ProcessMemory + ?Sized> Drop for MemorySession<'_, M> {
    fn drop(&mut self) {
        self.memory.close();
        tracing::trace!(target: "shiny_stash::memory", "memory.session_closed");
    }
}

/// Sparse in-memory process image, for replaying captured memory or for
/// tests. Reads must fall entirely inside one mapped region.
#[derive(Debug, Clone)]
pub struct MemoryImage {
    metadata: Option<ProcessMetadata>,
    regions: BTreeMap<u64, Vec<u8>>,
    open: bool,
    sessions: usize,
}

impl MemoryImage {
    pub fn new(metadata: ProcessMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            regions: BTreeMap::new(),
            open: false,
            sessions: 0,
        }
    }

    /// An image with no attached process; `open` reports [`MemoryError::NoProcess`].
    pub fn detached() -> Self {
        Self {
            metadata: None,
            regions: BTreeMap::new(),
            open: false,
            sessions: 0,
        }
    }

    pub fn map(&mut self, address: u64, bytes: Vec<u8>) -> &mut Self {
        self.regions.insert(address, bytes);
        self
    }

    pub fn map_u64(&mut self, address: u64, value: u64) -> &mut Self {
        self.map(address, value.to_le_bytes().to_vec())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Number of sessions opened so far.
    pub fn session_count(&self) -> usize {
        self.sessions
    }
}

impl ProcessMemory for MemoryImage {
    fn open(&mut self) -> Result<(), MemoryError> {
        if self.metadata.is_none() {
            return Err(MemoryError::NoProcess);
        }
        self.open = true;
        self.sessions += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn metadata(&mut self) -> Result<ProcessMetadata, MemoryError> {
        self.metadata
            .clone()
            .ok_or_else(|| MemoryError::Metadata("no process".to_string()))
    }

    fn read(&mut self, address: u64, buf: &mut [u8]) -> Result<(), MemoryError> {
        let failed = MemoryError::Read {
            address,
            len: buf.len(),
        };
        if !self.open {
            return Err(failed);
        }
        let (&start, bytes) = self.regions.range(..=address).next_back().ok_or(failed.clone())?;
        let offset = (address - start) as usize;
        let end = offset.checked_add(buf.len()).ok_or(failed.clone())?;
        let src = bytes.get(offset..end).ok_or(failed)?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> MemoryImage {
        MemoryImage::new(ProcessMetadata {
            title_id: 1,
            main_base: 0x1000,
            build_id: vec![0; 32],
        })
    }

    #[test]
    fn session_closes_on_drop() {
        let mut image = image();
        {
            let session = MemorySession::open(&mut image).expect("open");
            drop(session);
        }
        assert!(!image.is_open());
        assert_eq!(image.session_count(), 1);
    }

    #[test]
    fn detached_image_cannot_open() {
        let mut image = MemoryImage::detached();
        assert_eq!(
            MemorySession::open(&mut image).err(),
            Some(MemoryError::NoProcess)
        );
    }

    #[test]
    fn pointer_chain_adds_offsets_after_each_hop() {
        let mut image = image();
        image
            .map_u64(0x1000, 0x2000)
            .map_u64(0x2010, 0x3000)
            .map_u64(0x3020, 0x4000);
        let mut session = MemorySession::open(&mut image).expect("open");
        let address = session
            .resolve_pointer_chain(0x1000, &[0x10, 0x20, 0x8])
            .expect("chain");
        assert_eq!(address, 0x4008);
    }

    #[test]
    fn unmapped_hop_reports_its_index() {
        let mut image = image();
        image.map_u64(0x1000, 0x2000);
        let mut session = MemorySession::open(&mut image).expect("open");
        let (hop, err) = session
            .resolve_pointer_chain(0x1000, &[0x10, 0x20])
            .unwrap_err();
        assert_eq!(hop, 1);
        assert_eq!(
            err,
            MemoryError::Read {
                address: 0x2010,
                len: 8
            }
        );
    }

    #[test]
    fn reads_must_stay_inside_a_region() {
        let mut image = image();
        image.map(0x5000, vec![1, 2, 3, 4]);
        let mut session = MemorySession::open(&mut image).expect("open");
        let mut buf = [0u8; 2];
        session.read(0x5002, &mut buf).expect("inside");
        assert_eq!(buf, [3, 4]);
        let mut wide = [0u8; 4];
        assert!(session.read(0x5002, &mut wide).is_err());
        assert!(session.read(0x4FFF, &mut buf).is_err());
    }
}
