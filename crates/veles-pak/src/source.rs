//! Random-access byte sources backing an archive.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::Result;

/// The bytes of an opened archive.
///
/// Both variants are read-only and shareable between threads; every read is
/// a slice at an explicit offset, so there is no shared stream position.
pub enum PakSource {
    /// A memory-mapped file.
    Mapped(Mmap),
    /// An in-memory buffer.
    Memory(Vec<u8>),
}

impl PakSource {
    /// Memory-map a file.
    pub fn map<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        // SAFETY: the map is read-only; the archive file is not expected to be
        // modified while it is open.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self::Mapped(mmap))
    }

    /// Get the full contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => mmap,
            Self::Memory(data) => data,
        }
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the source is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<u8>> for PakSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Memory(data)
    }
}

impl std::fmt::Debug for PakSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Mapped(_) => "Mapped",
            Self::Memory(_) => "Memory",
        };
        f.debug_struct("PakSource")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

/// Where a [`PakHandle`](crate::PakHandle) will read its archive from.
#[derive(Debug, Clone)]
pub enum ArchiveSource {
    /// A file on disk, memory-mapped on open.
    Path(PathBuf),
    /// An in-memory buffer.
    Bytes(Vec<u8>),
}

impl From<PathBuf> for ArchiveSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ArchiveSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ArchiveSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Bytes(data)
    }
}
