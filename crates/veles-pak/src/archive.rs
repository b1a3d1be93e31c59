//! PAK archive reader.
//!
//! The archive is immutable once opened. Extraction slices the shared
//! read-only source at the entry's own offset, so any number of threads can
//! extract from one archive at the same time.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};
use veles_common::{BinaryReader, Sha1Digest};

use crate::crypto;
use crate::decompress;
use crate::entry::EntryRecord;
use crate::format::HEADER_SIZE;
use crate::header::PakHeader;
use crate::index::PakIndex;
use crate::options::OpenOptions;
use crate::source::PakSource;
use crate::{Error, Result};

/// Summary figures for an opened archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ArchiveStats {
    /// Number of entries
    pub entries: usize,
    /// Entries with the encryption flag set
    pub encrypted_entries: usize,
    /// Entries split into compression blocks
    pub block_entries: usize,
    /// Sum of stored sizes
    pub compressed_bytes: u64,
    /// Sum of uncompressed sizes
    pub uncompressed_bytes: u64,
}

/// An opened PAK archive.
pub struct PakArchive {
    /// Archive bytes
    source: PakSource,
    /// Archive file name
    name: String,
    /// Validated header
    header: PakHeader,
    /// Parsed index
    index: PakIndex,
    /// Open options (carries the key)
    options: OpenOptions,
}

impl PakArchive {
    /// Open and memory-map a PAK archive with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, OpenOptions::default())
    }

    /// Open and memory-map a PAK archive.
    pub fn open_with<P: AsRef<Path>>(path: P, options: OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        let source = PakSource::map(path)?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Self::from_source(source, name, options)
    }

    /// Open an archive held in memory.
    pub fn from_bytes(data: Vec<u8>, options: OpenOptions) -> Result<Self> {
        Self::from_source(PakSource::Memory(data), "memory".to_string(), options)
    }

    /// Open an archive from an already prepared source.
    pub fn from_source(source: PakSource, name: String, options: OpenOptions) -> Result<Self> {
        let data = source.as_bytes();
        let header = PakHeader::parse(data)?;

        debug!(
            archive = %name,
            version = header.version,
            size = data.len(),
            "opening PAK archive"
        );

        let mut reader = BinaryReader::new(data);
        let index = PakIndex::build(&mut reader, &header, &options)?;

        Ok(Self {
            source,
            name,
            header,
            index,
            options,
        })
    }

    /// Cheap pre-flight check of a file: magic and version only.
    ///
    /// Reads just the first few bytes and never builds the index.
    pub fn is_valid<P: AsRef<Path>>(path: P) -> bool {
        let Ok(file) = File::open(path.as_ref()) else {
            return false;
        };

        let mut prefix = Vec::with_capacity(HEADER_SIZE);
        if file.take(HEADER_SIZE as u64).read_to_end(&mut prefix).is_err() {
            return false;
        }

        Self::is_valid_bytes(&prefix)
    }

    /// Cheap pre-flight check of an in-memory source.
    #[inline]
    pub fn is_valid_bytes(data: &[u8]) -> bool {
        PakHeader::probe(data).is_ok()
    }

    /// Get the archive name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the header.
    #[inline]
    pub fn header(&self) -> &PakHeader {
        &self.header
    }

    /// Get the index.
    #[inline]
    pub fn index(&self) -> &PakIndex {
        &self.index
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the archive has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Normalized entry paths in index order.
    #[inline]
    pub fn list(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.paths()
    }

    /// Entries in index order.
    #[inline]
    pub fn entries(&self) -> &[EntryRecord] {
        self.index.entries()
    }

    /// Find an entry by path.
    ///
    /// The path is normalized with the archive's case policy first.
    #[inline]
    pub fn entry(&self, path: &str) -> Option<&EntryRecord> {
        self.index.get(path)
    }

    /// Check if an entry exists.
    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.entry(path).is_some()
    }

    /// Read entry contents by path - handles decryption and decompression.
    pub fn extract(&self, path: &str) -> Result<Vec<u8>> {
        let entry = self
            .entry(path)
            .ok_or_else(|| Error::EntryNotFound(path.to_string()))?;
        self.extract_entry(entry)
    }

    /// Read entry contents.
    ///
    /// Decrypts (when flagged) before decompressing, then checks the content
    /// digest. No bytes are returned unless every step succeeds.
    pub fn extract_entry(&self, entry: &EntryRecord) -> Result<Vec<u8>> {
        trace!(
            path = entry.path(),
            size = entry.uncompressed_size(),
            method = entry.compression_method().name(),
            encrypted = entry.is_encrypted(),
            blocks = entry.block_count(),
            "extracting entry"
        );

        let stored = self.stored_bytes(entry)?;

        let decrypted;
        let payload = if entry.is_encrypted() {
            let key = self.options.aes_key().ok_or_else(|| {
                Error::Decryption(format!(
                    "'{}' is encrypted but no key was supplied",
                    entry.path()
                ))
            })?;
            decrypted = crypto::decrypt(stored, key)?;
            decrypted.as_slice()
        } else {
            stored
        };

        let expected_size = usize::try_from(entry.uncompressed_size()).map_err(|_| {
            Error::Decompression(format!(
                "'{}' declares {} bytes, more than fits in memory",
                entry.path(),
                entry.uncompressed_size()
            ))
        })?;

        let output = if entry.blocks().is_empty() {
            decompress::decompress(payload, entry.compression_method(), expected_size)?
        } else {
            decompress::decompress_blocks(payload, entry.blocks(), entry.compression_method())?
        };

        let actual = Sha1Digest::compute(&output);
        if actual != entry.content_digest() {
            return Err(Error::ContentIntegrity {
                path: entry.path().to_string(),
                expected: entry.content_digest(),
                actual,
            });
        }

        Ok(output)
    }

    /// Parallel extraction of multiple entries.
    ///
    /// Results are returned in the order of `paths`.
    #[cfg(feature = "parallel")]
    pub fn extract_many<S: AsRef<str> + Sync>(&self, paths: &[S]) -> Vec<Result<Vec<u8>>> {
        use rayon::prelude::*;

        paths
            .par_iter()
            .map(|path| self.extract(path.as_ref()))
            .collect()
    }

    /// Summary figures over all entries.
    pub fn stats(&self) -> ArchiveStats {
        self.entries().iter().fold(
            ArchiveStats::default(),
            |mut stats, entry| {
                stats.entries += 1;
                stats.encrypted_entries += usize::from(entry.is_encrypted());
                stats.block_entries += usize::from(entry.block_count() > 0);
                stats.compressed_bytes += entry.compressed_size();
                stats.uncompressed_bytes += entry.uncompressed_size();
                stats
            },
        )
    }

    // Internal methods

    fn stored_bytes(&self, entry: &EntryRecord) -> Result<&[u8]> {
        // Index construction already rejects ranges past the end of the source.
        let mut reader = BinaryReader::new(self.source.as_bytes());
        reader.seek(entry.offset())?;
        let size = usize::try_from(entry.compressed_size()).map_err(|_| {
            Error::CorruptIndex(format!("'{}' stored size does not fit in memory", entry.path()))
        })?;
        Ok(reader.read_bytes(size)?)
    }
}

impl std::fmt::Debug for PakArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PakArchive")
            .field("name", &self.name)
            .field("version", &self.header.version)
            .field("entries", &self.index.len())
            .finish()
    }
}
