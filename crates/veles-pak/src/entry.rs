//! PAK archive entry.

use std::path::{Path, PathBuf};

use veles_common::Sha1Digest;

use crate::format::CompressionMethod;

/// One independently compressed chunk of an entry's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompressionBlock {
    /// Bytes the block occupies in the (decrypted) payload.
    pub compressed_len: u32,
    /// Bytes the block expands to.
    pub uncompressed_len: u32,
}

/// An entry (file) within a PAK archive.
///
/// This contains metadata about the file, not the file data itself.
/// Use [`PakArchive::extract`](crate::PakArchive::extract) to get the actual
/// file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntryRecord {
    /// Normalized path within the archive.
    path: String,
    /// Offset of the stored payload.
    offset: u64,
    /// Stored size in bytes (ciphertext size when encrypted).
    compressed_size: u64,
    /// Uncompressed size in bytes.
    uncompressed_size: u64,
    /// Effective compression method (header default already applied).
    compression_method: CompressionMethod,
    /// SHA-1 of the uncompressed bytes.
    content_digest: Sha1Digest,
    /// Whether the payload is encrypted.
    encrypted: bool,
    /// Compression blocks; empty for a single stream.
    blocks: Vec<CompressionBlock>,
}

impl EntryRecord {
    /// Create a new entry record.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        path: String,
        offset: u64,
        compressed_size: u64,
        uncompressed_size: u64,
        compression_method: CompressionMethod,
        content_digest: Sha1Digest,
        encrypted: bool,
        blocks: Vec<CompressionBlock>,
    ) -> Self {
        Self {
            path,
            offset,
            compressed_size,
            uncompressed_size,
            compression_method,
            content_digest,
            encrypted,
            blocks,
        }
    }

    /// Get the normalized path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the offset of the stored payload.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Get the stored size in bytes.
    #[inline]
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Get the uncompressed size in bytes.
    #[inline]
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Get the compression method.
    #[inline]
    pub fn compression_method(&self) -> CompressionMethod {
        self.compression_method
    }

    /// Get the SHA-1 of the uncompressed bytes.
    #[inline]
    pub fn content_digest(&self) -> Sha1Digest {
        self.content_digest
    }

    /// Check if the entry is encrypted.
    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Number of compression blocks (0 for a single stream).
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get the compression blocks.
    #[inline]
    pub fn blocks(&self) -> &[CompressionBlock] {
        &self.blocks
    }

    /// Byte range of the stored payload within the archive.
    #[inline]
    pub fn stored_range(&self) -> std::ops::Range<u64> {
        self.offset..self.offset + self.compressed_size
    }

    /// Get the relative output path for extraction.
    ///
    /// Index paths are untrusted. Returns `None` when a component could
    /// leave the output directory (`.`, `..`, or a drive or stream prefix).
    pub fn output_path(&self) -> Option<PathBuf> {
        let mut out = PathBuf::new();
        for component in self.path.split('/') {
            if matches!(component, "" | "." | "..") || component.contains(':') {
                return None;
            }
            out.push(component);
        }
        Some(out)
    }

    /// Get the file name, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|n| !n.is_empty())
    }

    /// Get the file name without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        Path::new(&self.path).file_stem().and_then(|s| s.to_str())
    }

    /// Get the file extension, if any.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}
