//! Index record structures.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Fixed part of an index record.
///
/// Preceded in the index by the u32-length-prefixed path and followed by
/// `block_count` [`RawBlock`] descriptors.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawEntryRecord {
    /// Offset of the stored payload
    pub offset: u64,
    /// Stored payload size
    pub compressed_size: u64,
    /// Size after decompression
    pub uncompressed_size: u64,
    /// Compression method tag
    pub compression_method: u32,
    /// SHA-1 of the decompressed bytes
    pub sha1: [u8; 20],
    /// Non-zero when the payload is encrypted
    pub encrypted: u8,
    /// Number of compression blocks (0 = single stream)
    pub block_count: u32,
}

/// Compression block descriptor.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawBlock {
    /// Compressed length of the block
    pub compressed_len: u32,
    /// Decompressed length of the block
    pub uncompressed_len: u32,
}
