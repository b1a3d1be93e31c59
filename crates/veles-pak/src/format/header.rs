//! Archive header structure.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Archive header (without the magic).
///
/// The 4-byte magic (`PAK\0`) is read separately before this struct.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawPakHeader {
    /// Format version
    pub version: u32,
    /// Absolute offset of the index blob
    pub index_offset: u64,
    /// Stored length of the index blob
    pub index_size: u64,
    /// SHA-1 of the index blob as stored
    pub index_sha1: [u8; 20],
    /// Non-zero when the index blob is encrypted
    pub encrypted: u8,
    /// Default compression method tag
    pub compression_method: u32,
}
