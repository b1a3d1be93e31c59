//! Parsed archive header.

use veles_common::{BinaryReader, Sha1Digest};

use crate::format::{
    CompressionMethod, PathCase, RawPakHeader, MAX_VERSION, MIN_VERSION, PAK_MAGIC,
};
use crate::{Error, Result};

/// The validated archive header.
///
/// Built once per opened source and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PakHeader {
    /// Format version, within `MIN_VERSION..=MAX_VERSION`.
    pub version: u32,
    /// Absolute offset of the index blob.
    pub index_offset: u64,
    /// Stored length of the index blob.
    pub index_size: u64,
    /// SHA-1 of the index blob as stored.
    pub index_digest: Sha1Digest,
    /// Whether the index blob is encrypted.
    pub encrypted: bool,
    /// Default compression method for entries that inherit it.
    pub compression: CompressionMethod,
}

impl PakHeader {
    /// Check the magic and version without reading the rest of the header.
    ///
    /// Returns the format version on success.
    pub fn probe(data: &[u8]) -> Result<u32> {
        let mut reader = BinaryReader::new(data);

        let magic = reader.read_bytes(PAK_MAGIC.len()).map_err(|_| Error::NotAnArchive {
            actual: data.to_vec(),
        })?;
        if magic != PAK_MAGIC {
            return Err(Error::NotAnArchive {
                actual: magic.to_vec(),
            });
        }

        let version = reader.read_u32()?;
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(Error::UnsupportedVersion {
                version,
                min: MIN_VERSION,
                max: MAX_VERSION,
            });
        }

        Ok(version)
    }

    /// Parse and validate the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::probe(data)?;

        let mut reader = BinaryReader::new(data);
        reader.skip(PAK_MAGIC.len())?;
        let raw: RawPakHeader = reader.read_struct()?;

        let method = raw.compression_method;
        let compression =
            CompressionMethod::try_from(method).map_err(Error::UnsupportedCompression)?;

        Ok(Self {
            version: raw.version,
            index_offset: raw.index_offset,
            index_size: raw.index_size,
            index_digest: Sha1Digest::from_bytes(raw.index_sha1),
            encrypted: raw.encrypted != 0,
            compression,
        })
    }

    /// Path case policy implied by the version.
    #[inline]
    pub fn path_case(&self) -> PathCase {
        PathCase::for_version(self.version)
    }
}
