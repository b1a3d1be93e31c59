//! Archive index: the ordered path → entry table.

use std::borrow::Cow;
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use veles_common::{BinaryReader, Sha1Digest};

use crate::crypto;
use crate::entry::{CompressionBlock, EntryRecord};
use crate::format::{
    normalize_path, CompressionMethod, PathCase, RawBlock, RawEntryRecord, METHOD_INHERIT,
};
use crate::header::PakHeader;
use crate::options::{IntegrityPolicy, OpenOptions};
use crate::{Error, Result};

/// The parsed file index.
///
/// Entries keep the order they appear in the stored index; lookups go
/// through a hash map keyed by normalized path. Owns no file content.
#[derive(Debug, Clone)]
pub struct PakIndex {
    entries: Vec<EntryRecord>,
    lookup: FxHashMap<String, usize>,
    case: PathCase,
}

impl PakIndex {
    /// Build the index described by `header` from the archive bytes behind
    /// `reader`.
    ///
    /// The digest check runs after parsing and covers the blob as stored
    /// (before decryption).
    pub fn build(
        reader: &mut BinaryReader<'_>,
        header: &PakHeader,
        options: &OpenOptions,
    ) -> Result<Self> {
        let archive_len = reader.len() as u64;

        reader.seek(header.index_offset)?;
        let index_size = usize::try_from(header.index_size).map_err(|_| {
            Error::CorruptIndex(format!("index size {} does not fit in memory", header.index_size))
        })?;
        let stored = reader.read_bytes(index_size)?;

        let blob: Cow<'_, [u8]> = if header.encrypted {
            let key = options.aes_key().ok_or_else(|| {
                Error::Decryption("index is encrypted but no key was supplied".to_string())
            })?;
            Cow::Owned(crypto::decrypt(stored, key)?)
        } else {
            Cow::Borrowed(stored)
        };

        let index = Self::parse(&blob, header, archive_len)?;

        let actual = Sha1Digest::compute(stored);
        if actual != header.index_digest {
            match options.integrity_policy() {
                IntegrityPolicy::Enforce => {
                    return Err(Error::IndexIntegrity {
                        expected: header.index_digest,
                        actual,
                    });
                }
                IntegrityPolicy::Warn => {
                    warn!(
                        expected = %header.index_digest,
                        %actual,
                        "index digest mismatch, continuing"
                    );
                }
            }
        }

        debug!(
            entries = index.len(),
            index_size = header.index_size,
            encrypted = header.encrypted,
            "built index"
        );

        Ok(index)
    }

    /// Parse a plaintext index blob.
    fn parse(blob: &[u8], header: &PakHeader, archive_len: u64) -> Result<Self> {
        let case = header.path_case();
        let mut reader = BinaryReader::new(blob);
        let mut entries = Vec::new();
        let mut lookup = FxHashMap::default();

        while !reader.is_empty() {
            let position = reader.position();
            let record = Self::read_record(&mut reader, header, archive_len, case).map_err(|e| match e {
                Error::Common(inner) => Error::CorruptIndex(format!(
                    "record {} at index offset {position}: {inner}",
                    entries.len()
                )),
                other => other,
            })?;

            match lookup.entry(record.path().to_string()) {
                Entry::Occupied(_) => {
                    return Err(Error::CorruptIndex(format!(
                        "duplicate path '{}'",
                        record.path()
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                }
            }
            entries.push(record);
        }

        Ok(Self {
            entries,
            lookup,
            case,
        })
    }

    fn read_record(
        reader: &mut BinaryReader<'_>,
        header: &PakHeader,
        archive_len: u64,
        case: PathCase,
    ) -> Result<EntryRecord> {
        let raw_path = reader.read_prefixed_str()?;
        let path = normalize_path(raw_path, case);
        if path.is_empty() {
            return Err(Error::CorruptIndex(format!("empty path '{raw_path}'")));
        }

        let raw: RawEntryRecord = reader.read_struct()?;
        let offset = raw.offset;
        let compressed_size = raw.compressed_size;
        let uncompressed_size = raw.uncompressed_size;
        let method_tag = raw.compression_method;
        let encrypted = raw.encrypted != 0;
        let block_count = raw.block_count as usize;

        let compression_method = if method_tag == METHOD_INHERIT {
            header.compression
        } else {
            CompressionMethod::try_from(method_tag).map_err(Error::UnsupportedCompression)?
        };

        match offset.checked_add(compressed_size) {
            Some(end) if end <= archive_len => {}
            _ => {
                return Err(Error::CorruptIndex(format!(
                    "'{path}' spans {offset}+{compressed_size} but archive is {archive_len} bytes"
                )));
            }
        }

        // Refuse counts the remaining index could not possibly hold before
        // allocating for them.
        let block_size = std::mem::size_of::<RawBlock>();
        if block_count > reader.remaining() / block_size {
            return Err(Error::CorruptIndex(format!(
                "'{path}' declares {block_count} blocks but only {} index bytes remain",
                reader.remaining()
            )));
        }

        let mut blocks = Vec::with_capacity(block_count);
        for _ in 0..block_count {
            let raw_block: RawBlock = reader.read_struct()?;
            blocks.push(CompressionBlock {
                compressed_len: raw_block.compressed_len,
                uncompressed_len: raw_block.uncompressed_len,
            });
        }

        if !blocks.is_empty() {
            let total_out: u64 = blocks.iter().map(|b| u64::from(b.uncompressed_len)).sum();
            if total_out != uncompressed_size {
                return Err(Error::CorruptIndex(format!(
                    "'{path}' blocks expand to {total_out} bytes, entry declares {uncompressed_size}"
                )));
            }

            let total_in: u64 = blocks.iter().map(|b| u64::from(b.compressed_len)).sum();
            if !encrypted && total_in != compressed_size {
                return Err(Error::CorruptIndex(format!(
                    "'{path}' blocks cover {total_in} bytes, entry stores {compressed_size}"
                )));
            }
        }

        if blocks.is_empty()
            && !encrypted
            && compression_method == CompressionMethod::None
            && compressed_size != uncompressed_size
        {
            return Err(Error::CorruptIndex(format!(
                "'{path}' is stored uncompressed but declares {uncompressed_size} bytes for {compressed_size} stored"
            )));
        }

        Ok(EntryRecord::new(
            path,
            offset,
            compressed_size,
            uncompressed_size,
            compression_method,
            Sha1Digest::from_bytes(raw.sha1),
            encrypted,
            blocks,
        ))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order.
    #[inline]
    pub fn entries(&self) -> &[EntryRecord] {
        &self.entries
    }

    /// Case policy the paths were normalized with.
    #[inline]
    pub fn path_case(&self) -> PathCase {
        self.case
    }

    /// Look up an entry, normalizing `path` the same way index paths were.
    pub fn get(&self, path: &str) -> Option<&EntryRecord> {
        let key = normalize_path(path, self.case);
        self.lookup.get(&key).map(|&i| &self.entries[i])
    }

    /// Normalized paths in index order.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(EntryRecord::path)
    }
}
