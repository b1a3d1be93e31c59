//! Test-only archive builder.

use std::io::Write;

use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use veles_common::Sha1Digest;
use zerocopy::IntoBytes;

use crate::crypto::{self, AesKey};
use crate::format::{CompressionMethod, RawBlock, RawEntryRecord, RawPakHeader, HEADER_SIZE, METHOD_INHERIT, PAK_MAGIC};

pub(crate) fn compress(data: &[u8], method: CompressionMethod) -> Vec<u8> {
    match method {
        CompressionMethod::None => data.to_vec(),
        CompressionMethod::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionMethod::Deflate => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionMethod::Zstd => zstd::encode_all(data, 3).unwrap(),
    }
}

pub(crate) struct TestEntry {
    path: String,
    data: Vec<u8>,
    method: CompressionMethod,
    method_tag: Option<u32>,
    encrypted: bool,
    block_size: Option<usize>,
    corrupt_digest: bool,
    offset: Option<u64>,
    uncompressed_size: Option<u64>,
}

impl TestEntry {
    pub(crate) fn new(path: &str, data: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            data: data.to_vec(),
            method: CompressionMethod::None,
            method_tag: None,
            encrypted: false,
            block_size: None,
            corrupt_digest: false,
            offset: None,
            uncompressed_size: None,
        }
    }

    pub(crate) fn method(mut self, method: CompressionMethod) -> Self {
        self.method = method;
        self
    }

    /// Write an arbitrary method tag into the record.
    pub(crate) fn raw_method(mut self, tag: u32) -> Self {
        self.method_tag = Some(tag);
        self
    }

    /// Compress with the archive default and record the inherit tag.
    pub(crate) fn inherit_method(mut self) -> Self {
        self.method_tag = Some(METHOD_INHERIT);
        self
    }

    pub(crate) fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    pub(crate) fn blocks(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    pub(crate) fn corrupt_digest(mut self) -> Self {
        self.corrupt_digest = true;
        self
    }

    pub(crate) fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub(crate) fn uncompressed_size(mut self, size: u64) -> Self {
        self.uncompressed_size = Some(size);
        self
    }
}

pub(crate) struct PakBuilder {
    version: u32,
    default_method: CompressionMethod,
    key: Option<AesKey>,
    encrypt_index: bool,
    corrupt_index_digest: bool,
    trailing_index_bytes: Vec<u8>,
    index_offset: Option<u64>,
    entries: Vec<TestEntry>,
}

impl PakBuilder {
    pub(crate) fn new() -> Self {
        Self {
            version: 1520,
            default_method: CompressionMethod::None,
            key: None,
            encrypt_index: false,
            corrupt_index_digest: false,
            trailing_index_bytes: Vec::new(),
            index_offset: None,
            entries: Vec::new(),
        }
    }

    pub(crate) fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub(crate) fn default_method(mut self, method: CompressionMethod) -> Self {
        self.default_method = method;
        self
    }

    pub(crate) fn key(mut self, key: AesKey) -> Self {
        self.key = Some(key);
        self
    }

    pub(crate) fn encrypt_index(mut self) -> Self {
        self.encrypt_index = true;
        self
    }

    pub(crate) fn corrupt_index_digest(mut self) -> Self {
        self.corrupt_index_digest = true;
        self
    }

    pub(crate) fn trailing_index_bytes(mut self, bytes: &[u8]) -> Self {
        self.trailing_index_bytes = bytes.to_vec();
        self
    }

    pub(crate) fn index_offset(mut self, offset: u64) -> Self {
        self.index_offset = Some(offset);
        self
    }

    pub(crate) fn entry(mut self, entry: TestEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE];
        let mut index = Vec::new();

        for entry in &self.entries {
            let method = match entry.method_tag {
                Some(METHOD_INHERIT) => self.default_method,
                _ => entry.method,
            };

            let mut blocks = Vec::new();
            let mut payload = Vec::new();
            match entry.block_size {
                Some(size) => {
                    for chunk in entry.data.chunks(size) {
                        let compressed = compress(chunk, method);
                        blocks.push(RawBlock {
                            compressed_len: compressed.len() as u32,
                            uncompressed_len: chunk.len() as u32,
                        });
                        payload.extend_from_slice(&compressed);
                    }
                }
                None => payload = compress(&entry.data, method),
            }

            if entry.encrypted {
                let key = self.key.as_ref().expect("encrypted entry needs a builder key");
                payload = crypto::encrypt(&payload, key);
            }

            let offset = out.len() as u64;
            out.extend_from_slice(&payload);

            let mut sha1 = *Sha1Digest::compute(&entry.data).as_bytes();
            if entry.corrupt_digest {
                sha1[0] ^= 0xFF;
            }

            let record = RawEntryRecord {
                offset: entry.offset.unwrap_or(offset),
                compressed_size: payload.len() as u64,
                uncompressed_size: entry.uncompressed_size.unwrap_or(entry.data.len() as u64),
                compression_method: entry.method_tag.unwrap_or(method as u32),
                sha1,
                encrypted: u8::from(entry.encrypted),
                block_count: blocks.len() as u32,
            };

            index.extend_from_slice(&(entry.path.len() as u32).to_le_bytes());
            index.extend_from_slice(entry.path.as_bytes());
            index.extend_from_slice(record.as_bytes());
            for block in &blocks {
                index.extend_from_slice(block.as_bytes());
            }
        }

        index.extend_from_slice(&self.trailing_index_bytes);

        if self.encrypt_index {
            let key = self.key.as_ref().expect("encrypted index needs a builder key");
            index = crypto::encrypt(&index, key);
        }

        let mut index_sha1 = *Sha1Digest::compute(&index).as_bytes();
        if self.corrupt_index_digest {
            index_sha1[19] ^= 0xFF;
        }

        let header = RawPakHeader {
            version: self.version,
            index_offset: self.index_offset.unwrap_or(out.len() as u64),
            index_size: index.len() as u64,
            index_sha1,
            encrypted: u8::from(self.encrypt_index),
            compression_method: self.default_method as u32,
        };

        out.extend_from_slice(&index);
        out[..PAK_MAGIC.len()].copy_from_slice(&PAK_MAGIC);
        out[PAK_MAGIC.len()..HEADER_SIZE].copy_from_slice(header.as_bytes());
        out
    }
}
