//! Decompression utilities for PAK archives.
//!
//! Decoders read at most one byte past the declared output size, so a stream
//! that is shorter or longer than declared fails without allocating past it.
//! The declared size is untrusted: the initial allocation is capped by what
//! the compressed input could plausibly expand to, and the buffer only grows
//! with bytes the decoder actually produced.

use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};
use tracing::trace;

use crate::entry::CompressionBlock;
use crate::format::CompressionMethod;
use crate::{Error, Result};

/// Upper bound on the up-front allocation per compressed input byte.
///
/// DEFLATE tops out at roughly 1032:1; larger outputs grow on demand.
const MAX_PREALLOC_RATIO: usize = 1032;

/// Decompress one stream of `method`-compressed data.
///
/// [`CompressionMethod::None`] returns the input unchanged after checking its
/// length against `expected_size`.
pub fn decompress(data: &[u8], method: CompressionMethod, expected_size: usize) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::None => {
            if data.len() != expected_size {
                return Err(Error::Decompression(format!(
                    "stored size mismatch: expected {expected_size}, got {}",
                    data.len()
                )));
            }
            Ok(data.to_vec())
        }
        CompressionMethod::Zlib => {
            read_sized(ZlibDecoder::new(data), method, data.len(), expected_size)
        }
        CompressionMethod::Deflate => {
            read_sized(DeflateDecoder::new(data), method, data.len(), expected_size)
        }
        CompressionMethod::Zstd => {
            let decoder = zstd::Decoder::new(data)
                .map_err(|e| Error::Decompression(format!("zstd: {e}")))?;
            read_sized(decoder, method, data.len(), expected_size)
        }
    }
}

/// Decompress a payload split into independently compressed blocks.
///
/// Blocks are laid out back to back in declared order. The output is the
/// concatenation of every block's output in that same order, whatever order
/// the blocks finish in. A failure in any block fails the whole call.
pub fn decompress_blocks(
    payload: &[u8],
    blocks: &[CompressionBlock],
    method: CompressionMethod,
) -> Result<Vec<u8>> {
    let covered: u64 = blocks.iter().map(|b| u64::from(b.compressed_len)).sum();
    if covered != payload.len() as u64 {
        return Err(Error::Decompression(format!(
            "block layout covers {covered} bytes but payload is {} bytes",
            payload.len()
        )));
    }

    let mut jobs = Vec::with_capacity(blocks.len());
    let mut start = 0usize;
    for block in blocks {
        let end = start + block.compressed_len as usize;
        jobs.push((&payload[start..end], block.uncompressed_len as usize));
        start = end;
    }

    trace!(blocks = jobs.len(), method = method.name(), "decompressing blocks");

    #[cfg(feature = "parallel")]
    let parts: Vec<Vec<u8>> = {
        use rayon::prelude::*;

        jobs.par_iter()
            .map(|&(data, size)| decompress(data, method, size))
            .collect::<Result<_>>()?
    };

    #[cfg(not(feature = "parallel"))]
    let parts: Vec<Vec<u8>> = jobs
        .iter()
        .map(|&(data, size)| decompress(data, method, size))
        .collect::<Result<_>>()?;

    let total = parts.iter().map(Vec::len).sum();
    let mut output = Vec::with_capacity(total);
    for part in parts {
        output.extend_from_slice(&part);
    }
    Ok(output)
}

fn read_sized<R: Read>(
    decoder: R,
    method: CompressionMethod,
    compressed_len: usize,
    expected_size: usize,
) -> Result<Vec<u8>> {
    let capacity = expected_size.min(compressed_len.saturating_mul(MAX_PREALLOC_RATIO));
    let mut output = Vec::with_capacity(capacity);

    let limit = (expected_size as u64).saturating_add(1);
    decoder
        .take(limit)
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(format!("{}: {e}", method.name())))?;

    match output.len().cmp(&expected_size) {
        std::cmp::Ordering::Equal => Ok(output),
        std::cmp::Ordering::Greater => Err(Error::Decompression(format!(
            "{}: output exceeds declared size of {expected_size} bytes",
            method.name()
        ))),
        std::cmp::Ordering::Less => Err(Error::Decompression(format!(
            "{}: stream ended after {} of {expected_size} bytes",
            method.name(),
            output.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::compress;
    use crate::ErrorKind;

    const TEXT: &[u8] = b"Hello, Veles! This is a test of PAK decompression. \
        Hello, Veles! This is a test of PAK decompression.";

    #[test]
    fn test_roundtrip_all_methods() {
        for method in [
            CompressionMethod::None,
            CompressionMethod::Zlib,
            CompressionMethod::Deflate,
            CompressionMethod::Zstd,
        ] {
            let compressed = compress(TEXT, method);
            let decompressed = decompress(&compressed, method, TEXT.len()).unwrap();
            assert_eq!(decompressed, TEXT, "{method:?}");
        }
    }

    #[test]
    fn test_none_size_mismatch() {
        let err = decompress(TEXT, CompressionMethod::None, TEXT.len() + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecompressionFailed);
    }

    #[test]
    fn test_declared_size_too_small() {
        for method in [CompressionMethod::Zlib, CompressionMethod::Deflate, CompressionMethod::Zstd] {
            let compressed = compress(TEXT, method);
            let err = decompress(&compressed, method, TEXT.len() - 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DecompressionFailed, "{method:?}");
        }
    }

    #[test]
    fn test_declared_size_too_large() {
        for method in [CompressionMethod::Zlib, CompressionMethod::Deflate, CompressionMethod::Zstd] {
            let compressed = compress(TEXT, method);
            let err = decompress(&compressed, method, TEXT.len() + 10).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DecompressionFailed, "{method:?}");
        }
    }

    #[test]
    fn test_huge_declared_size_fails_cleanly() {
        let compressed = compress(b"tiny", CompressionMethod::Zlib);
        let err = decompress(&compressed, CompressionMethod::Zlib, 1 << 46).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecompressionFailed);

        let compressed = compress(b"tiny", CompressionMethod::Zstd);
        let err = decompress(&compressed, CompressionMethod::Zstd, usize::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecompressionFailed);
    }

    #[test]
    fn test_malformed_stream() {
        let garbage = [0xFFu8; 32];
        assert!(decompress(&garbage, CompressionMethod::Zlib, 16).is_err());
        assert!(decompress(&garbage, CompressionMethod::Zstd, 16).is_err());
    }

    #[test]
    fn test_blocks_concatenate_in_order() {
        let chunks: [&[u8]; 3] = [b"first block ", b"second block ", b"third"];
        let mut payload = Vec::new();
        let mut blocks = Vec::new();
        for chunk in chunks {
            let compressed = compress(chunk, CompressionMethod::Zstd);
            blocks.push(CompressionBlock {
                compressed_len: compressed.len() as u32,
                uncompressed_len: chunk.len() as u32,
            });
            payload.extend_from_slice(&compressed);
        }

        let output = decompress_blocks(&payload, &blocks, CompressionMethod::Zstd).unwrap();
        assert_eq!(output, b"first block second block third");
    }

    #[test]
    fn test_blocks_failure_aborts() {
        let good = compress(b"good", CompressionMethod::Zlib);
        let mut payload = good.clone();
        payload.extend_from_slice(&[0u8; 8]);
        let blocks = [
            CompressionBlock {
                compressed_len: good.len() as u32,
                uncompressed_len: 4,
            },
            CompressionBlock {
                compressed_len: 8,
                uncompressed_len: 4,
            },
        ];

        let err = decompress_blocks(&payload, &blocks, CompressionMethod::Zlib).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecompressionFailed);
    }

    #[test]
    fn test_blocks_layout_mismatch() {
        let blocks = [CompressionBlock {
            compressed_len: 10,
            uncompressed_len: 10,
        }];
        let err = decompress_blocks(&[0u8; 12], &blocks, CompressionMethod::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecompressionFailed);
    }
}
