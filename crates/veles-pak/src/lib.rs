//! PAK archive reader for Fortnite game files.
//!
//! A PAK archive is a fixed header, a run of entry payloads and a file index
//! that maps normalized paths to those payloads. It supports:
//!
//! - Format versions 1500 through 1550
//! - AES-256-CBC encryption of the index and of individual entries
//! - Zlib, raw DEFLATE and Zstandard compression
//! - Entries split into independently compressed blocks
//! - SHA-1 integrity digests for the index and for every entry
//!
//! Archives are memory-mapped and immutable once opened, so extraction can
//! run from many threads at once. Multi-block entries are decompressed in
//! parallel with rayon (with the `parallel` feature).
//!
//! # Example
//!
//! ```no_run
//! use veles_pak::{AesKey, OpenOptions, PakArchive};
//!
//! let key: AesKey = "0x2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a".parse()?;
//! let archive = PakArchive::open_with("pakchunk10-WindowsClient.pak", OpenOptions::new().key(key))?;
//!
//! for entry in archive.entries() {
//!     println!("{}: {} bytes", entry.path(), entry.uncompressed_size());
//! }
//!
//! let data = archive.extract("FortniteGame/Content/Weapons/boom_sniper.uasset")?;
//! # Ok::<(), veles_pak::Error>(())
//! ```

mod archive;
pub mod crypto;
pub mod decompress;
mod entry;
mod error;
pub mod format;
mod handle;
mod header;
mod index;
mod options;
mod source;
#[cfg(test)]
mod testutil;

pub use archive::{ArchiveStats, PakArchive};
pub use crypto::AesKey;
pub use entry::{CompressionBlock, EntryRecord};
pub use error::{Error, ErrorKind, Result};
pub use format::{CompressionMethod, PathCase, PAK_MAGIC};
pub use handle::{HandleState, PakHandle};
pub use header::PakHeader;
pub use index::PakIndex;
pub use options::{IntegrityPolicy, OpenOptions};
pub use source::{ArchiveSource, PakSource};
