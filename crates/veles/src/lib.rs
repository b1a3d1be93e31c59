//! Veles - PAK game archive reading and asset classification library.
//!
//! This crate provides a unified interface to the Veles library ecosystem.
//!
//! # Crates
//!
//! - [`veles_common`] - Common utilities (binary reading, SHA-1 digests)
//! - [`veles_pak`] - PAK archive reading (AES + zlib/deflate/zstd)
//! - [`veles_assets`] - Asset classification, naming tables and PAK discovery
//!
//! # Example
//!
//! ```no_run
//! use veles::prelude::*;
//!
//! // Open a PAK archive
//! let archive = PakArchive::open("pakchunk10-WindowsClient.pak")?;
//!
//! // Group its contents and extract the exotic weapons
//! let catalog = AssetCatalog::from_archive(&archive, &ClassifierTable::fortnite(), &NamingTables::season5());
//! for weapon in catalog.exotic_weapons() {
//!     let data = archive.extract(&weapon.path)?;
//!     println!("{}: {} bytes", weapon.name, data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use veles_assets as assets;
pub use veles_common as common;
pub use veles_pak as pak;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use veles_assets::{classify, AssetCatalog, AssetCategory, ClassifierTable, NamingTables};
    pub use veles_common::{BinaryReader, Sha1Digest};
    pub use veles_pak::{
        AesKey, EntryRecord, ErrorKind, IntegrityPolicy, OpenOptions, PakArchive, PakHandle,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
