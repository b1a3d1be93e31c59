//! Common utilities for Veles.
//!
//! This crate provides foundational types used across all Veles crates:
//!
//! - [`BinaryReader`] - Bounds-checked binary reading from borrowed byte slices
//! - [`Sha1Digest`] - The 20-byte digest used for index and content integrity
//! - [`digest`] - SHA-1 hashing helpers

mod error;
mod reader;

pub mod digest;

pub use digest::Sha1Digest;
pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export byteorder markers for explicit-endianness reads
pub use byteorder::{BigEndian, ByteOrder, LittleEndian};
