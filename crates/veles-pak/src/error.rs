//! Error types for the PAK crate.

use std::sync::Arc;

use thiserror::Error;
use veles_common::Sha1Digest;

/// Errors that can occur when working with PAK archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] veles_common::Error),

    /// The source does not start with the PAK signature.
    #[error("not a PAK archive: expected magic {expected:02x?}, got {actual:02x?}", expected = crate::PAK_MAGIC)]
    NotAnArchive { actual: Vec<u8> },

    /// Format version outside the supported window.
    #[error("unsupported PAK version {version} (supported {min}..={max})")]
    UnsupportedVersion { version: u32, min: u32, max: u32 },

    /// The file index is malformed.
    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    /// Unknown compression method tag.
    #[error("unsupported compression method: {0}")]
    UnsupportedCompression(u32),

    /// The stored index does not hash to the header digest.
    #[error("index digest mismatch: expected {expected}, got {actual}")]
    IndexIntegrity {
        expected: Sha1Digest,
        actual: Sha1Digest,
    },

    /// Entry not found.
    #[error("entry not found: {0}")]
    EntryNotFound(String),

    /// Decryption error.
    #[error("decryption error: {0}")]
    Decryption(String),

    /// Key material could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Extracted bytes do not hash to the recorded content digest.
    #[error("content digest mismatch for {path}: expected {expected}, got {actual}")]
    ContentIntegrity {
        path: String,
        expected: Sha1Digest,
        actual: Sha1Digest,
    },

    /// The handle has not been opened yet.
    #[error("archive handle has not been opened")]
    NotOpened,

    /// The handle failed to open; carries the original failure.
    #[error("archive failed to open: {0}")]
    Failed(Arc<Error>),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotAnArchive,
    UnsupportedVersion,
    OutOfBounds,
    InvalidOffset,
    CorruptIndex,
    IndexIntegrityError,
    NotFound,
    DecryptionFailed,
    DecompressionFailed,
    ContentIntegrityError,
    Io,
    NotOpened,
}

impl Error {
    /// Get the kind of this error.
    ///
    /// [`Error::Failed`] reports the kind of the failure it wraps.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::Common(err) => match err {
                veles_common::Error::OutOfBounds { .. } => ErrorKind::OutOfBounds,
                veles_common::Error::InvalidOffset { .. } => ErrorKind::InvalidOffset,
                veles_common::Error::Utf8(_) => ErrorKind::CorruptIndex,
            },
            Self::NotAnArchive { .. } => ErrorKind::NotAnArchive,
            Self::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            Self::CorruptIndex(_) | Self::UnsupportedCompression(_) => ErrorKind::CorruptIndex,
            Self::IndexIntegrity { .. } => ErrorKind::IndexIntegrityError,
            Self::EntryNotFound(_) => ErrorKind::NotFound,
            Self::Decryption(_) | Self::InvalidKey(_) => ErrorKind::DecryptionFailed,
            Self::Decompression(_) => ErrorKind::DecompressionFailed,
            Self::ContentIntegrity { .. } => ErrorKind::ContentIntegrityError,
            Self::NotOpened => ErrorKind::NotOpened,
            Self::Failed(inner) => inner.kind(),
        }
    }
}

/// Result type for PAK operations.
pub type Result<T> = std::result::Result<T, Error>;
