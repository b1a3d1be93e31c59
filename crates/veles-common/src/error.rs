//! Error types for veles-common.

use thiserror::Error;

/// Common error type for Veles operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A read would run past the end of the buffer.
    #[error("read out of bounds at offset {offset}: needed {needed} bytes but only {available} available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A seek target lies beyond the end of the buffer.
    #[error("invalid offset {offset}: buffer is {len} bytes long")]
    InvalidOffset { offset: u64, len: usize },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
