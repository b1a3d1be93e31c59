//! Options applied when opening an archive.

use crate::crypto::AesKey;

/// What to do when the stored index does not match the header digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegrityPolicy {
    /// Fail the open with an index integrity error.
    #[default]
    Enforce,
    /// Log a warning and keep the parsed index.
    Warn,
}

/// Configuration for [`PakArchive`](crate::PakArchive) and
/// [`PakHandle`](crate::PakHandle).
///
/// # Example
///
/// ```
/// use veles_pak::{AesKey, IntegrityPolicy, OpenOptions};
///
/// let options = OpenOptions::new()
///     .key(AesKey::from_bytes([0x2a; 32]))
///     .index_integrity(IntegrityPolicy::Warn);
/// assert!(options.aes_key().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    key: Option<AesKey>,
    index_integrity: IntegrityPolicy,
}

impl OpenOptions {
    /// Default options: no key, index integrity enforced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the key used for encrypted entries and encrypted indexes.
    pub fn key(mut self, key: AesKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the index integrity policy.
    pub fn index_integrity(mut self, policy: IntegrityPolicy) -> Self {
        self.index_integrity = policy;
        self
    }

    /// Get the configured key.
    #[inline]
    pub fn aes_key(&self) -> Option<&AesKey> {
        self.key.as_ref()
    }

    /// Get the index integrity policy.
    #[inline]
    pub fn integrity_policy(&self) -> IntegrityPolicy {
        self.index_integrity
    }
}
