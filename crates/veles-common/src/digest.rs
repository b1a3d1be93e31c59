//! SHA-1 hashing utilities.
//!
//! SHA-1 is used by PAK archives both for the index digest stored in the
//! header and for the per-entry content digest of decompressed bytes.

use std::fmt;

use sha1::{Digest, Sha1};

/// Length of a SHA-1 digest in bytes.
pub const SHA1_LEN: usize = 20;

/// A 20-byte SHA-1 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sha1Digest([u8; SHA1_LEN]);

impl Sha1Digest {
    /// Wrap raw digest bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; SHA1_LEN]) -> Self {
        Self(bytes)
    }

    /// Compute the digest of a byte slice.
    pub fn compute(data: &[u8]) -> Self {
        let mut out = [0u8; SHA1_LEN];
        out.copy_from_slice(&Sha1::digest(data));
        Self(out)
    }

    /// Get the raw digest bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; SHA1_LEN] {
        &self.0
    }

    /// Check whether `data` hashes to this digest.
    #[inline]
    pub fn matches(&self, data: &[u8]) -> bool {
        Self::compute(data) == *self
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1Digest({})", self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Sha1Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // FIPS 180 test vector
        assert_eq!(
            Sha1Digest::compute(b"abc").to_hex(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_empty_digest() {
        assert_eq!(
            Sha1Digest::compute(&[]).to_string(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_matches() {
        let digest = Sha1Digest::compute(b"payload");
        assert!(digest.matches(b"payload"));
        assert!(!digest.matches(b"payloaD"));
    }
}
