//! PAK on-disk format structures.
//!
//! This module contains the low-level packed structures of the container and
//! the small enums that give their raw fields meaning. All integers are
//! little-endian.

mod header;
mod record;

pub use header::RawPakHeader;
pub use record::{RawBlock, RawEntryRecord};

/// Signature at offset 0 of every archive.
pub const PAK_MAGIC: [u8; 4] = *b"PAK\0";

/// Oldest supported format version (v15.00).
pub const MIN_VERSION: u32 = 1500;

/// Newest supported format version (v15.50).
pub const MAX_VERSION: u32 = 1550;

/// First version whose index stores case-preserving paths.
pub const CASE_PRESERVING_VERSION: u32 = 1510;

/// Size of the fixed header including the magic.
pub const HEADER_SIZE: usize = PAK_MAGIC.len() + std::mem::size_of::<RawPakHeader>();

/// Entry method tag meaning "use the archive default".
pub const METHOD_INHERIT: u32 = u32::MAX;

/// Compression methods used in PAK archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u32)]
pub enum CompressionMethod {
    /// No compression (stored).
    None = 0,
    /// zlib-wrapped DEFLATE.
    Zlib = 1,
    /// Raw DEFLATE.
    Deflate = 8,
    /// Zstandard.
    Zstd = 100,
}

impl CompressionMethod {
    /// Short lowercase name used in listings.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zlib => "zlib",
            Self::Deflate => "deflate",
            Self::Zstd => "zstd",
        }
    }
}

impl TryFrom<u32> for CompressionMethod {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Zlib),
            8 => Ok(Self::Deflate),
            100 => Ok(Self::Zstd),
            other => Err(other),
        }
    }
}

/// Case policy applied to index paths, fixed by format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCase {
    /// Paths are folded to lowercase.
    Lowercase,
    /// Paths keep the case stored in the index.
    Preserve,
}

impl PathCase {
    /// Case policy for a format version.
    pub fn for_version(version: u32) -> Self {
        if version < CASE_PRESERVING_VERSION {
            Self::Lowercase
        } else {
            Self::Preserve
        }
    }
}

/// Normalize an archive-internal path.
///
/// Backslashes become forward slashes, leading and repeated separators are
/// dropped, and the case policy is applied.
pub fn normalize_path(path: &str, case: PathCase) -> String {
    let mut normalized = String::with_capacity(path.len());
    for component in path.split(['/', '\\']).filter(|c| !c.is_empty()) {
        if !normalized.is_empty() {
            normalized.push('/');
        }
        normalized.push_str(component);
    }

    match case {
        PathCase::Lowercase => normalized.to_lowercase(),
        PathCase::Preserve => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 49);
    }

    #[test]
    fn test_method_tags() {
        assert_eq!(CompressionMethod::try_from(0), Ok(CompressionMethod::None));
        assert_eq!(CompressionMethod::try_from(100), Ok(CompressionMethod::Zstd));
        assert_eq!(CompressionMethod::try_from(7), Err(7));
        assert_eq!(CompressionMethod::try_from(METHOD_INHERIT), Err(METHOD_INHERIT));
    }

    #[test]
    fn test_separator_styles_collapse() {
        let a = normalize_path(r"\FortniteGame\Content\UI\icon.uasset", PathCase::Preserve);
        let b = normalize_path("FortniteGame//Content/UI/icon.uasset", PathCase::Preserve);
        assert_eq!(a, "FortniteGame/Content/UI/icon.uasset");
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_policy() {
        assert_eq!(PathCase::for_version(1500), PathCase::Lowercase);
        assert_eq!(PathCase::for_version(1520), PathCase::Preserve);
        assert_eq!(
            normalize_path("Game/Maps/Apollo.umap", PathCase::Lowercase),
            "game/maps/apollo.umap"
        );
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(normalize_path("///", PathCase::Preserve), "");
    }
}
