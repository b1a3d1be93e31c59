//! Locating PAK archives in a game install.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Chunk numbers that carry season content.
pub const SEASON_CHUNKS: [u32; 5] = [0, 1, 2, 10, 11];

/// Recursively find every `*.pak` file under `dir`, sorted by path.
///
/// Unreadable directory entries are skipped with a warning.
pub fn find_pak_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut paks: Vec<PathBuf> = WalkDir::new(dir.as_ref())
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pak"))
        })
        .collect();

    paks.sort();
    debug!(dir = %dir.as_ref().display(), count = paks.len(), "found PAK files");
    paks
}

/// Parse the chunk number from a `pakchunkN...` file name.
pub fn chunk_number(file_name: &str) -> Option<u32> {
    let lower = file_name.to_ascii_lowercase();
    let rest = lower.strip_prefix("pakchunk")?;
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..digits].parse().ok()
}

/// Check if a file name belongs to the season content set.
///
/// Chunk numbers are compared exactly: `pakchunk12` is not `pakchunk1`.
pub fn is_season_chunk(file_name: &str) -> bool {
    chunk_number(file_name).is_some_and(|n| SEASON_CHUNKS.contains(&n))
        || file_name.to_ascii_lowercase().contains("optional")
}

/// Find the season PAK files under `dir`.
pub fn find_season_paks<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    find_pak_files(dir)
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_season_chunk)
        })
        .collect()
}
