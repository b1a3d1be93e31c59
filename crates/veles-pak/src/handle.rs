//! Lazily opened archive handle.
//!
//! A [`PakHandle`] records where an archive lives and how to open it, and
//! only parses the header and index when [`PakHandle::open`] is called. A
//! failed open is remembered: later calls report the same error instead of
//! retrying.

use std::mem;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::archive::PakArchive;
use crate::entry::EntryRecord;
use crate::options::OpenOptions;
use crate::source::{ArchiveSource, PakSource};
use crate::{Error, Result};

/// Externally visible lifecycle of a [`PakHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Created, not opened yet
    Unopened,
    /// Open in progress
    Opening,
    /// Header and index are loaded
    Ready,
    /// Opening failed; the error is kept
    Failed,
}

enum Inner {
    Unopened {
        source: ArchiveSource,
        options: OpenOptions,
    },
    Opening,
    Ready(PakArchive),
    Failed(Arc<Error>),
}

/// Handle to an archive that is opened on demand.
pub struct PakHandle {
    inner: Inner,
}

impl PakHandle {
    /// Create a handle without touching the source.
    pub fn new(source: impl Into<ArchiveSource>, options: OpenOptions) -> Self {
        Self {
            inner: Inner::Unopened {
                source: source.into(),
                options,
            },
        }
    }

    /// Create a handle for a file path.
    pub fn from_path<P: AsRef<Path>>(path: P, options: OpenOptions) -> Self {
        Self::new(path.as_ref(), options)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HandleState {
        match self.inner {
            Inner::Unopened { .. } => HandleState::Unopened,
            Inner::Opening => HandleState::Opening,
            Inner::Ready(_) => HandleState::Ready,
            Inner::Failed(_) => HandleState::Failed,
        }
    }

    /// Check if the handle is ready for reads.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.inner, Inner::Ready(_))
    }

    /// Load the header and index.
    ///
    /// Opening a ready handle is a no-op. Opening a failed handle returns the
    /// error that failed it.
    pub fn open(&mut self) -> Result<&PakArchive> {
        self.inner = match mem::replace(&mut self.inner, Inner::Opening) {
            Inner::Unopened { source, options } => match open_source(source, options) {
                Ok(archive) => {
                    debug!(archive = archive.name(), entries = archive.len(), "handle ready");
                    Inner::Ready(archive)
                }
                Err(err) => {
                    warn!(error = %err, "failed to open archive");
                    Inner::Failed(Arc::new(err))
                }
            },
            settled => settled,
        };

        self.archive()
    }

    /// The opened archive.
    ///
    /// Fails with [`Error::NotOpened`] before [`open`](Self::open) has
    /// succeeded, or with the stored error after it failed.
    pub fn archive(&self) -> Result<&PakArchive> {
        match &self.inner {
            Inner::Ready(archive) => Ok(archive),
            Inner::Failed(err) => Err(Error::Failed(Arc::clone(err))),
            Inner::Unopened { .. } | Inner::Opening => Err(Error::NotOpened),
        }
    }

    /// Normalized entry paths in index order.
    pub fn list(&self) -> Result<Vec<&str>> {
        Ok(self.archive()?.list().collect())
    }

    /// Entries in index order.
    pub fn entries(&self) -> Result<&[EntryRecord]> {
        Ok(self.archive()?.entries())
    }

    /// Read entry contents by path.
    pub fn extract(&self, path: &str) -> Result<Vec<u8>> {
        self.archive()?.extract(path)
    }

    /// Take the opened archive out of the handle.
    pub fn into_archive(self) -> Result<PakArchive> {
        match self.inner {
            Inner::Ready(archive) => Ok(archive),
            Inner::Failed(err) => Err(Error::Failed(err)),
            Inner::Unopened { .. } | Inner::Opening => Err(Error::NotOpened),
        }
    }
}

impl std::fmt::Debug for PakHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PakHandle")
            .field("state", &self.state())
            .finish()
    }
}

fn open_source(source: ArchiveSource, options: OpenOptions) -> Result<PakArchive> {
    match source {
        ArchiveSource::Path(path) => PakArchive::open_with(path, options),
        ArchiveSource::Bytes(data) => {
            PakArchive::from_source(PakSource::Memory(data), "memory".to_string(), options)
        }
    }
}
