//! Load-once memoization of the trip dataset.
//!
//! The cache is one guarded cell holding the last successfully loaded file
//! and the path it came from. Asking for the same path again returns the
//! shared table; a different path or an explicit [`DatasetCache::invalidate`]
//! triggers a fresh load. Failed loads are never stored.

use crate::error::LoadError;
use crate::loader;
use crate::types::TripRecord;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// A loaded table. Shared read-only between every consumer.
pub type Dataset = Arc<Vec<TripRecord>>;

static SHARED: Lazy<DatasetCache> = Lazy::new(DatasetCache::new);

struct Entry {
    path: PathBuf,
    records: Dataset,
}

#[derive(Default)]
pub struct DatasetCache {
    cell: Mutex<Option<Entry>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by the binary.
    pub fn shared() -> &'static DatasetCache {
        &SHARED
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Dataset, LoadError> {
        self.get_or_load_with(path, loader::load)
    }

    /// Like [`get_or_load`](Self::get_or_load) but with the loading step
    /// supplied by the caller.
    pub fn get_or_load_with<F>(&self, path: &Path, load: F) -> Result<Dataset, LoadError>
    where
        F: FnOnce(&Path) -> Result<Vec<TripRecord>, LoadError>,
    {
        let mut cell = self.lock();
        if let Some(entry) = cell.as_ref() {
            if entry.path == path {
                debug!(path = %path.display(), "Dataset cache hit");
                return Ok(Arc::clone(&entry.records));
            }
        }

        debug!(path = %path.display(), "Dataset cache miss");
        let records: Dataset = Arc::new(load(path)?);
        *cell = Some(Entry {
            path: path.to_path_buf(),
            records: Arc::clone(&records),
        });
        Ok(records)
    }

    pub fn invalidate(&self) {
        if let Some(entry) = self.lock().take() {
            info!(path = %entry.path.display(), "Dataset cache invalidated");
        }
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.lock().as_ref().is_some_and(|e| e.path == path)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Entry>> {
        // The cell only ever holds a fully built entry, so a poisoned lock
        // still guards consistent data.
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
