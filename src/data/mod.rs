//! Dataset snapshot acquisition.
//!
//! The engine consumes snapshots through the [`DataSource`] trait: one
//! synchronous "get current snapshot" call. The CSV store is the only
//! implementation shipped here; a warehouse-backed source would plug in
//! behind the same trait. Whether a snapshot is loaded once per process
//! or refreshed per call is the caller's policy, expressed by wrapping a
//! source in [`SnapshotCache`].

pub mod csv_store;

pub use csv_store::CsvStore;

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::models::SalesRecord;

/// Failure modes of snapshot acquisition.
///
/// A malformed snapshot (missing column, unparsable date or amount) is
/// fatal for the request; there is no partial result and nothing is
/// retried.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to load sales snapshot from {path}")]
    Load {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// A provider of the current dataset snapshot.
///
/// Snapshots are handed out behind an `Arc` so concurrent requests can
/// share one immutable copy; the engine never mutates rows.
pub trait DataSource {
    /// Fetch the current snapshot.
    fn snapshot(&self) -> Result<Arc<Vec<SalesRecord>>, DataError>;
}

impl DataSource for Box<dyn DataSource> {
    fn snapshot(&self) -> Result<Arc<Vec<SalesRecord>>, DataError> {
        self.as_ref().snapshot()
    }
}

/// Load-once wrapper around another source.
///
/// The first successful fetch is kept for the lifetime of the cache and
/// handed to every later caller. A stale snapshot is acceptable
/// staleness, not a correctness bug; callers wanting fresh data simply
/// use the inner source directly.
pub struct SnapshotCache<S> {
    inner: S,
    cell: Mutex<Option<Arc<Vec<SalesRecord>>>>,
}

impl<S: DataSource> SnapshotCache<S> {
    /// Wrap a source with load-once caching.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cell: Mutex::new(None),
        }
    }
}

impl<S: DataSource> DataSource for SnapshotCache<S> {
    fn snapshot(&self) -> Result<Arc<Vec<SalesRecord>>, DataError> {
        let mut cached = match self.cell.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(ref snapshot) = *cached {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = self.inner.snapshot()?;
        *cached = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
