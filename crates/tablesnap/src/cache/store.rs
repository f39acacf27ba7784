//! The table-identity keyed snapshot store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use tablesnap_sql::table_identity;

use super::metrics::{CacheMetrics, CacheMetricsSnapshot};
use crate::error::Result;
use crate::snapshot::Snapshot;

/// Maps case-normalized table identity to a shared [`Snapshot`].
///
/// Population is not single-flight: two callers that both observe a miss for
/// the same table both execute the fetch, and the later write wins. Both
/// writes carry equivalent full captures, so readers see a consistent entry
/// either way; the duplicated fetch is a documented cost, not a correctness
/// problem.
pub struct SnapshotCache {
    entries: RwLock<HashMap<String, Arc<Snapshot>>>,
    metrics: Arc<CacheMetrics>,
}

impl SnapshotCache {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: RwLock::new(HashMap::new()), metrics: Arc::new(CacheMetrics::new()) }
    }

    /// Return the snapshot for `table`, populating it on first use.
    ///
    /// On a hit the stored snapshot is returned and the hit counter bumped.
    /// On a miss the miss counter is bumped, `fetch` runs outside the lock,
    /// and its result is stored under the normalized identity.
    ///
    /// # Errors
    ///
    /// A failing `fetch` stores nothing and its error propagates unchanged;
    /// the next call for the same table retries population from scratch.
    pub fn get_or_populate<F>(&self, table: &str, fetch: F) -> Result<Arc<Snapshot>>
    where
        F: FnOnce() -> Result<Snapshot>,
    {
        let key = table_identity(table);

        if let Some(found) = self.lookup(&key) {
            self.metrics.record_hit();
            debug!(table = %key, "snapshot cache hit");
            return Ok(found);
        }

        self.metrics.record_miss();
        debug!(table = %key, "snapshot cache miss, populating");
        let snapshot = Arc::new(fetch()?);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, Arc::clone(&snapshot));
        }
        Ok(snapshot)
    }

    fn lookup(&self, key: &str) -> Option<Arc<Snapshot>> {
        self.entries.read().ok().and_then(|entries| entries.get(key).cloned())
    }

    /// Returns `true` if a snapshot is stored for `table`.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.lookup(&table_identity(table)).is_some()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the snapshot for one table, forcing repopulation on next use.
    pub fn invalidate(&self, table: &str) {
        let key = table_identity(table);
        if let Ok(mut entries) = self.entries.write() {
            if entries.remove(&key).is_some() {
                debug!(table = %key, "snapshot invalidated");
            }
        }
    }

    /// Drop every stored snapshot.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            let count = entries.len();
            entries.clear();
            debug!(count, "snapshot cache cleared");
        }
    }

    /// Point-in-time hit/miss reading.
    #[must_use]
    pub fn stats(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Shared handle to the live counters.
    #[must_use]
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCache")
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
