//! The caching query executor.
//!
//! Orchestrates the shape analyzer, the snapshot store, and the cursor
//! builder: read queries are served as disconnected projections of a cached
//! table capture, everything else goes straight to the live source.

use std::sync::Arc;

use tracing::debug;

use tablesnap_sql::{is_read_query, QueryShape};

use crate::cache::SnapshotCache;
use crate::cursor::{DisconnectedCursor, RowCursor};
use crate::error::Result;
use crate::snapshot::Snapshot;
use crate::source::DataSource;

/// Executes queries, serving repeated reads of a table from one in-memory
/// capture.
///
/// The store is owned per executor (or explicitly shared via
/// [`CachingExecutor::with_cache`]), never process-global, so lifecycle and
/// test isolation stay in the caller's hands.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use tablesnap::{CachingExecutor, RowCursor, SnapshotCache};
///
/// let executor = CachingExecutor::new(source);
/// let mut cursor = executor.execute("SELECT id, name FROM person")?;
/// while cursor.advance()? {
///     println!("{}", cursor.value("name")?);
/// }
/// // A second query against the same table is served from memory:
/// let again = executor.execute("SELECT name FROM person WHERE id > 5")?;
/// assert_eq!(executor.cache().stats().hits, 1);
/// ```
pub struct CachingExecutor<S: DataSource> {
    source: S,
    cache: Arc<SnapshotCache>,
}

impl<S: DataSource> CachingExecutor<S> {
    /// Create an executor with its own private snapshot store.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_cache(source, Arc::new(SnapshotCache::new()))
    }

    /// Create an executor over an existing (possibly shared) store.
    #[must_use]
    pub fn with_cache(source: S, cache: Arc<SnapshotCache>) -> Self {
        Self { source, cache }
    }

    /// The snapshot store, for metrics and explicit invalidation.
    #[must_use]
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// The wrapped live source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop the cached capture of one table.
    ///
    /// Nothing invalidates automatically on writes; callers that modify a
    /// table elsewhere own the decision of when its capture goes stale.
    pub fn invalidate(&self, table: &str) {
        self.cache.invalidate(table);
    }

    /// Drop every cached capture.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Execute `sql`, from cache when possible.
    ///
    /// Read queries whose shape the analyzer understands are answered with a
    /// [`DisconnectedCursor`] over the table's capture, populating it on
    /// first touch with the canonical fetch-all rewrite. Everything else -
    /// writes, DDL, and shapes the analyzer rejects - bypasses the cache and
    /// returns the live source's cursor unmodified.
    ///
    /// At most one source execution happens per distinct primary table for
    /// the store's lifetime; hits perform zero external executions.
    ///
    /// # Errors
    ///
    /// Source failures propagate verbatim, as do projection errors from the
    /// cursor builder. Shape analysis failures do not surface here: they
    /// downgrade to a bypass.
    pub fn execute(&self, sql: &str) -> Result<Box<dyn RowCursor>> {
        if !is_read_query(sql) {
            debug!(sql, "not a read query, bypassing cache");
            return self.source.run_query(sql);
        }

        let shape = match QueryShape::analyze(sql) {
            Ok(shape) if shape.is_read() => shape,
            Ok(_) => {
                debug!(sql, "statement is not a read after parsing, bypassing cache");
                return self.source.run_query(sql);
            }
            Err(err) => {
                debug!(sql, error = %err, "shape analysis failed, bypassing cache");
                return self.source.run_query(sql);
            }
        };
        let Some(table) = shape.cache_key() else {
            debug!(sql, "no table reference, bypassing cache");
            return self.source.run_query(sql);
        };

        let snapshot = self.cache.get_or_populate(&table, || {
            let live = self.source.run_query(shape.rewrite())?;
            Snapshot::from_cursor(live)
        })?;

        let cursor = DisconnectedCursor::over(snapshot, shape.projection())?;
        Ok(Box::new(cursor))
    }
}

impl<S: DataSource> std::fmt::Debug for CachingExecutor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingExecutor").field("cache", &self.cache).finish_non_exhaustive()
    }
}
