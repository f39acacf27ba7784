//! Snapshot cache: table identity to full-table capture.
//!
//! The store maps case-normalized table identities to immutable
//! [`Snapshot`](crate::snapshot::Snapshot)s and keeps hit/miss counters for
//! observability. Entries are created lazily on first miss and live for the
//! store's lifetime; there is no eviction and no TTL. Staleness is explicit:
//! [`SnapshotCache::invalidate`] and [`SnapshotCache::clear`] are the only
//! refresh primitives - nothing refreshes an entry when the underlying table
//! is written elsewhere.

mod metrics;
mod store;

pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use store::SnapshotCache;
