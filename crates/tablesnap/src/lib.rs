//! `tablesnap` - Table-snapshot caching for SELECT-shaped queries.
//!
//! Repeated reads of the same table usually pay a round-trip each. This
//! crate recognizes the table a read query touches, materializes the full
//! table once into an immutable in-memory [`Snapshot`], and serves every
//! later query against that table as a column-projected view through a
//! [`DisconnectedCursor`] that mimics a live cursor's navigation contract.
//!
//! # Architecture
//!
//! - [`tablesnap_sql`] classifies a query and derives its canonical
//!   fetch-all rewrite (re-exported here as [`QueryShape`]).
//! - [`SnapshotCache`] maps case-normalized table identity to a shared
//!   [`Snapshot`], counting hits and misses.
//! - [`CachingExecutor`] ties it together over any [`DataSource`]; queries
//!   the analyzer cannot model bypass the cache and run live.
//!
//! # Example
//!
//! ```ignore
//! use tablesnap::{CachingExecutor, RowCursor};
//!
//! let executor = CachingExecutor::new(source);
//!
//! // First touch of `person` fetches the whole table once...
//! let mut cursor = executor.execute("SELECT id, name FROM person")?;
//! while cursor.advance()? {
//!     println!("{} {}", cursor.value("id")?, cursor.value("name")?);
//! }
//!
//! // ...every later read of `person` is served from memory.
//! let mut names = executor.execute("SELECT name FROM person WHERE id < 10")?;
//! assert_eq!(executor.cache().stats().hits, 1);
//! ```
//!
//! # Staleness
//!
//! Nothing refreshes a snapshot when the underlying table changes: there is
//! no eviction, no TTL, and no invalidation-on-write. Callers own staleness
//! through [`SnapshotCache::invalidate`] and [`SnapshotCache::clear`]. For
//! joins, only the first referenced table keys the cache; changes to
//! secondary tables are invisible to even that explicit contract.

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

// Re-export core types
pub use tablesnap_core::{ColumnDescriptor, SqlType, Value};

// Re-export the shape analyzer surface
pub use tablesnap_sql::{is_read_query, table_identity, Projection, QueryShape, ShapeError};

// Modules
pub mod cache;
pub mod cursor;
pub mod error;
pub mod executor;
pub mod snapshot;
pub mod source;

// Public API re-exports
pub use cache::{CacheMetrics, CacheMetricsSnapshot, SnapshotCache};
pub use cursor::{DisconnectedCursor, RowCursor};
pub use error::{Error, Result};
pub use executor::CachingExecutor;
pub use snapshot::Snapshot;
pub use source::DataSource;
