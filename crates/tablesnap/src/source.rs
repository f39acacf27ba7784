//! The live data-access collaborator contract.
//!
//! The caching layer consumes exactly one external interface: something that
//! can execute arbitrary query text against a real connection and hand back
//! a forward-only cursor. It is called in exactly two situations: to
//! populate a snapshot with the canonical fetch-all rewrite, and to bypass
//! the cache entirely for shapes that cannot be cached.

use std::sync::Arc;

use crate::cursor::RowCursor;
use crate::error::Result;

/// Executes query text against a live data source.
pub trait DataSource {
    /// Run `sql` and return a live, forward-only cursor over the result.
    ///
    /// # Errors
    ///
    /// [`Error::DataSource`](crate::error::Error::DataSource) for any failure
    /// the underlying source reports (network, syntax, permission). The
    /// caching layer propagates such errors verbatim and never retries.
    fn run_query(&self, sql: &str) -> Result<Box<dyn RowCursor>>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn run_query(&self, sql: &str) -> Result<Box<dyn RowCursor>> {
        (**self).run_query(sql)
    }
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn run_query(&self, sql: &str) -> Result<Box<dyn RowCursor>> {
        (**self).run_query(sql)
    }
}

impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    fn run_query(&self, sql: &str) -> Result<Box<dyn RowCursor>> {
        (**self).run_query(sql)
    }
}
