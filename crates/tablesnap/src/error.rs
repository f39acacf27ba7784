//! Error types for `tablesnap`.
//!
//! This module provides the [`enum@Error`] type that represents all possible
//! errors when executing queries through the caching layer.

use thiserror::Error;

use tablesnap_sql::ShapeError;

/// Errors that can occur when executing through the caching layer.
#[derive(Debug, Error)]
pub enum Error {
    /// The query text could not be classified or tokenized.
    ///
    /// Callers recover from this by executing the query directly against the
    /// live source instead of the cache; it is never fatal to the system.
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// The external data source reported a failure (network, syntax,
    /// permission). Propagated verbatim; no retry happens at this layer.
    #[error("data source error: {0}")]
    DataSource(String),

    /// A column name or ordinal was requested that the projection does not
    /// contain.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A value was read while the cursor was before the first row or after
    /// the last.
    #[error("invalid cursor position: {0}")]
    CursorPosition(String),

    /// The cursor was used after `close()`.
    #[error("cursor is closed")]
    ClosedCursor,

    /// A mutation was attempted on a disconnected cursor. Disconnected
    /// cursors are read-only by design.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// Create a data source error.
    #[must_use]
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource(msg.into())
    }

    /// Create an unknown column error.
    #[must_use]
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }

    /// Create a cursor position error.
    #[must_use]
    pub fn cursor_position(msg: impl Into<String>) -> Self {
        Self::CursorPosition(msg.into())
    }

    /// Returns `true` if this error can be recovered from by executing the
    /// query directly against the live source.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Shape(_))
    }

    /// Returns `true` if this error is in the programmer-misuse class
    /// (cursor navigation and accessor misuse). These are always surfaced,
    /// never swallowed.
    #[must_use]
    pub const fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::UnknownColumn(_) | Self::CursorPosition(_) | Self::ClosedCursor
        )
    }
}

/// A specialized `Result` type for `tablesnap` operations.
pub type Result<T> = std::result::Result<T, Error>;
