//! `tablesnap-core` - Shared leaf types for the tablesnap query cache.
//!
//! This crate provides the value and column metadata types that flow between
//! the shape analyzer, the snapshot store, and the disconnected cursor:
//!
//! - [`Value`] - a typed SQL value (or null)
//! - [`SqlType`] - the declared type code of a column
//! - [`ColumnDescriptor`] - name, 1-based ordinal, and declared type
//!
//! # Example
//!
//! ```
//! use tablesnap_core::{ColumnDescriptor, SqlType, Value};
//!
//! let id: Value = 7i64.into();
//! assert_eq!(id.as_int(), Some(7));
//! assert_eq!(id.sql_type(), SqlType::Integer);
//!
//! let col = ColumnDescriptor::new("id", 1, SqlType::Integer);
//! assert!(col.matches("ID"));
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod types;

pub use types::column::{ColumnDescriptor, SqlType};
pub use types::value::Value;
