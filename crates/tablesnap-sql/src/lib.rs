//! `tablesnap-sql` - Minimal SQL shape analysis for the tablesnap query cache.
//!
//! This crate answers exactly three questions about a query string, and no
//! more:
//!
//! 1. Is it a read (SELECT-shaped) query at all? ([`is_read_query`])
//! 2. Which tables and columns does it reference? ([`QueryShape`])
//! 3. What is its canonical "fetch everything" form? ([`QueryShape::rewrite`])
//!
//! Parsing is built on [`sqlparser`](https://crates.io/crates/sqlparser) with
//! the generic dialect. Statement shapes the analyzer cannot classify
//! (expression projections, derived tables, CTEs, set operations) fail with
//! [`ShapeError`]; callers treat that as "do not cache, execute directly".
//!
//! # Example
//!
//! ```
//! use tablesnap_sql::{is_read_query, QueryShape};
//!
//! assert!(is_read_query("  SELECT id FROM person"));
//! assert!(!is_read_query("DELETE FROM person"));
//!
//! let shape = QueryShape::analyze("select id, name from Person where id > 3")?;
//! assert_eq!(shape.primary_table(), Some("Person"));
//! assert_eq!(shape.cache_key().as_deref(), Some("PERSON"));
//! assert_eq!(shape.rewrite(), r#"SELECT * FROM "PERSON" WHERE "ID" > 3"#);
//! # Ok::<(), tablesnap_sql::ShapeError>(())
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

mod error;
mod rewrite;
mod shape;

pub use error::{ShapeError, ShapeResult};
pub use shape::{is_read_query, table_identity, Projection, QueryShape};
