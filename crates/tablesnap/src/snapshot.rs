//! Immutable full-table captures.
//!
//! A [`Snapshot`] is the unit the cache stores: one table's complete column
//! metadata and rows at capture time. Once constructed it is never mutated;
//! a fresh population fully replaces the stored entry, it is never patched
//! in place. Many concurrently open cursors may therefore share one snapshot
//! safely.

use serde::{Deserialize, Serialize};

use tablesnap_core::{ColumnDescriptor, Value};

use crate::cursor::RowCursor;
use crate::error::Result;

/// An immutable capture of one table's columns and rows.
///
/// Serializable, so a capture can be persisted or shipped across a process
/// boundary and rehydrated into a warm cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Column metadata, ordinals 1..n.
    columns: Vec<ColumnDescriptor>,
    /// Captured rows, each in column order.
    rows: Vec<Vec<Value>>,
}

impl Snapshot {
    /// Create a snapshot from column metadata and rows in column order.
    ///
    /// Ordinals are renumbered 1..n regardless of what the descriptors
    /// carried, so they are stable for the lifetime of the snapshot.
    ///
    /// # Panics
    ///
    /// If any row's length differs from the column count. Cursors index rows
    /// by column position, so a ragged capture must fail here rather than
    /// mid-read.
    #[must_use]
    pub fn new(columns: Vec<ColumnDescriptor>, rows: Vec<Vec<Value>>) -> Self {
        let columns: Vec<ColumnDescriptor> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| col.with_ordinal((i + 1) as u16))
            .collect();
        assert!(
            rows.iter().all(|row| row.len() == columns.len()),
            "every row must have exactly one value per column"
        );
        Self { columns, rows }
    }

    /// Drain a live cursor into a snapshot.
    ///
    /// Copies the cursor's column metadata, advances it to exhaustion
    /// collecting every row, then closes it.
    ///
    /// # Errors
    ///
    /// Propagates any navigation or accessor error the live cursor reports.
    pub fn from_cursor(mut cursor: Box<dyn RowCursor>) -> Result<Self> {
        let columns = cursor.columns().to_vec();
        let mut rows = Vec::new();
        while cursor.advance()? {
            let mut row = Vec::with_capacity(columns.len());
            for ordinal in 1..=columns.len() {
                row.push(cursor.value_at(ordinal)?);
            }
            rows.push(row);
        }
        cursor.close();
        Ok(Self::new(columns, rows))
    }

    /// Returns the column metadata, ordinals 1..n.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the captured rows, each in column order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns the number of captured rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no rows were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column name to its 0-based index, case-insensitively.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.matches(name))
    }
}
