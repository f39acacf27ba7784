//! The cursor contract and the disconnected, read-only cursor.
//!
//! [`RowCursor`] is the navigation/accessor contract shared by live cursors
//! (returned by the data source for bypassed queries) and the
//! [`DisconnectedCursor`] served from a cached snapshot. Callers must not
//! assume which variant they received beyond this shared surface.
//!
//! Position semantics match a live result cursor: a new cursor sits before
//! the first row; [`RowCursor::advance`] steps forward and reports whether a
//! row is available; past the last row the position pins at "after last".

use std::sync::Arc;

use tablesnap_core::{ColumnDescriptor, Value};
use tablesnap_sql::Projection;

use crate::error::{Error, Result};
use crate::snapshot::Snapshot;

/// A forward-navigable cursor over rows with column metadata.
///
/// Mutation methods carry default bodies that fail with
/// [`Error::Unsupported`]; live implementations backed by an updatable
/// result may override them, the disconnected cursor never does.
pub trait RowCursor: std::fmt::Debug {
    /// Column metadata for this cursor's view, ordinals 1..k.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Step to the next row. Returns `true` while a row is available; once
    /// the position passes the last row this always returns `false`.
    ///
    /// # Errors
    ///
    /// [`Error::ClosedCursor`] after `close()`.
    fn advance(&mut self) -> Result<bool>;

    /// Read the current row's value for a column name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`] for a name outside this cursor's view,
    /// [`Error::CursorPosition`] before the first `advance()` or after
    /// exhaustion, [`Error::ClosedCursor`] after `close()`.
    fn value(&self, column: &str) -> Result<Value>;

    /// Read the current row's value by 1-based ordinal.
    ///
    /// # Errors
    ///
    /// Same contract as [`RowCursor::value`], with ordinals outside
    /// `[1, column_count]` reported as [`Error::UnknownColumn`].
    fn value_at(&self, ordinal: usize) -> Result<Value>;

    /// Close the cursor. Idempotent; navigation and accessors fail
    /// afterwards.
    fn close(&mut self);

    /// Returns `true` once `close()` has been called.
    fn is_closed(&self) -> bool;

    /// Update a column of the current row.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] unless the implementation is updatable.
    fn update_value(&mut self, _column: &str, _value: Value) -> Result<()> {
        Err(Error::Unsupported("update_value"))
    }

    /// Insert a new row.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] unless the implementation is updatable.
    fn insert_row(&mut self, _values: Vec<Value>) -> Result<()> {
        Err(Error::Unsupported("insert_row"))
    }

    /// Delete the current row.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] unless the implementation is updatable.
    fn delete_row(&mut self) -> Result<()> {
        Err(Error::Unsupported("delete_row"))
    }
}

/// A read-only cursor over a cached snapshot, detached from any connection.
///
/// Holds a shared reference to the snapshot plus the projected column
/// subset; the snapshot itself is never mutated or freed by a cursor, so any
/// number of cursors may read the same entry concurrently (each from its own
/// thread - a single cursor instance is not to be shared).
#[derive(Debug)]
pub struct DisconnectedCursor {
    snapshot: Arc<Snapshot>,
    /// 0-based snapshot column index per projected column.
    projected: Vec<usize>,
    /// Projected descriptors, renumbered 1..k.
    columns: Vec<ColumnDescriptor>,
    /// -1 = before first, row_count = after last.
    position: isize,
    closed: bool,
}

impl DisconnectedCursor {
    /// Build a cursor over `snapshot` restricted to the requested columns.
    ///
    /// `Projection::All` expands to the snapshot's full column list in
    /// snapshot order. Explicit names resolve case-insensitively and keep
    /// their written order; ordinals are renumbered 1..k independent of the
    /// snapshot's own numbering.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`] when a requested column is absent from the
    /// snapshot. This is a construction-time error: the cursor is never
    /// handed out with an unresolvable projection.
    pub fn over(snapshot: Arc<Snapshot>, projection: &Projection) -> Result<Self> {
        let projected: Vec<usize> = match projection {
            Projection::All => (0..snapshot.columns().len()).collect(),
            Projection::Columns(names) => names
                .iter()
                .map(|name| {
                    snapshot.column_index(name).ok_or_else(|| Error::unknown_column(name.clone()))
                })
                .collect::<Result<_>>()?,
        };
        let columns = projected
            .iter()
            .enumerate()
            .map(|(i, &idx)| snapshot.columns()[idx].with_ordinal((i + 1) as u16))
            .collect();
        Ok(Self { snapshot, projected, columns, position: -1, closed: false })
    }

    /// Current position: -1 before the first row, `row_count()` after the
    /// last.
    #[must_use]
    pub const fn position(&self) -> isize {
        self.position
    }

    /// Number of rows in this cursor's view.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.snapshot.row_count()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::ClosedCursor);
        }
        Ok(())
    }

    /// The snapshot row at the current position.
    fn current_row(&self) -> Result<&[Value]> {
        if self.position < 0 {
            return Err(Error::cursor_position("before first row"));
        }
        let index = self.position as usize;
        if index >= self.snapshot.row_count() {
            return Err(Error::cursor_position("after last row"));
        }
        Ok(&self.snapshot.rows()[index])
    }

    /// Read a value through the projection by 0-based projected index.
    fn projected_value(&self, index: usize) -> Result<Value> {
        let row = self.current_row()?;
        Ok(row[self.projected[index]].clone())
    }
}

impl RowCursor for DisconnectedCursor {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let row_count = self.snapshot.row_count() as isize;
        if self.position < row_count {
            self.position += 1;
        }
        Ok(self.position < row_count)
    }

    fn value(&self, column: &str) -> Result<Value> {
        self.ensure_open()?;
        let index = self
            .columns
            .iter()
            .position(|col| col.matches(column))
            .ok_or_else(|| Error::unknown_column(column))?;
        self.projected_value(index)
    }

    fn value_at(&self, ordinal: usize) -> Result<Value> {
        self.ensure_open()?;
        if ordinal == 0 || ordinal > self.projected.len() {
            return Err(Error::unknown_column(format!("ordinal {ordinal}")));
        }
        self.projected_value(ordinal - 1)
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use tablesnap_core::SqlType;

    use super::*;

    fn snapshot_abc() -> Arc<Snapshot> {
        Arc::new(Snapshot::new(
            vec![
                ColumnDescriptor::new("a", 1, SqlType::Integer),
                ColumnDescriptor::new("b", 2, SqlType::Integer),
                ColumnDescriptor::new("c", 3, SqlType::Integer),
            ],
            vec![
                vec![Value::Int(1), Value::Int(2), Value::Int(3)],
                vec![Value::Int(4), Value::Int(5), Value::Int(6)],
            ],
        ))
    }

    fn columns(projection: &Projection, snapshot: &Arc<Snapshot>) -> Vec<String> {
        let cursor = DisconnectedCursor::over(Arc::clone(snapshot), projection).unwrap();
        cursor.columns().iter().map(|c| c.name().to_owned()).collect()
    }

    #[test]
    fn test_projection_reorders_and_renumbers() {
        let snapshot = snapshot_abc();
        let projection = Projection::Columns(vec!["b".to_owned(), "a".to_owned()]);
        let mut cursor = DisconnectedCursor::over(snapshot, &projection).unwrap();

        assert_eq!(cursor.columns().len(), 2);
        assert_eq!(cursor.columns()[0].name(), "b");
        assert_eq!(cursor.columns()[0].ordinal(), 1);
        assert_eq!(cursor.columns()[1].name(), "a");
        assert_eq!(cursor.columns()[1].ordinal(), 2);

        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.value("b").unwrap(), Value::Int(2));
        assert_eq!(cursor.value("a").unwrap(), Value::Int(1));
        assert_eq!(cursor.value_at(1).unwrap(), Value::Int(2));
        assert_eq!(cursor.value_at(2).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_wildcard_uses_snapshot_order() {
        let snapshot = snapshot_abc();
        assert_eq!(columns(&Projection::All, &snapshot), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_column_fails_at_construction() {
        let snapshot = snapshot_abc();
        let projection = Projection::Columns(vec!["a".to_owned(), "zz".to_owned()]);
        let err = DisconnectedCursor::over(snapshot, &projection).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(name) if name == "zz"));
    }

    #[test]
    fn test_value_before_first_and_after_last() {
        let snapshot = snapshot_abc();
        let mut cursor = DisconnectedCursor::over(snapshot, &Projection::All).unwrap();

        assert!(matches!(cursor.value("a"), Err(Error::CursorPosition(_))));

        assert!(cursor.advance().unwrap());
        assert!(cursor.advance().unwrap());
        assert!(!cursor.advance().unwrap());
        assert_eq!(cursor.position(), 2);

        assert!(matches!(cursor.value("a"), Err(Error::CursorPosition(_))));
        // Position pins at after-last no matter how often we advance
        assert!(!cursor.advance().unwrap());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_empty_snapshot_boundary() {
        let snapshot = Arc::new(Snapshot::new(
            vec![ColumnDescriptor::new("a", 1, SqlType::Integer)],
            vec![],
        ));
        let mut cursor = DisconnectedCursor::over(snapshot, &Projection::All).unwrap();

        assert_eq!(cursor.position(), -1);
        assert!(!cursor.advance().unwrap());
        assert_eq!(cursor.position(), 0); // == row_count == after-last
        assert!(matches!(cursor.value("a"), Err(Error::CursorPosition(_))));
    }

    #[test]
    fn test_ordinal_bounds() {
        let snapshot = snapshot_abc();
        let projection = Projection::Columns(vec!["c".to_owned()]);
        let mut cursor = DisconnectedCursor::over(snapshot, &projection).unwrap();
        assert!(cursor.advance().unwrap());

        assert_eq!(cursor.value_at(1).unwrap(), Value::Int(3));
        assert!(matches!(cursor.value_at(0), Err(Error::UnknownColumn(_))));
        assert!(matches!(cursor.value_at(2), Err(Error::UnknownColumn(_))));
        // Names outside the projection are unknown even if the snapshot has them
        assert!(matches!(cursor.value("a"), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn test_close_is_idempotent_and_final() {
        let snapshot = snapshot_abc();
        let mut cursor = DisconnectedCursor::over(snapshot, &Projection::All).unwrap();
        assert!(cursor.advance().unwrap());

        cursor.close();
        cursor.close(); // second close is not an error
        assert!(cursor.is_closed());

        assert!(matches!(cursor.advance(), Err(Error::ClosedCursor)));
        assert!(matches!(cursor.value("a"), Err(Error::ClosedCursor)));
        assert!(matches!(cursor.value_at(1), Err(Error::ClosedCursor)));
    }

    #[test]
    fn test_mutations_are_unsupported_and_leave_snapshot_intact() {
        let snapshot = snapshot_abc();
        let mut cursor = DisconnectedCursor::over(Arc::clone(&snapshot), &Projection::All).unwrap();
        assert!(cursor.advance().unwrap());

        assert!(matches!(
            cursor.update_value("a", Value::Int(99)),
            Err(Error::Unsupported("update_value"))
        ));
        assert!(matches!(
            cursor.insert_row(vec![Value::Int(7), Value::Int(8), Value::Int(9)]),
            Err(Error::Unsupported("insert_row"))
        ));
        assert!(matches!(cursor.delete_row(), Err(Error::Unsupported("delete_row"))));

        assert_eq!(snapshot.row_count(), 2);
        assert_eq!(snapshot.rows()[0][0], Value::Int(1));
        assert_eq!(cursor.value("a").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_many_cursors_share_one_snapshot() {
        let snapshot = snapshot_abc();
        let mut first = DisconnectedCursor::over(Arc::clone(&snapshot), &Projection::All).unwrap();
        let mut second = DisconnectedCursor::over(Arc::clone(&snapshot), &Projection::All).unwrap();

        assert!(first.advance().unwrap());
        assert!(second.advance().unwrap());
        assert!(second.advance().unwrap());

        // Independent positions over the same shared rows
        assert_eq!(first.value("a").unwrap(), Value::Int(1));
        assert_eq!(second.value("a").unwrap(), Value::Int(4));

        first.close();
        assert!(matches!(first.value("a"), Err(Error::ClosedCursor)));
        assert_eq!(second.value("b").unwrap(), Value::Int(5));
    }
}
