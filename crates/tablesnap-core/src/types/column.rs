//! Column metadata for captured result sets.
//!
//! A [`ColumnDescriptor`] describes one column of a snapshot or a projected
//! cursor view: its name, its 1-based ordinal, and its declared SQL type.
//! Ordinals are stable for the lifetime of the owning snapshot; a projected
//! view renumbers its own descriptors starting at 1.

use serde::{Deserialize, Serialize};

/// Declared SQL type code of a column.
///
/// This is a coarse classification, not a full SQL type system: it is the
/// type a cursor reports through its metadata accessor, mapped from the
/// values the live source returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// BOOLEAN
    Boolean,
    /// Integer types (SMALLINT, INTEGER, BIGINT)
    Integer,
    /// Floating point types (REAL, DOUBLE PRECISION)
    Float,
    /// Character types (CHAR, VARCHAR, TEXT)
    Text,
    /// Binary types (BLOB, BYTEA)
    Bytes,
    /// No declared type (e.g. a column whose captured values were all NULL)
    Unknown,
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Text => "TEXT",
            Self::Bytes => "BYTES",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{name}")
    }
}

/// Metadata for one column: name, 1-based position, and declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// The column name as reported by the source.
    name: String,
    /// 1-based position within the owning column list.
    ordinal: u16,
    /// The declared SQL type.
    sql_type: SqlType,
}

impl ColumnDescriptor {
    /// Create a descriptor. `ordinal` is 1-based.
    #[must_use]
    pub fn new(name: impl Into<String>, ordinal: u16, sql_type: SqlType) -> Self {
        Self { name: name.into(), ordinal, sql_type }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the 1-based ordinal.
    #[must_use]
    pub const fn ordinal(&self) -> u16 {
        self.ordinal
    }

    /// Returns the declared SQL type.
    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    /// Returns a copy of this descriptor with a new 1-based ordinal.
    ///
    /// Used when building a projected view whose ordinals are renumbered
    /// independently of the snapshot's own ordering.
    #[must_use]
    pub fn with_ordinal(&self, ordinal: u16) -> Self {
        Self { name: self.name.clone(), ordinal, sql_type: self.sql_type }
    }

    /// Case-insensitive name comparison, matching SQL identifier resolution.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
