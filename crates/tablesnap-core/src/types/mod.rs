//! Core data types shared across the tablesnap crates.

pub mod column;
pub mod value;

pub use column::{ColumnDescriptor, SqlType};
pub use value::Value;
