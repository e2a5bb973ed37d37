//! Tracebase Column Engine
//!
//! The typed columnar core of a trace-analysis query engine. A [`Column`] is a
//! named, strongly typed, optionally nullable sequence of cells viewed through
//! a [`RowMap`]. Three primitive operations are exposed per column:
//!
//! - point access ([`Column::get`])
//! - [`Column::filter_into`]: narrow a RowMap in place by a relational predicate
//! - [`Column::stable_sort`]: order a row-index vector by the column's values
//!
//! Higher-level relational operators (joins, group-by, projection) and the SQL
//! bridge are built on top of these primitives by the owning table layer.

pub mod data;
pub mod query;
pub mod table;

// Re-export main types
pub use data::{SqlType, SqlValue, StringId, StringPool};
pub use query::{Constraint, FilterOp, JoinKey, Order};
pub use table::{BitVec, Column, ColumnFlags, ColumnStorage, ColumnType, RowMap, SparseVector};

/// Column engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Column index out of range: {0}")]
    ColumnIndexOutOfRange(u32),
}

pub type Result<T> = std::result::Result<T, EngineError>;
