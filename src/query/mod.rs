//! Query operator vocabulary
//!
//! The value-struct vocabulary a planner exchanges with columns
//! ([`FilterOp`], [`Constraint`], [`Order`], [`JoinKey`]) plus the two free
//! functions implementing the per-query data flow: start from a full
//! [`RowMap`], narrow it constraint by constraint, then order an index vector
//! one ORDER BY key at a time.

pub mod like;

use crate::data::SqlValue;
use crate::table::{Column, RowMap};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Relational filter operation on a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    IsNull,
    IsNotNull,
    Like,
}

/// A single `(column, op, value)` predicate.
#[derive(Debug, Clone, Copy)]
pub struct Constraint<'a> {
    pub col_idx: u32,
    pub op: FilterOp,
    pub value: SqlValue<'a>,
}

/// Ordering directive for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub col_idx: u32,
    pub desc: bool,
}

/// A column to be joined on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinKey {
    pub col_idx: u32,
}

/// Narrow `rm` by every constraint in turn. Constraints compose by
/// intersection, so their order only affects cost, not the result.
pub fn filter_rows(columns: &[Column], constraints: &[Constraint], rm: &mut RowMap) -> Result<()> {
    for c in constraints {
        let col = columns
            .get(c.col_idx as usize)
            .ok_or(EngineError::ColumnIndexOutOfRange(c.col_idx))?;
        col.filter_into(c.op, c.value, rm);
    }
    Ok(())
}

/// Stably sort the row-index vector `out` by the given ORDER BY keys. Each key
/// is applied in reverse significance order; stability makes the last
/// (most significant) pass win ties via the earlier passes.
pub fn sort_rows(columns: &[Column], orders: &[Order], out: &mut [u32]) -> Result<()> {
    for o in orders.iter().rev() {
        let col = columns
            .get(o.col_idx as usize)
            .ok_or(EngineError::ColumnIndexOutOfRange(o.col_idx))?;
        col.stable_sort(o.desc, out);
    }
    Ok(())
}
