//! Typed column views with filter and sort operators
//!
//! A [`Column`] binds a name, a [`ColumnType`], a flag set, a borrowed storage
//! reference, and a borrowed [`RowMap`] view. It implements the three engine
//! entry points (`get`, `filter_into`, `stable_sort`) plus `index_of` and the
//! constraint/order builders consumed by the planner.

use crate::data::{SqlType, SqlValue, StringId, StringPool};
use crate::query::{like, Constraint, FilterOp, JoinKey, Order};
use crate::table::{RowMap, SparseVector};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Physical/semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Int32,
    Uint32,
    Int64,
    String,
    /// Synthetic: the value at row `r` is the storage index `row_map.get(r)`.
    Id,
}

/// Property flags used to pick filter and sort fast paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnFlags(u32);

impl ColumnFlags {
    pub const NONE: ColumnFlags = ColumnFlags(0);

    /// Values are ascending under the identity row map; nulls, if any, come
    /// first. Enables the binary-search filter path.
    pub const SORTED: ColumnFlags = ColumnFlags(1 << 0);

    /// No null cell exists. Only meaningful for numeric columns; string and
    /// id columns have their own null handling and ignore it.
    pub const NON_NULL: ColumnFlags = ColumnFlags(1 << 1);

    pub fn contains(self, other: ColumnFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ColumnFlags {
    type Output = ColumnFlags;

    fn bitor(self, rhs: ColumnFlags) -> ColumnFlags {
        ColumnFlags(self.0 | rhs.0)
    }
}

/// Borrowed storage backing a column: one variant per concrete cell kind.
#[derive(Debug, Clone, Copy)]
pub enum ColumnStorage<'t> {
    Int32(&'t SparseVector<i32>),
    Uint32(&'t SparseVector<u32>),
    Int64(&'t SparseVector<i64>),
    String {
        pool: &'t StringPool,
        ids: &'t SparseVector<StringId>,
    },
    Id,
}

impl<'t> ColumnStorage<'t> {
    pub fn string(pool: &'t StringPool, ids: &'t SparseVector<StringId>) -> Self {
        ColumnStorage::String { pool, ids }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnStorage::Int32(_) => ColumnType::Int32,
            ColumnStorage::Uint32(_) => ColumnType::Uint32,
            ColumnStorage::Int64(_) => ColumnType::Int64,
            ColumnStorage::String { .. } => ColumnType::String,
            ColumnStorage::Id => ColumnType::Id,
        }
    }
}

impl<'t> From<&'t SparseVector<i32>> for ColumnStorage<'t> {
    fn from(sv: &'t SparseVector<i32>) -> Self {
        ColumnStorage::Int32(sv)
    }
}

impl<'t> From<&'t SparseVector<u32>> for ColumnStorage<'t> {
    fn from(sv: &'t SparseVector<u32>) -> Self {
        ColumnStorage::Uint32(sv)
    }
}

impl<'t> From<&'t SparseVector<i64>> for ColumnStorage<'t> {
    fn from(sv: &'t SparseVector<i64>) -> Self {
        ColumnStorage::Int64(sv)
    }
}

/// A named, strongly typed list of data projected through a row map.
///
/// Columns are pure views: they own nothing, cost nothing to copy, and are
/// immutable after construction. A derived table rebinds the same storage to
/// its own row map via [`Column::with_row_map`].
#[derive(Debug, Clone, Copy)]
pub struct Column<'t> {
    name: &'t str,
    storage: ColumnStorage<'t>,
    flags: ColumnFlags,
    row_map: &'t RowMap,
    col_idx: u32,
}

impl<'t> Column<'t> {
    pub fn new(
        name: &'t str,
        storage: ColumnStorage<'t>,
        flags: ColumnFlags,
        row_map: &'t RowMap,
        col_idx: u32,
    ) -> Self {
        assert!(!name.is_empty(), "column name must be non-empty");
        assert!(
            !matches!(storage, ColumnStorage::Id),
            "id columns are built with Column::id_column"
        );
        Self {
            name,
            storage,
            flags,
            row_map,
            col_idx,
        }
    }

    /// A column whose value at each row is the row's storage index. Trivially
    /// sorted and non-null.
    pub fn id_column(row_map: &'t RowMap, col_idx: u32) -> Self {
        Self {
            name: "id",
            storage: ColumnStorage::Id,
            flags: ColumnFlags::SORTED | ColumnFlags::NON_NULL,
            row_map,
            col_idx,
        }
    }

    /// The same name, storage and flags, bound to a derived table's row map.
    pub fn with_row_map(&self, row_map: &'t RowMap, col_idx: u32) -> Self {
        Self {
            name: self.name,
            storage: self.storage,
            flags: self.flags,
            row_map,
            col_idx,
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn name(&self) -> &'t str {
        self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.storage.column_type()
    }

    /// The external value type this column surfaces: `Long` for numeric and
    /// id columns, `String` for string columns.
    pub fn sql_type(&self) -> SqlType {
        match self.column_type() {
            ColumnType::Int32 | ColumnType::Uint32 | ColumnType::Int64 | ColumnType::Id => {
                SqlType::Long
            }
            ColumnType::String => SqlType::String,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self.storage, ColumnStorage::Id)
    }

    pub fn is_nullable(&self) -> bool {
        !self.flags.contains(ColumnFlags::NON_NULL)
    }

    pub fn is_sorted(&self) -> bool {
        self.flags.contains(ColumnFlags::SORTED)
    }

    pub fn row_map(&self) -> &'t RowMap {
        self.row_map
    }

    pub fn col_idx(&self) -> u32 {
        self.col_idx
    }

    // ========================================================================
    // Point access
    // ========================================================================

    /// The value at `row` (a position in this column's row map).
    pub fn get(&self, row: u32) -> SqlValue<'t> {
        self.get_at_idx(self.row_map.get(row))
    }

    /// The value at a raw storage index, bypassing the row map.
    pub fn get_at_idx(&self, idx: u32) -> SqlValue<'t> {
        match self.storage {
            ColumnStorage::Int32(sv) => match sv.get(idx) {
                Some(v) => SqlValue::Long(v as i64),
                None => SqlValue::Null,
            },
            ColumnStorage::Uint32(sv) => match sv.get(idx) {
                Some(v) => SqlValue::Long(v as i64),
                None => SqlValue::Null,
            },
            ColumnStorage::Int64(sv) => match sv.get(idx) {
                Some(v) => SqlValue::Long(v),
                None => SqlValue::Null,
            },
            ColumnStorage::String { pool, ids } => match pool.get(ids.get_non_null(idx)) {
                Some(s) => SqlValue::String(s),
                None => SqlValue::Null,
            },
            ColumnStorage::Id => SqlValue::Long(idx as i64),
        }
    }

    /// First row (in row-map coordinates) whose value equals `value` under
    /// SQL equality, or `None`. Id columns answer through the row map.
    pub fn index_of(&self, value: SqlValue) -> Option<u32> {
        if self.is_id() {
            let idx = u32::try_from(value.as_long()?).ok()?;
            return self.row_map.index_of(idx);
        }
        (0..self.row_map.size()).find(|&row| self.get(row) == value)
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Narrow `rm` to the rows where this column satisfies `value <op>`.
    ///
    /// `rm` is expressed in this column's row-map coordinates. An id-equality
    /// constraint resolves to a single row; a sorted column answers the
    /// relational operators by binary search; everything else scans, routing
    /// the predicate through the row map so it sees storage indices.
    pub fn filter_into(&self, op: FilterOp, value: SqlValue, rm: &mut RowMap) {
        if self.is_id() && op == FilterOp::Eq {
            match self.index_of(value) {
                Some(row) => rm.intersect(&RowMap::single_row(row)),
                None => rm.intersect(&RowMap::empty()),
            }
            return;
        }

        if self.is_sorted()
            && matches!(
                op,
                FilterOp::Eq | FilterOp::Le | FilterOp::Lt | FilterOp::Ge | FilterOp::Gt
            )
        {
            if value.value_type() == self.sql_type() {
                let size = self.row_map.size();
                let range = match op {
                    FilterOp::Eq => {
                        RowMap::range(self.lower_bound(&value), self.upper_bound(&value))
                    }
                    FilterOp::Le => RowMap::range(0, self.upper_bound(&value)),
                    FilterOp::Lt => RowMap::range(0, self.lower_bound(&value)),
                    FilterOp::Ge => RowMap::range(self.lower_bound(&value), size),
                    FilterOp::Gt => RowMap::range(self.upper_bound(&value), size),
                    _ => unreachable!(),
                };
                rm.intersect(&range);
                return;
            }
            log::debug!(
                "binary search on sorted column {:?} skipped: operand type {:?} != {:?}",
                self.name,
                value.value_type(),
                self.sql_type()
            );
        }

        match self.storage {
            ColumnStorage::Int32(sv) => self.filter_long_slow(sv, |v| v as i64, op, value, rm),
            ColumnStorage::Uint32(sv) => self.filter_long_slow(sv, |v| v as i64, op, value, rm),
            ColumnStorage::Int64(sv) => self.filter_long_slow(sv, |v| v, op, value, rm),
            ColumnStorage::String { pool, ids } => {
                self.filter_string_slow(pool, ids, op, value, rm)
            }
            ColumnStorage::Id => self.filter_id_slow(op, value, rm),
        }
    }

    /// Route a storage-index predicate through this column's row map onto the
    /// query row map.
    fn narrow(&self, rm: &mut RowMap, predicate: impl Fn(u32) -> bool) {
        let row_map = self.row_map;
        rm.filter_into(|row| predicate(row_map.get(row)));
    }

    fn filter_long_slow<T: Copy + Default>(
        &self,
        sv: &SparseVector<T>,
        to_long: impl Fn(T) -> i64 + Copy,
        op: FilterOp,
        value: SqlValue,
        rm: &mut RowMap,
    ) {
        match op {
            FilterOp::IsNull => {
                debug_assert!(value.is_null());
                if self.is_nullable() {
                    self.narrow(rm, |idx| sv.get(idx).is_none());
                } else {
                    rm.intersect(&RowMap::empty());
                }
            }
            FilterOp::IsNotNull => {
                debug_assert!(value.is_null());
                if self.is_nullable() {
                    self.narrow(rm, |idx| sv.get(idx).is_some());
                }
            }
            FilterOp::Like => {
                log::debug!("LIKE on numeric column {:?} matches no rows", self.name);
                rm.intersect(&RowMap::empty());
            }
            _ => {
                let target = Some(value.long_value());
                if self.is_nullable() {
                    self.narrow(rm, |idx| {
                        relational_matches(op, sv.get(idx).map(to_long), target)
                    });
                } else {
                    self.narrow(rm, |idx| {
                        relational_matches(op, Some(to_long(sv.get_non_null(idx))), target)
                    });
                }
            }
        }
    }

    fn filter_string_slow(
        &self,
        pool: &'t StringPool,
        ids: &'t SparseVector<StringId>,
        op: FilterOp,
        value: SqlValue,
        rm: &mut RowMap,
    ) {
        let cell = |idx: u32| pool.get(ids.get_non_null(idx));
        match op {
            FilterOp::IsNull => {
                debug_assert!(value.is_null());
                self.narrow(rm, |idx| cell(idx).is_none());
            }
            FilterOp::IsNotNull => {
                debug_assert!(value.is_null());
                self.narrow(rm, |idx| cell(idx).is_some());
            }
            FilterOp::Like => {
                let Some(pattern) = value.as_str() else {
                    log::warn!(
                        "LIKE on column {:?} needs a string pattern, got {:?}",
                        self.name,
                        value.value_type()
                    );
                    return;
                };
                let Some(re) = like::compile(pattern) else {
                    return;
                };
                self.narrow(rm, |idx| cell(idx).is_some_and(|s| re.is_match(s)));
            }
            _ => {
                let target = value.as_str();
                self.narrow(rm, |idx| relational_matches(op, cell(idx), target));
            }
        }
    }

    fn filter_id_slow(&self, op: FilterOp, value: SqlValue, rm: &mut RowMap) {
        match op {
            FilterOp::IsNull => {
                debug_assert!(value.is_null());
                self.narrow(rm, |_| false);
            }
            FilterOp::IsNotNull => {
                debug_assert!(value.is_null());
                self.narrow(rm, |_| true);
            }
            FilterOp::Like => {
                log::debug!("LIKE on id column matches no rows");
                rm.intersect(&RowMap::empty());
            }
            _ => {
                let target = Some(value.long_value());
                self.narrow(rm, |idx| relational_matches(op, Some(idx as i64), target));
            }
        }
    }

    /// First row whose value is not less than `value` under the total order.
    fn lower_bound(&self, value: &SqlValue) -> u32 {
        self.partition_point(|row| self.get(row).total_cmp(value) == Ordering::Less)
    }

    /// First row whose value is greater than `value` under the total order.
    fn upper_bound(&self, value: &SqlValue) -> u32 {
        self.partition_point(|row| self.get(row).total_cmp(value) != Ordering::Greater)
    }

    /// Binary search over the virtual sequence `get(0..row_map.size())`:
    /// first row where `pred` flips from true to false.
    fn partition_point(&self, pred: impl Fn(u32) -> bool) -> u32 {
        let mut lo = 0u32;
        let mut hi = self.row_map.size();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(mid) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Stably sort the row-index vector `out` by this column's values,
    /// descending when `desc`. Nulls order before every value; equal keys
    /// keep their prior order in `out`.
    pub fn stable_sort(&self, desc: bool, out: &mut [u32]) {
        match self.storage {
            ColumnStorage::Int32(sv) => self.sort_numeric(sv, desc, out),
            ColumnStorage::Uint32(sv) => self.sort_numeric(sv, desc, out),
            ColumnStorage::Int64(sv) => self.sort_numeric(sv, desc, out),
            ColumnStorage::String { pool, ids } => {
                self.row_map.stable_sort(out, |a_idx, b_idx| {
                    let a = pool.get(ids.get_non_null(a_idx));
                    let b = pool.get(ids.get_non_null(b_idx));
                    if desc {
                        b.cmp(&a)
                    } else {
                        a.cmp(&b)
                    }
                });
            }
            ColumnStorage::Id => {
                self.row_map.stable_sort(out, |a_idx, b_idx| {
                    if desc {
                        b_idx.cmp(&a_idx)
                    } else {
                        a_idx.cmp(&b_idx)
                    }
                });
            }
        }
    }

    fn sort_numeric<T: Copy + Default + Ord>(
        &self,
        sv: &SparseVector<T>,
        desc: bool,
        out: &mut [u32],
    ) {
        if self.is_nullable() {
            self.row_map.stable_sort(out, |a_idx, b_idx| {
                let (a, b) = (sv.get(a_idx), sv.get(b_idx));
                if desc {
                    b.cmp(&a)
                } else {
                    a.cmp(&b)
                }
            });
        } else {
            self.row_map.stable_sort(out, |a_idx, b_idx| {
                let (a, b) = (sv.get_non_null(a_idx), sv.get_non_null(b_idx));
                if desc {
                    b.cmp(&a)
                } else {
                    a.cmp(&b)
                }
            });
        }
    }

    // ========================================================================
    // Constraint and order builders
    // ========================================================================

    pub fn eq(&self, value: SqlValue<'t>) -> Constraint<'t> {
        self.constraint(FilterOp::Eq, value)
    }

    pub fn ne(&self, value: SqlValue<'t>) -> Constraint<'t> {
        self.constraint(FilterOp::Ne, value)
    }

    pub fn lt(&self, value: SqlValue<'t>) -> Constraint<'t> {
        self.constraint(FilterOp::Lt, value)
    }

    pub fn le(&self, value: SqlValue<'t>) -> Constraint<'t> {
        self.constraint(FilterOp::Le, value)
    }

    pub fn gt(&self, value: SqlValue<'t>) -> Constraint<'t> {
        self.constraint(FilterOp::Gt, value)
    }

    pub fn ge(&self, value: SqlValue<'t>) -> Constraint<'t> {
        self.constraint(FilterOp::Ge, value)
    }

    pub fn is_null(&self) -> Constraint<'t> {
        self.constraint(FilterOp::IsNull, SqlValue::Null)
    }

    pub fn is_not_null(&self) -> Constraint<'t> {
        self.constraint(FilterOp::IsNotNull, SqlValue::Null)
    }

    pub fn like(&self, pattern: &'t str) -> Constraint<'t> {
        self.constraint(FilterOp::Like, SqlValue::String(pattern))
    }

    fn constraint(&self, op: FilterOp, value: SqlValue<'t>) -> Constraint<'t> {
        Constraint {
            col_idx: self.col_idx,
            op,
            value,
        }
    }

    pub fn ascending(&self) -> Order {
        Order {
            col_idx: self.col_idx,
            desc: false,
        }
    }

    pub fn descending(&self) -> Order {
        Order {
            col_idx: self.col_idx,
            desc: true,
        }
    }

    pub fn join_key(&self) -> JoinKey {
        JoinKey {
            col_idx: self.col_idx,
        }
    }
}

/// Relational comparison with null ordered below every value (`None <
/// Some(_)`), the ordering `Option` already provides.
fn relational_matches<T: PartialOrd>(op: FilterOp, cell: Option<T>, target: Option<T>) -> bool {
    match op {
        FilterOp::Eq => cell == target,
        FilterOp::Ne => cell != target,
        FilterOp::Lt => cell < target,
        FilterOp::Le => cell <= target,
        FilterOp::Gt => cell > target,
        FilterOp::Ge => cell >= target,
        _ => unreachable!("relational operator expected"),
    }
}
