//! Null-aware, append-only typed cell storage
//!
//! A `SparseVector<T>` keeps a dense `Vec<T>` alongside a null [`BitVec`];
//! null slots hold `T::default()` and are masked on read. Columns flagged
//! non-null skip the mask entirely via [`SparseVector::get_non_null`].

use crate::table::BitVec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparseVector<T> {
    data: Vec<T>,
    nulls: BitVec,
}

impl<T: Copy + Default> SparseVector<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            nulls: BitVec::new(),
        }
    }

    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            data: Vec::with_capacity(capacity as usize),
            nulls: BitVec::with_capacity(capacity),
        }
    }

    /// Append a non-null cell - O(1) amortized
    #[inline]
    pub fn push(&mut self, value: T) {
        self.data.push(value);
        self.nulls.push(false);
    }

    /// Append a null cell
    #[inline]
    pub fn push_null(&mut self) {
        self.data.push(T::default());
        self.nulls.push(true);
    }

    /// Number of slots, null slots included.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_null(&self, idx: u32) -> bool {
        self.nulls.get(idx)
    }

    /// Null-aware read. Panics on an out-of-range index.
    #[inline]
    pub fn get(&self, idx: u32) -> Option<T> {
        if self.nulls.get(idx) {
            None
        } else {
            Some(self.data[idx as usize])
        }
    }

    /// Read a slot the caller asserts is non-null, skipping the mask check.
    /// The precondition is verified in debug builds only.
    #[inline]
    pub fn get_non_null(&self, idx: u32) -> T {
        debug_assert!(!self.nulls.get(idx), "slot {} is null", idx);
        self.data[idx as usize]
    }
}

impl<T: Copy + Default> FromIterator<Option<T>> for SparseVector<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        let mut sv = SparseVector::new();
        for cell in iter {
            match cell {
                Some(v) => sv.push(v),
                None => sv.push_null(),
            }
        }
        sv
    }
}
