//! Ordered subset/permutation of storage row indices
//!
//! A `RowMap` is conceptually a strictly increasing sequence of storage
//! indices, or a permutation of one when used as a sort cursor. Three internal
//! representations are kept, chosen by cost: a contiguous range, a bitmap
//! (bit position = storage index), and an explicit index vector. Operations
//! are representation-agnostic and may promote silently (a filtered range
//! becomes a bitmap).

use crate::table::BitVec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Repr {
    Range { start: u32, end: u32 },
    Bitmap(BitVec),
    Indices(Vec<u32>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowMap {
    repr: Repr,
}

impl RowMap {
    pub fn empty() -> Self {
        Self::range(0, 0)
    }

    /// The half-open range of storage indices `[start, end)`.
    pub fn range(start: u32, end: u32) -> Self {
        assert!(start <= end, "invalid row range [{}, {})", start, end);
        Self {
            repr: Repr::Range { start, end },
        }
    }

    /// The full identity map over `size` rows.
    pub fn all(size: u32) -> Self {
        Self::range(0, size)
    }

    pub fn single_row(row: u32) -> Self {
        Self::range(row, row + 1)
    }

    pub fn from_indices(indices: Vec<u32>) -> Self {
        Self {
            repr: Repr::Indices(indices),
        }
    }

    pub fn from_bit_vec(bits: BitVec) -> Self {
        Self {
            repr: Repr::Bitmap(bits),
        }
    }

    pub fn size(&self) -> u32 {
        match &self.repr {
            Repr::Range { start, end } => end - start,
            Repr::Bitmap(bv) => bv.count_ones(),
            Repr::Indices(v) => v.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The storage index at position `k`. Panics if `k >= size()`.
    pub fn get(&self, k: u32) -> u32 {
        match &self.repr {
            Repr::Range { start, end } => {
                assert!(k < end - start, "row {} out of range", k);
                start + k
            }
            Repr::Bitmap(bv) => bv
                .nth_set(k)
                .unwrap_or_else(|| panic!("row {} out of range", k)),
            Repr::Indices(v) => v[k as usize],
        }
    }

    pub fn contains(&self, storage_idx: u32) -> bool {
        match &self.repr {
            Repr::Range { start, end } => storage_idx >= *start && storage_idx < *end,
            Repr::Bitmap(bv) => bv.get(storage_idx),
            Repr::Indices(v) => v.contains(&storage_idx),
        }
    }

    /// Position of `storage_idx` in the map, or `None` if absent. Ranges and
    /// bitmaps answer in O(1)/O(words); index vectors scan.
    pub fn index_of(&self, storage_idx: u32) -> Option<u32> {
        match &self.repr {
            Repr::Range { start, end } => {
                (storage_idx >= *start && storage_idx < *end).then(|| storage_idx - start)
            }
            Repr::Bitmap(bv) => bv.get(storage_idx).then(|| bv.rank(storage_idx)),
            Repr::Indices(v) => v
                .iter()
                .position(|&idx| idx == storage_idx)
                .map(|pos| pos as u32),
        }
    }

    /// Keep only storage indices present in both maps; stable with respect to
    /// `self`'s order.
    pub fn intersect(&mut self, other: &RowMap) {
        if let (Repr::Range { start: a0, end: a1 }, Repr::Range { start: b0, end: b1 }) =
            (&self.repr, &other.repr)
        {
            let start = (*a0).max(*b0);
            let end = (*a1).min(*b1);
            self.repr = Repr::Range {
                start,
                end: end.max(start),
            };
            return;
        }
        self.filter_into(|idx| other.contains(idx));
    }

    /// In-place stable narrowing: keep position `k` iff `predicate(get(k))`.
    /// The predicate receives storage indices. A range promotes to a bitmap;
    /// other representations are kept.
    pub fn filter_into(&mut self, predicate: impl Fn(u32) -> bool) {
        match &mut self.repr {
            Repr::Range { start, end } => {
                let mut bv = BitVec::with_capacity(*end);
                bv.extend_false(*start);
                for idx in *start..*end {
                    bv.push(predicate(idx));
                }
                self.repr = Repr::Bitmap(bv);
            }
            Repr::Bitmap(bv) => {
                let mut out = BitVec::new();
                for idx in bv.iter_ones() {
                    out.extend_false(idx - out.len());
                    out.push(predicate(idx));
                }
                *bv = out;
            }
            Repr::Indices(v) => {
                v.retain(|&idx| predicate(idx));
            }
        }
    }

    /// Stably sort `out` (entries are positions into this map) by comparing
    /// the storage indices those positions project to.
    pub fn stable_sort(&self, out: &mut [u32], cmp: impl Fn(u32, u32) -> Ordering) {
        out.sort_by(|&a, &b| cmp(self.get(a), self.get(b)));
    }

    /// Iterate storage indices in map order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match &self.repr {
            Repr::Range { start, end } => Box::new(*start..*end),
            Repr::Bitmap(bv) => Box::new(bv.iter_ones()),
            Repr::Indices(v) => Box::new(v.iter().copied()),
        }
    }
}

impl PartialEq for RowMap {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for RowMap {}
