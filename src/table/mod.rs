//! Columnar storage primitives: bit vectors, null-aware cell storage, row
//! maps, and the typed column view built on top of them.

pub mod bit_vec;
pub mod column;
pub mod row_map;
pub mod sparse_vector;

pub use bit_vec::BitVec;
pub use column::{Column, ColumnFlags, ColumnStorage, ColumnType};
pub use row_map::RowMap;
pub use sparse_vector::SparseVector;
