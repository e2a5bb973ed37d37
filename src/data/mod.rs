//! Value-level types shared across the column engine

pub mod string_pool;
pub mod value;

pub use string_pool::{StringId, StringPool};
pub use value::{SqlType, SqlValue};
