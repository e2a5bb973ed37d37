//! The value interchange type on the column boundary

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Observable type tag of a [`SqlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Null,
    Long,
    Double,
    String,
}

/// A single cell value as surfaced to callers.
///
/// Numeric columns surface as `Long`, string columns as `String` views into the
/// owning [`StringPool`](crate::data::StringPool), id columns as `Long`. The
/// engine never emits `Double` but accepts it as a filter operand.
///
/// Equality is SQL-style: `Null` compares unequal to every value, including
/// itself. Like `f64` with NaN, this makes `PartialEq` non-reflexive on
/// purpose; use [`SqlValue::total_cmp`] where a total order is required.
#[derive(Debug, Clone, Copy)]
pub enum SqlValue<'a> {
    Null,
    Long(i64),
    Double(f64),
    String(&'a str),
}

impl<'a> SqlValue<'a> {
    pub fn value_type(&self) -> SqlType {
        match self {
            SqlValue::Null => SqlType::Null,
            SqlValue::Long(_) => SqlType::Long,
            SqlValue::Double(_) => SqlType::Double,
            SqlValue::String(_) => SqlType::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            SqlValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            SqlValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric coercion used by the relational slow path on numeric columns:
    /// `Long` as-is, `Double` truncated, everything else zero.
    pub(crate) fn long_value(&self) -> i64 {
        match self {
            SqlValue::Long(v) => *v,
            SqlValue::Double(d) => *d as i64,
            _ => 0,
        }
    }

    /// Total order over values: type tag rank first (`Null < Long < Double <
    /// String`), then value within the same tag. Unlike `PartialEq`, this
    /// orders `Null` equal to `Null`, which is what binary search over a
    /// sorted nullable column needs.
    pub fn total_cmp(&self, other: &SqlValue) -> Ordering {
        fn rank(v: &SqlValue) -> u8 {
            match v {
                SqlValue::Null => 0,
                SqlValue::Long(_) => 1,
                SqlValue::Double(_) => 2,
                SqlValue::String(_) => 3,
            }
        }
        match (self, other) {
            (SqlValue::Long(a), SqlValue::Long(b)) => a.cmp(b),
            (SqlValue::Double(a), SqlValue::Double(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SqlValue::String(a), SqlValue::String(b)) => a.cmp(b),
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl PartialEq for SqlValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SqlValue::Long(a), SqlValue::Long(b)) => a == b,
            (SqlValue::Double(a), SqlValue::Double(b)) => a == b,
            (SqlValue::String(a), SqlValue::String(b)) => a == b,
            // Null never equals anything, itself included.
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_never_equal() {
        assert_ne!(SqlValue::Null, SqlValue::Null);
        assert_ne!(SqlValue::Null, SqlValue::Long(0));
        assert_ne!(SqlValue::Long(0), SqlValue::Null);
    }

    #[test]
    fn test_same_type_equality() {
        assert_eq!(SqlValue::Long(7), SqlValue::Long(7));
        assert_ne!(SqlValue::Long(7), SqlValue::Long(8));
        assert_eq!(SqlValue::String("a"), SqlValue::String("a"));
        // Cross-type comparisons never match, even for equal-looking numbers.
        assert_ne!(SqlValue::Long(1), SqlValue::Double(1.0));
    }

    #[test]
    fn test_total_cmp_rank() {
        assert_eq!(
            SqlValue::Null.total_cmp(&SqlValue::Null),
            Ordering::Equal
        );
        assert_eq!(
            SqlValue::Null.total_cmp(&SqlValue::Long(i64::MIN)),
            Ordering::Less
        );
        assert_eq!(
            SqlValue::Long(3).total_cmp(&SqlValue::Long(4)),
            Ordering::Less
        );
        assert_eq!(
            SqlValue::String("a").total_cmp(&SqlValue::Long(i64::MAX)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_long_value_coercion() {
        assert_eq!(SqlValue::Long(42).long_value(), 42);
        assert_eq!(SqlValue::Double(3.9).long_value(), 3);
        assert_eq!(SqlValue::Null.long_value(), 0);
    }
}
