//! Shared string interning for string columns
//!
//! Every string column stores [`StringId`]s in its backing vector; the actual
//! bytes live once in a process-wide pool. Id 0 is reserved as the null/empty
//! sentinel, so a lookup returning `None` is the null marker for string cells.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of an interned string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StringId(u32);

impl StringId {
    /// The reserved null/empty sentinel.
    pub const NULL: StringId = StringId(0);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl Default for StringId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Intern table mapping byte strings to small ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringPool {
    /// Interned strings; slot 0 is the unused null sentinel.
    strings: Vec<String>,
    /// Bytes -> id index for idempotent interning.
    index: AHashMap<String, StringId>,
}

impl StringPool {
    pub fn new() -> Self {
        Self {
            strings: vec![String::new()],
            index: AHashMap::new(),
        }
    }

    /// Intern a string, returning its id. Idempotent: the same bytes always
    /// produce the same id. The empty string interns to [`StringId::NULL`].
    pub fn intern(&mut self, s: &str) -> StringId {
        if s.is_empty() {
            return StringId::NULL;
        }
        if let Some(&id) = self.index.get(s) {
            return id;
        }
        let id = StringId(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.index.insert(s.to_owned(), id);
        id
    }

    /// Look up an id. `None` denotes the null string; when cells are compared
    /// through `Option<&str>`, `None < Some(_)` gives null views the minimum
    /// position required by the column ordering.
    pub fn get(&self, id: StringId) -> Option<&str> {
        if id.is_null() {
            return None;
        }
        let slot = id.raw() as usize;
        debug_assert!(slot < self.strings.len(), "StringId {} not interned", id.raw());
        self.strings.get(slot).map(String::as_str)
    }

    /// Number of interned strings, the sentinel excluded.
    pub fn len(&self) -> usize {
        self.strings.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}
