use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A row of application data.
///
/// Records are borrowed, never mutated. A record may own a named collection of
/// child records which become visible when the record is expanded.
pub trait Record {
    /// Child records stored under `children_key`, if any.
    ///
    /// Records without the field (or whose field is not a sequence) are leaves.
    fn children(&self, children_key: &str) -> Option<&[Self]>
    where
        Self: Sized;
}

impl Record for serde_json::Value {
    fn children(&self, children_key: &str) -> Option<&[Self]> {
        self.get(children_key)
            .and_then(serde_json::Value::as_array)
            .map(Vec::as_slice)
    }
}

/// Stable identity of a row across re-renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    Number(i64),
    Text(String),
}

impl RowKey {
    /// Read a key out of a JSON value (numbers and strings only).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_i64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for RowKey {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u32> for RowKey {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<usize> for RowKey {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or_else(|_| Self::Text(n.to_string()), Self::Number)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Set of row keys currently expanded. Owned by the caller.
pub type ExpandedKeys = HashSet<RowKey>;

/// One visible row of a flattened record tree.
#[derive(Debug, Serialize)]
pub struct FlatRow<'a, R> {
    pub record: &'a R,
    /// Tree depth (0 for top-level records)
    pub indent: u32,
    /// Position in the flattened sequence
    pub index: usize,
}

impl<R> Clone for FlatRow<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FlatRow<'_, R> {}

impl<R: PartialEq> PartialEq for FlatRow<'_, R> {
    fn eq(&self, other: &Self) -> bool {
        self.indent == other.indent && self.index == other.index && self.record == other.record
    }
}
