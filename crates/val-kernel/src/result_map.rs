//! The aggregation monoid.
//!
//! A [`ResultMap`] groups [`CheckResult`]s by key (normally the path of the
//! field being checked). An empty map is *clean*: nothing had anything to say.
//! `plus` merges two maps and has the clean map as its identity.
//!
//! ## Merge order
//!
//! Order follows left-to-right encounter:
//!
//! - keys of the left operand keep their order and their result lists;
//! - results of the right operand are appended to matching keys, in the
//!   right operand's order;
//! - keys only present on the right follow all left keys, in right order.
//!
//! Under this rule `(a + b) + c` and `a + (b + c)` agree on every per-key list
//! and on the key sequence itself.

use crate::error::ValError;
use crate::result::CheckResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign};

/// Immutable mapping from key to the ordered results reported for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, Vec<CheckResult>>")]
pub struct ResultMap {
    values: IndexMap<String, Vec<CheckResult>>,
}

impl TryFrom<IndexMap<String, Vec<CheckResult>>> for ResultMap {
    type Error = ValError;

    fn try_from(map: IndexMap<String, Vec<CheckResult>>) -> Result<Self, Self::Error> {
        Self::from_map(map)
    }
}

impl Serialize for ResultMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl ResultMap {
    /// The clean map: no entries.
    ///
    /// Clean maps do not allocate. Identity of the returned value carries no
    /// meaning; use [`ResultMap::is_clean`].
    pub fn clean() -> Self {
        Self::default()
    }

    /// Build a map from key/result-list entries.
    ///
    /// Keys must be non-empty and every list must hold at least one result.
    /// Repeated keys concatenate in encounter order.
    pub fn from_map<I, K>(entries: I) -> Result<Self, ValError>
    where
        I: IntoIterator<Item = (K, Vec<CheckResult>)>,
        K: Into<String>,
    {
        let mut values: IndexMap<String, Vec<CheckResult>> = IndexMap::new();
        for (key, results) in entries {
            let key = key.into();
            if key.is_empty() {
                return Err(ValError::invalid("result map key must not be empty"));
            }
            if results.is_empty() {
                return Err(ValError::invalid(format!(
                    "result list for key `{key}` must not be empty"
                )));
            }
            values.entry(key).or_default().extend(results);
        }
        Ok(Self { values })
    }

    /// Build a single-entry map.
    pub fn single(key: impl Into<String>, results: Vec<CheckResult>) -> Result<Self, ValError> {
        Self::from_map([(key.into(), results)])
    }

    /// Build a map holding exactly one result.
    pub fn of(key: impl Into<String>, result: CheckResult) -> Result<Self, ValError> {
        Self::single(key, vec![result])
    }

    /// True iff the map has no entries.
    pub fn is_clean(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of the entries.
    pub fn as_map(&self) -> &IndexMap<String, Vec<CheckResult>> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&[CheckResult]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CheckResult])> {
        self.values
            .iter()
            .map(|(key, results)| (key.as_str(), results.as_slice()))
    }

    /// Total number of results across all keys.
    pub fn result_count(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    /// Merge `other` into a new map. See the module docs for ordering.
    ///
    /// When either side is clean the other side is returned as is.
    pub fn plus(self, other: ResultMap) -> ResultMap {
        if other.is_clean() {
            return self;
        }
        if self.is_clean() {
            return other;
        }
        let mut values = self.values;
        for (key, results) in other.values {
            values.entry(key).or_default().extend(results);
        }
        ResultMap { values }
    }
}

impl Add for ResultMap {
    type Output = ResultMap;

    fn add(self, rhs: ResultMap) -> ResultMap {
        self.plus(rhs)
    }
}

impl AddAssign for ResultMap {
    fn add_assign(&mut self, rhs: ResultMap) {
        let lhs = std::mem::take(self);
        *self = lhs.plus(rhs);
    }
}

impl std::iter::Sum for ResultMap {
    fn sum<I: Iterator<Item = ResultMap>>(iter: I) -> Self {
        iter.fold(ResultMap::clean(), ResultMap::plus)
    }
}

// Consistent with `PartialEq`: key order is ignored, list order is not.
impl Hash for ResultMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut entries: Vec<(&String, &Vec<CheckResult>)> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.len().hash(state);
        for (key, results) in entries {
            key.hash(state);
            results.hash(state);
        }
    }
}

impl std::fmt::Display for ResultMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResultMap:{")?;
        for (i, (key, results)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: [")?;
            for (j, result) in results.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{result}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("}")
    }
}
