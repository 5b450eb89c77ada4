//! Per-evaluation context.
//!
//! An [`EvalContext`] is created for one top-level evaluation, threaded by
//! `&mut` through every check in the tree, and dropped afterwards. Its stash
//! lets a check publish a value that later checks in the same evaluation can
//! read regardless of their position in the tree (cross-field rules).
//!
//! Check trees hold no per-evaluation state, so one tree may serve many
//! concurrent evaluations as long as each has its own context.

use crate::error::ValError;
use serde_json::Value;
use std::collections::HashMap;

/// Keyed scratch storage for a single evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalContext {
    stashed: HashMap<String, Value>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stashed value.
    pub fn get_stashed(&self, key: &str) -> Option<&Value> {
        self.stashed.get(key)
    }

    /// Stash `value` under `key`, returning the value it replaced.
    ///
    /// JSON `null` is a storable value; an empty key is rejected.
    pub fn set_stashed(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, ValError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValError::invalid("stash key must not be empty"));
        }
        Ok(self.stashed.insert(key, value))
    }

    /// Read-only view of everything stashed so far.
    pub fn stashed(&self) -> &HashMap<String, Value> {
        &self.stashed
    }
}
