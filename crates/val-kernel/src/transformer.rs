//! Checks that evaluate a nested check against a transformed input.
//!
//! Transformation is how a check tree walks an input graph: a
//! [`Transform::Child`] node narrows the input to one named child before
//! delegating. Any transformer may also stash the transformed value in the
//! [`EvalContext`], making it visible to every check evaluated later against
//! the same context.

use crate::check::Check;
use crate::context::EvalContext;
use crate::error::ValError;
use crate::result_map::ResultMap;
use crate::value::ValueKind;
use serde_json::Value;
use std::sync::Arc;

static NULL: Value = Value::Null;

/// How a transformer presents its input to the nested check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Identity. Gives the root of a definition a uniform node type.
    Nop,

    /// Select the named child of a keyed input.
    ///
    /// Null input selects null, as does a missing child. Inputs that are not
    /// objects cannot be traversed and fail with [`ValError::ShapeMismatch`].
    Child(String),
}

impl Transform {
    pub fn as_str(&self) -> &str {
        match self {
            Transform::Nop => "nop",
            Transform::Child(name) => name,
        }
    }

    /// Apply the transform. Borrows from `input`; nothing is copied.
    pub fn apply<'a>(&self, input: &'a Value) -> Result<&'a Value, ValError> {
        match self {
            Transform::Nop => Ok(input),
            Transform::Child(name) => match input {
                Value::Null => Ok(&NULL),
                Value::Object(map) => Ok(map.get(name).unwrap_or(&NULL)),
                other => Err(ValError::ShapeMismatch {
                    child: name.clone(),
                    found: ValueKind::of(other).as_str(),
                }),
            },
        }
    }
}

/// A transform, an optional stash key, and exactly one nested check.
#[derive(Clone)]
pub struct TransformerCheck {
    transform: Transform,
    stash_key: Option<String>,
    nested: Arc<Check>,
}

impl TransformerCheck {
    pub fn new(transform: Transform, nested: Check) -> Self {
        Self {
            transform,
            stash_key: None,
            nested: Arc::new(nested),
        }
    }

    pub fn nop(nested: Check) -> Self {
        Self::new(Transform::Nop, nested)
    }

    pub fn child(name: impl Into<String>, nested: Check) -> Self {
        Self::new(Transform::Child(name.into()), nested)
    }

    /// Stash the transformed value under `key` on every evaluation.
    pub fn with_stash(mut self, key: impl Into<String>) -> Result<Self, ValError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValError::invalid("stash key must not be empty"));
        }
        self.stash_key = Some(key);
        Ok(self)
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn stash_key(&self) -> Option<&str> {
        self.stash_key.as_deref()
    }

    pub fn nested(&self) -> &Check {
        &self.nested
    }

    pub(crate) fn ptr_eq(&self, other: &TransformerCheck) -> bool {
        Arc::ptr_eq(&self.nested, &other.nested)
            && self.transform == other.transform
            && self.stash_key == other.stash_key
    }

    pub fn call(&self, input: &Value, ctx: &mut EvalContext) -> Result<ResultMap, ValError> {
        let transformed = self.transform.apply(input)?;
        if let Some(key) = &self.stash_key {
            tracing::trace!(key = key.as_str(), "stashing transformed input");
            ctx.set_stashed(key.as_str(), transformed.clone())?;
        }
        self.nested.call(transformed, ctx)
    }
}

impl From<TransformerCheck> for Check {
    fn from(transformer: TransformerCheck) -> Self {
        Check::Transformer(transformer)
    }
}

impl std::fmt::Debug for TransformerCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerCheck")
            .field("transform", &self.transform)
            .field("stash_key", &self.stash_key)
            .field("nested", &self.nested)
            .finish()
    }
}
