//! The composable validation unit.
//!
//! A [`Check`] is a function `(input, context) -> ResultMap`. Checks are
//! immutable: combinators build new checks and leave their operands alone.
//! Cloning a check is cheap; clones share the same underlying node.
//!
//! The three combinators define the algebra:
//!
//! | combinator | evaluates `other` when          | returns                     |
//! |------------|---------------------------------|-----------------------------|
//! | `and`      | `self` is clean                 | first non-clean, else clean |
//! | `or`       | `self` is not clean             | first clean, else the last  |
//! | `plus`     | always                          | `self + other`              |

use crate::composed::{ComposedCheck, ComposedKind};
use crate::context::EvalContext;
use crate::error::ValError;
use crate::result_map::ResultMap;
use crate::transformer::TransformerCheck;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Signature of a leaf check.
pub type CheckFn =
    dyn Fn(&Value, &mut EvalContext) -> Result<ResultMap, ValError> + Send + Sync;

/// A node in a check tree.
#[derive(Clone)]
pub enum Check {
    /// Leaf check backed by a closure.
    Predicate(Predicate),

    /// Ordered members combined by an And/Or/All rule.
    Composed(ComposedCheck),

    /// One nested check evaluated against a transformed view of the input.
    Transformer(TransformerCheck),
}

/// A leaf check.
#[derive(Clone)]
pub struct Predicate {
    name: Cow<'static, str>,
    func: Arc<CheckFn>,
}

impl Predicate {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Check::Predicate(p) => p.fmt(f),
            Check::Composed(c) => c.fmt(f),
            Check::Transformer(t) => t.fmt(f),
        }
    }
}

impl Check {
    /// Wrap a closure as an anonymous leaf check.
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&Value, &mut EvalContext) -> Result<ResultMap, ValError> + Send + Sync + 'static,
    {
        Self::named("fn", func)
    }

    /// Wrap a closure as a leaf check with a diagnostic name.
    pub fn named<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&Value, &mut EvalContext) -> Result<ResultMap, ValError> + Send + Sync + 'static,
    {
        Check::Predicate(Predicate {
            name: name.into(),
            func: Arc::new(func),
        })
    }

    /// Evaluate `input`. Validation feedback is the `Ok` value; `Err` means
    /// the tree itself is misconfigured for this input.
    pub fn call(&self, input: &Value, ctx: &mut EvalContext) -> Result<ResultMap, ValError> {
        match self {
            Check::Predicate(p) => (p.func)(input, ctx),
            Check::Composed(c) => c.call(input, ctx),
            Check::Transformer(t) => t.call(input, ctx),
        }
    }

    /// Evaluate `input` with a fresh context.
    pub fn evaluate(&self, input: &Value) -> Result<ResultMap, ValError> {
        let span = tracing::debug_span!("evaluate", check = self.label());
        let _guard = span.enter();
        let mut ctx = EvalContext::new();
        let result = self.call(input, &mut ctx);
        match &result {
            Ok(map) => tracing::debug!(
                clean = map.is_clean(),
                results = map.result_count(),
                "evaluation finished"
            ),
            Err(err) => tracing::debug!(error = %err, "evaluation aborted"),
        }
        result
    }

    /// Short-circuiting logical AND of `self` then `other`.
    pub fn and(self, other: Check) -> Check {
        Check::Composed(ComposedCheck::merge(ComposedKind::And, self, other))
    }

    /// Short-circuiting logical OR of `self` then `other`.
    pub fn or(self, other: Check) -> Check {
        Check::Composed(ComposedCheck::merge(ComposedKind::Or, self, other))
    }

    /// Evaluate both and merge, `self`'s results first.
    pub fn plus(self, other: Check) -> Check {
        Check::Composed(ComposedCheck::merge(ComposedKind::All, self, other))
    }

    /// Evaluate `nested` against the input unchanged.
    pub fn nop(nested: Check) -> Check {
        Check::Transformer(TransformerCheck::nop(nested))
    }

    /// Evaluate `nested` against the child `name` of the input.
    pub fn child(name: impl Into<String>, nested: Check) -> Check {
        Check::Transformer(TransformerCheck::child(name, nested))
    }

    /// Members of a composed check; `None` for other variants.
    pub fn members(&self) -> Option<&[Check]> {
        match self {
            Check::Composed(c) => Some(c.members()),
            _ => None,
        }
    }

    pub fn as_composed(&self) -> Option<&ComposedCheck> {
        match self {
            Check::Composed(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_transformer(&self) -> Option<&TransformerCheck> {
        match self {
            Check::Transformer(t) => Some(t),
            _ => None,
        }
    }

    /// Whether `self` and `other` are clones of the same node.
    ///
    /// For introspection only; checks have no equality beyond behavior.
    pub fn ptr_eq(&self, other: &Check) -> bool {
        match (self, other) {
            (Check::Predicate(a), Check::Predicate(b)) => Arc::ptr_eq(&a.func, &b.func),
            (Check::Composed(a), Check::Composed(b)) => a.ptr_eq(b),
            (Check::Transformer(a), Check::Transformer(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    fn label(&self) -> &str {
        match self {
            Check::Predicate(p) => p.name(),
            Check::Composed(c) => c.kind().as_str(),
            Check::Transformer(t) => t.transform().as_str(),
        }
    }
}
