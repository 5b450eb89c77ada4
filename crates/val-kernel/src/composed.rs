//! Checks composed from an ordered sequence of member checks.
//!
//! Members are held as a flat sequence rather than a binary tree. Merging two
//! operands splices the members of any operand that is already composed with
//! the same [`ComposedKind`], one level deep; anything else becomes a single
//! opaque member. Flattening never changes what an evaluation returns.

use crate::check::Check;
use crate::context::EvalContext;
use crate::error::ValError;
use crate::result_map::ResultMap;
use serde_json::Value;
use std::sync::Arc;

/// How the members of a composed check combine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComposedKind {
    /// Stop at the first non-clean member result; clean if every member is.
    And,

    /// Stop at the first clean member result; otherwise the last member's.
    Or,

    /// Evaluate every member and merge all results in member order.
    All,
}

impl ComposedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for ComposedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A composed check.
#[derive(Clone)]
pub struct ComposedCheck {
    kind: ComposedKind,
    members: Arc<[Check]>,
}

impl ComposedCheck {
    /// Compose `members` as given; order is significant.
    pub fn new(kind: ComposedKind, members: impl IntoIterator<Item = Check>) -> Self {
        Self {
            kind,
            members: members.into_iter().collect(),
        }
    }

    /// Compose `left` then `right`, flattening operands of the same kind.
    pub fn merge(kind: ComposedKind, left: Check, right: Check) -> Self {
        let mut members = Vec::new();
        splice(kind, left, &mut members);
        splice(kind, right, &mut members);
        Self::new(kind, members)
    }

    pub fn kind(&self) -> ComposedKind {
        self.kind
    }

    pub fn members(&self) -> &[Check] {
        &self.members
    }

    pub(crate) fn ptr_eq(&self, other: &ComposedCheck) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.members, &other.members)
    }

    pub fn call(&self, input: &Value, ctx: &mut EvalContext) -> Result<ResultMap, ValError> {
        match self.kind {
            ComposedKind::And => {
                for (index, member) in self.members.iter().enumerate() {
                    let result = member.call(input, ctx)?;
                    if !result.is_clean() {
                        tracing::trace!(index, "and: stopped at first failing member");
                        return Ok(result);
                    }
                }
                Ok(ResultMap::clean())
            }
            ComposedKind::Or => {
                // An empty Or has no last result to report; it is clean.
                let mut last = ResultMap::clean();
                for (index, member) in self.members.iter().enumerate() {
                    let result = member.call(input, ctx)?;
                    if result.is_clean() {
                        tracing::trace!(index, "or: stopped at first passing member");
                        return Ok(result);
                    }
                    last = result;
                }
                Ok(last)
            }
            ComposedKind::All => {
                let mut merged = ResultMap::clean();
                for member in self.members.iter() {
                    merged = merged.plus(member.call(input, ctx)?);
                }
                Ok(merged)
            }
        }
    }
}

impl std::fmt::Debug for ComposedCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedCheck")
            .field("kind", &self.kind)
            .field("members", &self.members)
            .finish()
    }
}

fn splice(kind: ComposedKind, check: Check, out: &mut Vec<Check>) {
    match check {
        Check::Composed(composed) if composed.kind == kind => {
            out.extend(composed.members.iter().cloned());
        }
        other => out.push(other),
    }
}
