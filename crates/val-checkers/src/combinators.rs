//! Higher-order helpers and sequence combinators.
//!
//! Sequence combinators take the checks to combine as one collection so
//! nothing else in the catalog needs to accept lists of checks.

use crate::mold::Mold;
use val_kernel::{Check, ComposedCheck, ComposedKind, ResultMap, code};

/// Always clean.
pub fn pass() -> Check {
    Check::named("pass", |_, _| Ok(ResultMap::clean()))
}

/// Always reports the mold's result.
///
/// Defaults: key `fail`, msg `failed because you said so`, code `ILLEGAL_VALUE`.
pub fn fail(mold: Mold) -> Check {
    let mold = mold
        .with_default_key("fail")
        .with_default_msg("failed because you said so")
        .with_default_code(code::ILLEGAL_VALUE);
    Check::named("fail", move |input, _| mold.render(input))
}

/// Clean exactly when `check` is not.
///
/// Defaults: msg `is not allowed`, code `ILLEGAL_VALUE`.
pub fn not(mold: Mold, check: Check) -> Check {
    let mold = mold
        .with_default_msg("is not allowed")
        .with_default_code(code::ILLEGAL_VALUE);
    Check::named("not", move |input, ctx| {
        if check.call(input, ctx)?.is_clean() {
            mold.render(input)
        } else {
            Ok(ResultMap::clean())
        }
    })
}

/// Evaluate `then` only when `condition` is clean.
pub fn when(condition: Check, then: Check) -> Check {
    Check::named("when", move |input, ctx| {
        if condition.call(input, ctx)?.is_clean() {
            then.call(input, ctx)
        } else {
            Ok(ResultMap::clean())
        }
    })
}

/// Evaluate `then` only when `condition` is not clean.
pub fn unless(condition: Check, then: Check) -> Check {
    Check::named("unless", move |input, ctx| {
        if condition.call(input, ctx)?.is_clean() {
            Ok(ResultMap::clean())
        } else {
            then.call(input, ctx)
        }
    })
}

/// Evaluate every check and merge all results.
pub fn all(checks: impl IntoIterator<Item = Check>) -> Check {
    Check::Composed(ComposedCheck::new(ComposedKind::All, checks))
}

/// Stop at the first non-clean result.
pub fn and(checks: impl IntoIterator<Item = Check>) -> Check {
    Check::Composed(ComposedCheck::new(ComposedKind::And, checks))
}

/// Stop at the first clean result, otherwise report the last one.
pub fn or(checks: impl IntoIterator<Item = Check>) -> Check {
    Check::Composed(ComposedCheck::new(ComposedKind::Or, checks))
}
