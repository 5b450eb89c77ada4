//! The predicate catalog.
//!
//! Every predicate takes a [`Mold`] and fills in its own default `msg` and
//! `code`; the caller always chooses the `key`. Unless noted otherwise a null
//! input passes, so presence is expressed separately with [`is_not_null`].

use crate::mold::Mold;
use crate::satisfies::{guarded, predicate};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use val_kernel::value::display_value;
use val_kernel::{Check, ResultMap, ValError, ValueKind, code};

/// Input must be null.
pub fn is_null(mold: Mold) -> Check {
    let mold = mold
        .with_default_msg("must be null")
        .with_default_code(code::ILLEGAL_VALUE);
    predicate("is_null", mold, |v, _| v.is_null())
}

/// Input must not be null. Fails on null.
pub fn is_not_null(mold: Mold) -> Check {
    let mold = mold
        .with_default_msg("required field cannot be null")
        .with_default_code(code::REQUIRED_FIELD);
    predicate("is_not_null", mold, |v, _| !v.is_null())
}

/// Input must be of `kind`. Fails on null unless `kind` is `Null`.
pub fn is_instance_of(mold: Mold, kind: ValueKind) -> Check {
    let mold = mold
        .with_default_msg(format!("must be of type {kind}"))
        .with_default_code(code::ILLEGAL_VALUE);
    predicate("is_instance_of", mold, move |v, _| kind.admits(v))
}

/// The string form of the input must match `pattern` in full.
///
/// Strings match on their raw text, other values on their compact JSON.
pub fn includes_pattern(mold: Mold, pattern: &str) -> Result<Check, ValError> {
    let regex = Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| ValError::invalid(format!("invalid pattern `{pattern}`: {e}")))?;
    let mold = mold
        .with_default_msg("does not match required pattern")
        .with_default_code(code::ILLEGAL_VALUE);
    Ok(predicate("includes_pattern", mold, move |v, _| {
        v.is_null() || regex.is_match(&display_value(v))
    }))
}

/// Input must equal one of `allowed`.
pub fn is_one_of(mold: Mold, allowed: Vec<Value>) -> Check {
    let mold = mold
        .with_default_msg("is not one of the allowed values")
        .with_default_code(code::ILLEGAL_VALUE);
    predicate("is_one_of", mold, move |v, _| {
        v.is_null() || allowed.contains(v)
    })
}

/// Input must be a string naming one of `variants`.
pub fn is_enum<I, S>(mold: Mold, variants: I) -> Check
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let variants: BTreeSet<String> = variants.into_iter().map(Into::into).collect();
    let mold = mold
        .with_default_msg("is not a recognized value")
        .with_default_code(code::ILLEGAL_VALUE);
    predicate("is_enum", mold, move |v, _| match v {
        Value::Null => true,
        Value::String(s) => variants.contains(s),
        _ => false,
    })
}

/// An object input may only contain `fields`.
///
/// Reports one result per unrecognized field, in input order; `{field}` in
/// the message names it. Inputs that are not objects are not inspected.
pub fn has_only_fields<I, S>(mold: Mold, fields: I) -> Check
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: BTreeSet<String> = fields.into_iter().map(Into::into).collect();
    let allowed = fields.clone();
    let mold = mold
        .with_default_msg("contains unrecognized field {field}")
        .with_default_code(code::ILLEGAL_FIELD);
    guarded(
        "has_only_fields",
        move |v, _| match v {
            Value::Object(map) => map.keys().all(|k| allowed.contains(k)),
            _ => true,
        },
        move |v, _| {
            let Value::Object(map) = v else {
                return Ok(ResultMap::clean());
            };
            let vars: Vec<[(&str, &str); 1]> = map
                .keys()
                .filter(|k| !fields.contains(*k))
                .map(|k| [("field", k.as_str())])
                .collect();
            mold.render_each(v, vars.iter().map(|set| set.as_slice()))
        },
    )
}

/// Strings, arrays, and objects must have at least `min` elements.
///
/// String length counts chars. Other kinds are not length-checked.
pub fn min_length(mold: Mold, min: usize) -> Check {
    let mold = mold
        .with_default_msg(format!("is shorter than {min}"))
        .with_default_code(code::TOO_SHORT);
    predicate("min_length", mold, move |v, _| {
        length(v).is_none_or(|len| len >= min)
    })
}

/// Strings, arrays, and objects must have at most `max` elements.
pub fn max_length(mold: Mold, max: usize) -> Check {
    let mold = mold
        .with_default_msg(format!("is longer than {max}"))
        .with_default_code(code::TOO_LONG);
    predicate("max_length", mold, move |v, _| {
        length(v).is_none_or(|len| len <= max)
    })
}

/// Numbers must lie within the inclusive bounds. Other kinds pass.
pub fn in_range(mold: Mold, min: Option<f64>, max: Option<f64>) -> Result<Check, ValError> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(ValError::invalid(format!(
                "range minimum {lo} exceeds maximum {hi}"
            )));
        }
    }
    let mold = mold
        .with_default_msg("is out of range")
        .with_default_code(code::ILLEGAL_VALUE);
    Ok(predicate("in_range", mold, move |v, _| match v.as_f64() {
        Some(n) => min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi),
        None => true,
    }))
}

/// Input must equal the value stashed under `stash_key` earlier in the same
/// evaluation. A missing stash entry compares as null.
pub fn matches_stashed(mold: Mold, stash_key: impl Into<String>) -> Check {
    let stash_key = stash_key.into();
    let mold = mold
        .with_default_msg(format!("does not match {stash_key}"))
        .with_default_code(code::ILLEGAL_VALUE);
    predicate("matches_stashed", mold, move |v, ctx| {
        ctx.get_stashed(&stash_key)
            .map_or(v.is_null(), |stashed| stashed == v)
    })
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}
