//! Result molds.
//!
//! A [`Mold`] says how a failing predicate reports itself: the `key` the
//! result is grouped under, the human `msg`, and the machine `code`. Each
//! predicate fills in its own defaults for fields the caller left out.
//!
//! Messages may reference the evaluated value as `{value}`. Predicates may
//! offer further placeholders (for example `{field}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use val_kernel::value::display_value;
use val_kernel::{CheckResult, ResultMap, ValError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    msg: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl Mold {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mold grouping results under `key`.
    pub fn keyed(key: impl Into<String>) -> Self {
        Self::new().with_key(key)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set `key` only if absent.
    pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
        self.key.get_or_insert_with(|| key.into());
        self
    }

    /// Set `msg` only if absent.
    pub fn with_default_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg.get_or_insert_with(|| msg.into());
        self
    }

    /// Set `code` only if absent.
    pub fn with_default_code(mut self, code: impl Into<String>) -> Self {
        self.code.get_or_insert_with(|| code.into());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Build the single-result map reported when a predicate fails on `input`.
    pub fn render(&self, input: &Value) -> Result<ResultMap, ValError> {
        self.render_each(input, [&[] as &[(&str, &str)]])
    }

    /// Build one result per placeholder set, all under this mold's key.
    pub fn render_each<'v, I>(&self, input: &Value, vars: I) -> Result<ResultMap, ValError>
    where
        I: IntoIterator<Item = &'v [(&'v str, &'v str)]>,
    {
        let key = required(self.key(), "key")?;
        let msg = required(self.msg(), "msg")?;
        let code = required(self.code(), "code")?;
        let results = vars
            .into_iter()
            .map(|vars| CheckResult::new(expand(msg, input, vars), code))
            .collect::<Result<Vec<_>, _>>()?;
        ResultMap::single(key, results)
    }
}

fn required<'a>(field: Option<&'a str>, name: &str) -> Result<&'a str, ValError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValError::invalid(format!("mold {name} must be present"))),
    }
}

/// Substitute placeholders in one pass, so substituted text is never expanded
/// again. Unknown placeholders are kept verbatim.
fn expand(template: &str, input: &Value, vars: &[(&str, &str)]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        message.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        if name == "value" {
            message.push_str(&display_value(input));
        } else if let Some((_, value)) = vars.iter().find(|(var, _)| *var == name) {
            message.push_str(value);
        } else {
            message.push('{');
            message.push_str(name);
            message.push('}');
        }
        rest = &after[close + 1..];
    }
    message.push_str(rest);
    message
}
