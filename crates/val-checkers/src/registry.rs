//! Rule name -> check factory registry.
//!
//! Trees built from configuration name their rules; the registry resolves
//! each name to a factory when the tree is built. Extending the catalog means
//! registering another factory before building.

use crate::combinators::{fail, pass};
use crate::mold::Mold;
use crate::predicates::{
    has_only_fields, in_range, includes_pattern, is_enum, is_instance_of, is_not_null, is_null,
    is_one_of, matches_stashed, max_length, min_length,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use val_kernel::{Check, ValError, ValueKind};

/// Configuration of one rule: its registry name plus mold fields
/// (`key`, `msg`, `code`) and rule-specific parameters, side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub rule: String,

    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl RuleConfig {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// The mold described by the `key`, `msg`, and `code` parameters.
    pub fn mold(&self) -> Result<Mold, ValError> {
        let mut mold = Mold::new();
        if let Some(key) = self.opt_str_param("key")? {
            mold = mold.with_key(key);
        }
        if let Some(msg) = self.opt_str_param("msg")? {
            mold = mold.with_msg(msg);
        }
        if let Some(code) = self.opt_str_param("code")? {
            mold = mold.with_code(code);
        }
        Ok(mold)
    }

    pub fn str_param(&self, name: &str) -> Result<&str, ValError> {
        self.opt_str_param(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn opt_str_param(&self, name: &str) -> Result<Option<&str>, ValError> {
        match self.param(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.mistyped(name, "a string")),
        }
    }

    pub fn usize_param(&self, name: &str) -> Result<usize, ValError> {
        let value = self.param(name).ok_or_else(|| self.missing(name))?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.mistyped(name, "a non-negative integer"))
    }

    pub fn opt_f64_param(&self, name: &str) -> Result<Option<f64>, ValError> {
        match self.param(name) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.mistyped(name, "a number")),
        }
    }

    pub fn array_param(&self, name: &str) -> Result<&[Value], ValError> {
        match self.param(name) {
            None => Err(self.missing(name)),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.mistyped(name, "an array")),
        }
    }

    pub fn string_list_param(&self, name: &str) -> Result<Vec<String>, ValError> {
        self.array_param(name)?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.mistyped(name, "an array of strings"))
            })
            .collect()
    }

    fn missing(&self, name: &str) -> ValError {
        ValError::invalid(format!("rule `{}` requires parameter `{name}`", self.rule))
    }

    fn mistyped(&self, name: &str, expected: &str) -> ValError {
        ValError::invalid(format!(
            "rule `{}` parameter `{name}` must be {expected}",
            self.rule
        ))
    }
}

/// Builds a check from its configuration.
pub type RuleFactory = Arc<dyn Fn(&RuleConfig) -> Result<Check, ValError> + Send + Sync>;

type BuiltinFactory = fn(&RuleConfig) -> Result<Check, ValError>;

/// Built-in rules, in registration order.
pub const BUILTIN_RULES: &[(&str, BuiltinFactory)] = &[
    ("pass", |_| Ok(pass())),
    ("fail", |c| Ok(fail(c.mold()?))),
    ("is_null", |c| Ok(is_null(c.mold()?))),
    ("is_not_null", |c| Ok(is_not_null(c.mold()?))),
    ("is_instance_of", build_is_instance_of),
    ("includes_pattern", |c| {
        includes_pattern(c.mold()?, c.str_param("pattern")?)
    }),
    ("is_one_of", |c| {
        Ok(is_one_of(c.mold()?, c.array_param("values")?.to_vec()))
    }),
    ("is_enum", |c| {
        Ok(is_enum(c.mold()?, c.string_list_param("variants")?))
    }),
    ("has_only_fields", |c| {
        Ok(has_only_fields(c.mold()?, c.string_list_param("fields")?))
    }),
    ("min_length", |c| Ok(min_length(c.mold()?, c.usize_param("min")?))),
    ("max_length", |c| Ok(max_length(c.mold()?, c.usize_param("max")?))),
    ("in_range", |c| {
        in_range(c.mold()?, c.opt_f64_param("min")?, c.opt_f64_param("max")?)
    }),
    ("matches_stashed", |c| {
        Ok(matches_stashed(c.mold()?, c.str_param("stash")?))
    }),
];

fn build_is_instance_of(config: &RuleConfig) -> Result<Check, ValError> {
    let kind: ValueKind = config
        .str_param("type")?
        .parse()
        .map_err(ValError::InvalidArgument)?;
    Ok(is_instance_of(config.mold()?, kind))
}

/// Named rule factories.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    factories: IndexMap<String, RuleFactory>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every rule in [`BUILTIN_RULES`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, factory) in BUILTIN_RULES {
            registry
                .factories
                .insert((*name).to_string(), Arc::new(*factory));
        }
        registry
    }

    /// Register `factory` under `name`, replacing any previous factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), ValError>
    where
        F: Fn(&RuleConfig) -> Result<Check, ValError> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(ValError::invalid("rule name must not be empty"));
        }
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(rule = name.as_str(), "replaced registered rule");
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Resolve `config.rule` and build its check.
    pub fn build(&self, config: &RuleConfig) -> Result<Check, ValError> {
        let factory = self
            .factories
            .get(&config.rule)
            .ok_or_else(|| ValError::UnknownRule(config.rule.clone()))?;
        factory(config)
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
