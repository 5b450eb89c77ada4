//! Shape classification for input values.
//!
//! Inputs are `serde_json::Value` graphs. A key/value entry is modeled as an
//! object `{"key": k, "value": v}`, so selecting `value` from an entry is an
//! ordinary child lookup.

use serde_json::Value;

/// The JSON shape of an input value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    Bool,
    /// Any JSON number.
    Number,
    /// A JSON number with no fractional part that fits in `i64` or `u64`.
    Integer,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// The most specific kind of `value`. Integral numbers report `Integer`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if is_integral(n) => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether `value` is an instance of this kind.
    ///
    /// `Number` admits integers as well; every other kind is exact.
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            kind => Self::of(value) == kind,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(Self::Null),
            "bool" | "boolean" => Ok(Self::Bool),
            "number" => Ok(Self::Number),
            "integer" | "int" => Ok(Self::Integer),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "object" | "map" => Ok(Self::Object),
            _ => Err(format!(
                "unknown value kind: {s} (expected null, bool, number, integer, string, array, object)"
            )),
        }
    }
}

/// Integer literals, and floats such as `36.0` with no fractional part that
/// lie within the `i64`/`u64` range.
fn is_integral(n: &serde_json::Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64().is_some_and(|f| {
        f.is_finite() && f.fract() == 0.0 && f >= -(2f64.powi(63)) && f < 2f64.powi(64)
    })
}

/// Build the object representation of a key/value entry.
pub fn entry(key: impl Into<String>, value: Value) -> Value {
    let mut map = serde_json::Map::new();
    map.insert("key".to_string(), Value::String(key.into()));
    map.insert("value".to_string(), value);
    Value::Object(map)
}

/// String form used when matching a value textually.
///
/// Strings render raw, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
