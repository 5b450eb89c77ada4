//! Atomic feedback units.

use crate::error::ValError;
use serde::{Deserialize, Serialize};

/// Conventional result codes.
///
/// Codes are free-form strings; these are the ones the built-in catalog emits.
pub mod code {
    pub const ILLEGAL_VALUE: &str = "ILLEGAL_VALUE";
    pub const ILLEGAL_FIELD: &str = "ILLEGAL_FIELD";
    pub const REQUIRED_FIELD: &str = "REQUIRED_FIELD";
    pub const TOO_SHORT: &str = "TOO_SHORT";
    pub const TOO_LONG: &str = "TOO_LONG";
}

/// A single piece of feedback produced by a check.
///
/// Both fields are always present; an empty message or code is rejected at
/// construction, including when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCheckResult")]
pub struct CheckResult {
    /// Human-readable description.
    message: String,

    /// Terse, machine-friendly classification.
    code: String,
}

#[derive(Deserialize)]
struct RawCheckResult {
    message: String,
    code: String,
}

impl TryFrom<RawCheckResult> for CheckResult {
    type Error = ValError;

    fn try_from(raw: RawCheckResult) -> Result<Self, Self::Error> {
        Self::new(raw.message, raw.code)
    }
}

impl CheckResult {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Result<Self, ValError> {
        let message = message.into();
        let code = code.into();
        if message.is_empty() {
            return Err(ValError::invalid("result message must not be empty"));
        }
        if code.is_empty() {
            return Err(ValError::invalid("result code must not be empty"));
        }
        Ok(Self { message, code })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
