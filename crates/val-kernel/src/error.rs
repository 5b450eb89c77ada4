//! Error types for kernel operations.
//!
//! Errors are reserved for defects in the check tree or its configuration.
//! Data that fails a rule is never an error: it is reported as
//! [`ResultMap`](crate::ResultMap) content.

/// Errors arising from misconfigured checks or malformed arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValError {
    /// A constructor or operation received a missing or empty argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A traversal expected a keyed structure but found another shape.
    #[error("shape mismatch: cannot select child `{child}` from {found} input")]
    ShapeMismatch { child: String, found: &'static str },

    /// A rule name was not present in the registry used to build a tree.
    #[error("unknown rule: {0}")]
    UnknownRule(String),
}

impl ValError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
