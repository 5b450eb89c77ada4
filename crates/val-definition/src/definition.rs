//! The definition builder.
//!
//! A [`Definition`] collects the checks for one node of an input graph and
//! assembles them into a tree:
//!
//! ```text
//! Transformer(Nop | Child(name), stash?)
//!   └── And(require..., All(rules...))     with preconditions
//!   └── All(rules...)                      without
//! ```
//!
//! Child definitions are rules of their parent, so their results merge with
//! the parent's other rules in declaration order.

use std::fmt;
use val_checkers::{RuleConfig, RuleRegistry};
use val_kernel::{Check, ComposedCheck, ComposedKind, Transform, TransformerCheck, ValError};

#[derive(Clone)]
enum Member {
    Check(Check),
    Rule(RuleConfig),
    Child { name: String, definition: Definition },
}

impl Member {
    fn resolve(&self, registry: &RuleRegistry) -> Result<Check, ValError> {
        match self {
            Member::Check(check) => Ok(check.clone()),
            Member::Rule(config) => registry.build(config),
            Member::Child { name, definition } => {
                definition.assemble(Transform::Child(name.clone()), registry)
            }
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Check(check) => f.debug_tuple("Check").field(check).finish(),
            Member::Rule(config) => f.debug_tuple("Rule").field(&config.rule).finish(),
            Member::Child { name, definition } => f
                .debug_struct("Child")
                .field("name", name)
                .field("definition", definition)
                .finish(),
        }
    }
}

/// Builder for a check tree rooted at one input node.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    stash: Option<String>,
    requires: Vec<Member>,
    rules: Vec<Member>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule.
    pub fn define(mut self, check: Check) -> Self {
        self.rules.push(Member::Check(check));
        self
    }

    /// Add a rule resolved from the registry at build time.
    pub fn rule(mut self, config: RuleConfig) -> Self {
        self.rules.push(Member::Rule(config));
        self
    }

    /// Add a precondition. Rules only run when every precondition is clean.
    pub fn require(mut self, check: Check) -> Self {
        self.requires.push(Member::Check(check));
        self
    }

    pub fn require_rule(mut self, config: RuleConfig) -> Self {
        self.requires.push(Member::Rule(config));
        self
    }

    /// Add a rule that checks the named child of the input.
    pub fn child<F>(mut self, name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(Definition) -> Definition,
    {
        self.rules.push(Member::Child {
            name: name.into(),
            definition: build(Definition::new()),
        });
        self
    }

    /// Stash this node's input under `key` before its checks run.
    pub fn stash(mut self, key: impl Into<String>) -> Self {
        self.stash = Some(key.into());
        self
    }

    /// Build with the built-in rule catalog.
    pub fn build(&self) -> Result<Check, ValError> {
        self.build_with(&RuleRegistry::with_builtins())
    }

    /// Build, resolving named rules through `registry`.
    pub fn build_with(&self, registry: &RuleRegistry) -> Result<Check, ValError> {
        let _span = tracing::debug_span!("definition.build").entered();
        let check = self.assemble(Transform::Nop, registry)?;
        tracing::debug!(
            requires = self.requires.len(),
            rules = self.rules.len(),
            "built definition"
        );
        Ok(check)
    }

    fn assemble(&self, transform: Transform, registry: &RuleRegistry) -> Result<Check, ValError> {
        let rules = self
            .rules
            .iter()
            .map(|member| member.resolve(registry))
            .collect::<Result<Vec<_>, _>>()?;
        let body = Check::Composed(ComposedCheck::new(ComposedKind::All, rules));

        let body = if self.requires.is_empty() {
            body
        } else {
            let mut guarded = self
                .requires
                .iter()
                .map(|member| member.resolve(registry))
                .collect::<Result<Vec<_>, _>>()?;
            guarded.push(body);
            Check::Composed(ComposedCheck::new(ComposedKind::And, guarded))
        };

        let node = TransformerCheck::new(transform, body);
        let node = match &self.stash {
            Some(key) => node.with_stash(key.as_str())?,
            None => node,
        };
        Ok(node.into())
    }
}
