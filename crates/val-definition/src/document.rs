//! TOML rule documents.
//!
//! A document describes one definition node. Rules are tables of
//! [`RuleConfig`]; children nest under `[children.<name>]` in document order.
//!
//! ```toml
//! [[require]]
//! rule = "is_instance_of"
//! key = "user"
//! type = "object"
//!
//! [children.password]
//! stash = "password"
//!
//! [[children.password.rules]]
//! rule = "min_length"
//! key = "password"
//! min = 8
//! ```

use crate::definition::Definition;
use crate::error::DefinitionError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use val_checkers::RuleConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stash: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require: Vec<RuleConfig>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, DefinitionDoc>,
}

impl DefinitionDoc {
    pub fn from_toml_str(text: &str) -> Result<Self, DefinitionError> {
        parse(text, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let path_text = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| DefinitionError::ReadFile {
            path: path_text.clone(),
            source,
        })?;
        let doc = parse(&text, &path_text)?;
        tracing::debug!(path = %path.display(), "loaded rule document");
        Ok(doc)
    }

    /// Convert into a builder. Rules precede children, each in document order.
    pub fn into_definition(self) -> Definition {
        let mut definition = Definition::new();
        if let Some(key) = self.stash {
            definition = definition.stash(key);
        }
        for config in self.require {
            definition = definition.require_rule(config);
        }
        for config in self.rules {
            definition = definition.rule(config);
        }
        for (name, child) in self.children {
            definition = definition.child(name, |_| child.into_definition());
        }
        definition
    }
}

fn parse(text: &str, path: &str) -> Result<DefinitionDoc, DefinitionError> {
    toml::from_str(text).map_err(|source| DefinitionError::ParseToml {
        path: path.to_string(),
        source,
    })
}
