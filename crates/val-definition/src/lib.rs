//! # val definition
//!
//! Assembles check trees for the val kernel, either through the
//! [`Definition`] builder or from TOML rule documents ([`DefinitionDoc`]).
//! Named rules resolve through a [`val_checkers::RuleRegistry`] at build
//! time, so every configuration error surfaces before any input is
//! evaluated.

pub mod definition;
pub mod document;
pub mod error;

pub use definition::Definition;
pub use document::DefinitionDoc;
pub use error::DefinitionError;

use std::path::Path;
use val_kernel::Check;

/// Load a rule document and build it with the built-in catalog.
pub fn load_check(path: impl AsRef<Path>) -> Result<Check, DefinitionError> {
    let check = DefinitionDoc::load(path)?.into_definition().build()?;
    Ok(check)
}
