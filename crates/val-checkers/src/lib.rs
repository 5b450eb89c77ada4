//! # val checkers
//!
//! The reusable predicate catalog for the val kernel.
//!
//! Every predicate is parameterized by a [`Mold`] describing how it reports a
//! failure. The [`RuleRegistry`] maps rule names to factories so check trees
//! can be described as data and built later.
//!
//! ```text
//! Mold ─► satisfies / predicates ─► Check
//!                                     ▲
//! RuleConfig ─► RuleRegistry::build ──┘
//! ```

pub mod combinators;
pub mod mold;
pub mod predicates;
pub mod registry;
pub mod satisfies;

pub use combinators::{all, and, fail, not, or, pass, unless, when};
pub use mold::Mold;
pub use predicates::{
    has_only_fields, in_range, includes_pattern, is_enum, is_instance_of, is_not_null, is_null,
    is_one_of, matches_stashed, max_length, min_length,
};
pub use registry::{BUILTIN_RULES, RuleConfig, RuleFactory, RuleRegistry};
pub use satisfies::{satisfies, satisfies_with};
