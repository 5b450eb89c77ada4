//! # val kernel
//!
//! A declarative validation core: an input value graph is evaluated against
//! a composed tree of checks, producing structured, mergeable feedback rather
//! than a boolean.
//!
//! ## Architecture
//!
//! ```text
//! CheckResult        ← one message + code
//!     │
//! ResultMap          ← key → ordered results; the `plus` monoid, clean = identity
//!     │
//! EvalContext        ← per-evaluation stash, threaded by &mut
//!     │
//! Check              ← (input, context) → ResultMap; `and` / `or` / `plus`
//!     ├── ComposedCheck     ← And / Or / All over a flat member sequence
//!     └── TransformerCheck  ← Nop / Child traversal, optional stashing
//! ```
//!
//! Two channels never mix: rule failures are `Ok(ResultMap)` content, while
//! defects in the tree or its configuration are [`ValError`]s.

pub mod check;
pub mod composed;
pub mod context;
pub mod error;
pub mod result;
pub mod result_map;
pub mod transformer;
pub mod value;

pub use check::{Check, CheckFn, Predicate};
pub use composed::{ComposedCheck, ComposedKind};
pub use context::EvalContext;
pub use error::ValError;
pub use result::{CheckResult, code};
pub use result_map::ResultMap;
pub use transformer::{Transform, TransformerCheck};
pub use value::ValueKind;
