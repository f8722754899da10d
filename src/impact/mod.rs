//! Impact analysis core
//!
//! Reverse dependency lookup by text search, fixed-point closure over it, and
//! resolution of the affected modules to test namespaces that exist.

mod closure;
mod dependents;
mod resolve;

pub use closure::{transitive_dependents, Closure};
pub use dependents::{dependents_pattern, DependentLookup, SearchDependents};
pub use resolve::{declaration_pattern, resolve_tests, test_candidate};
