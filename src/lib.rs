//! # affected - Test selection for Clojure/ClojureScript projects
//!
//! Finds the test namespaces that must re-run after a change, without a
//! dependency graph: reverse dependencies are found by text search, expanded
//! to a fixed point, then resolved to test namespaces that exist on disk.
//!
//! ## Features
//!
//! - **Two variants**: Clojure (`src/clj`) and ClojureScript (`src/cljs`),
//!   sharing `.cljc` files
//! - **Search fallback**: ripgrep when installed, grep otherwise
//! - **Scoped build patching**: the ClojureScript test build is narrowed to
//!   the selected namespaces and restored afterwards
//!
//! ## Quick Start
//!
//! ```no_run
//! use affected::{select_tests, FallbackSearch, GitChanges, Outcome, Variant};
//!
//! # fn main() -> anyhow::Result<()> {
//! let project = std::path::Path::new(".");
//! let search = FallbackSearch::new(project);
//! let changes = GitChanges::new(project, "origin/main");
//!
//! if let Outcome::Tests(selection) = select_tests(&changes, &search, Variant::Clj)? {
//!     for test in &selection.tests {
//!         println!("{}", test);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod build_config;
pub mod changes;
pub mod config;
pub mod executor;
pub mod impact;
pub mod module;
pub mod search;
pub mod select;
pub mod variant;

pub use build_config::BuildConfigPatch;
pub use changes::{ChangeSource, GitChanges, StaticChanges};
pub use impact::{
    dependents_pattern, resolve_tests, transitive_dependents, Closure, DependentLookup,
    SearchDependents,
};
pub use module::{file_to_module, ModuleId, ModuleSet};
pub use search::{FallbackSearch, SearchBackend, SearchError, SearchPlan};
pub use select::{select_tests, Outcome, Selection};
pub use variant::Variant;
