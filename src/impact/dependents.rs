//! Reverse dependency lookup by text search

use crate::module::{alternation, files_to_modules, ModuleSet};
use crate::search::{SearchBackend, SearchError, SearchPlan};
use crate::variant::Variant;

/// Characters that may not directly precede a namespace in a qualified
/// reference. Anything that can be part of a Clojure symbol is listed, so
/// `xa.b/f` is never read as a reference to `a.b`.
const SYMBOL_CHARS: &str = "A-Za-z0-9_.*+!?<>=/-";

/// Answers "which modules reference any module in this set?"
///
/// [`transitive_dependents`](super::transitive_dependents) only ever talks to
/// this trait, so text search can be swapped for a real graph.
pub trait DependentLookup {
    fn find_dependents(&self, modules: &ModuleSet) -> Result<ModuleSet, SearchError>;
}

/// Build the combined pattern matching a require of, or a qualified
/// reference to, any module in `modules`.
///
/// Returns `None` for an empty set: an empty alternation would match every
/// line on some tools and be rejected by others.
pub fn dependents_pattern(modules: &ModuleSet) -> Option<String> {
    if modules.is_empty() {
        return None;
    }
    let ids = alternation(modules);
    // `[app.core]` / `[app.core :as c]` / `[app.core, ...]`, or `app.core/handler`
    Some(format!(
        r"\[({ids})([][:space:],]|$)|(^|[^{SYMBOL_CHARS}])({ids})/"
    ))
}

/// [`DependentLookup`] over a [`SearchBackend`], scoped to one variant
pub struct SearchDependents<'a, B: SearchBackend + ?Sized> {
    backend: &'a B,
    variant: Variant,
}

impl<'a, B: SearchBackend + ?Sized> SearchDependents<'a, B> {
    pub fn new(backend: &'a B, variant: Variant) -> Self {
        Self { backend, variant }
    }
}

impl<B: SearchBackend + ?Sized> DependentLookup for SearchDependents<'_, B> {
    fn find_dependents(&self, modules: &ModuleSet) -> Result<ModuleSet, SearchError> {
        let Some(pattern) = dependents_pattern(modules) else {
            return Ok(ModuleSet::new());
        };
        let _span = tracing::info_span!(
            "find_dependents",
            variant = %self.variant,
            modules = modules.len()
        )
        .entered();

        let plan = SearchPlan::new(
            pattern,
            self.variant.search_roots(),
            self.variant.def().extensions,
        );
        let files = self.backend.search(&plan)?;
        let dependents = files_to_modules(files.iter().map(String::as_str), self.variant);
        tracing::debug!(files = files.len(), dependents = dependents.len(), "Dependents found");
        Ok(dependents)
    }
}
