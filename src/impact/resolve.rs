//! Affected module -> existing test namespace

use crate::module::{escape_literal, ModuleId, ModuleSet};
use crate::search::{SearchBackend, SearchError, SearchPlan};
use crate::variant::Variant;

/// Pattern matching `(ns <test-module>` with the name as a whole token.
///
/// The trailing whitespace / `)` / end-of-line guard keeps `foo-test` from
/// matching a file that declares `foo-test-utils`.
pub fn declaration_pattern(test_module: &ModuleId) -> String {
    format!(
        r"\(ns[[:space:]]+{}([[:space:]]|\)|$)",
        escape_literal(test_module.as_str())
    )
}

/// The test namespace to look for on behalf of `module`.
///
/// Test namespaces reached by the closure stand for themselves; everything
/// else gets the conventional suffix.
pub fn test_candidate(module: &ModuleId) -> ModuleId {
    if module.is_test_module() {
        module.clone()
    } else {
        module.test_module()
    }
}

/// Resolve affected modules to test namespaces that actually exist.
///
/// One declaration search per candidate over the variant's test roots.
/// Modules without a test namespace are dropped; that is the common case,
/// not an error. The result is sorted and free of duplicates.
pub fn resolve_tests<B>(
    affected: &ModuleSet,
    variant: Variant,
    backend: &B,
) -> Result<Vec<ModuleId>, SearchError>
where
    B: SearchBackend + ?Sized,
{
    let _span =
        tracing::info_span!("resolve_tests", %variant, affected = affected.len()).entered();

    let candidates: ModuleSet = affected.iter().map(test_candidate).collect();
    let roots = variant.test_roots();
    let extensions = variant.def().extensions;

    let mut found = Vec::new();
    for candidate in candidates {
        let plan = SearchPlan::new(declaration_pattern(&candidate), roots.clone(), extensions);
        if backend.search(&plan)?.is_empty() {
            tracing::debug!(test = %candidate, "No test namespace declared");
        } else {
            found.push(candidate);
        }
    }

    tracing::info!(tests = found.len(), "Test namespaces resolved");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn matcher(id: &str) -> Regex {
        Regex::new(&declaration_pattern(&ModuleId::from(id))).unwrap()
    }

    #[test]
    fn test_declaration_matches_ns_forms() {
        let re = matcher("app.api-test");
        assert!(re.is_match("(ns app.api-test"));
        assert!(re.is_match("(ns app.api-test)"));
        assert!(re.is_match("(ns app.api-test\n"));
        assert!(re.is_match("(ns  app.api-test (:require [clojure.test :refer :all]))"));
        assert!(re.is_match("(ns\tapp.api-test"));
    }

    #[test]
    fn test_declaration_is_whole_token() {
        let re = matcher("foo-test");
        assert!(!re.is_match("(ns foo-bar-test)"));
        assert!(!re.is_match("(ns foo-test-utils)"));
        assert!(!re.is_match("(ns xfoo-test)"));
        assert!(!re.is_match("(nsfoo-test)"));
    }

    #[test]
    fn test_declaration_requires_ns_keyword() {
        let re = matcher("app.api-test");
        assert!(!re.is_match("(:require [app.api-test])"));
        assert!(!re.is_match("(def app.api-test 1)"));
    }

    #[test]
    fn test_candidate_adds_suffix_once() {
        assert_eq!(
            test_candidate(&ModuleId::from("app.core")),
            ModuleId::from("app.core-test")
        );
        assert_eq!(
            test_candidate(&ModuleId::from("app.core-test")),
            ModuleId::from("app.core-test")
        );
    }
}
