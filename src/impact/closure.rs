//! Fixed-point closure over reverse dependencies

use crate::module::ModuleSet;
use crate::search::SearchError;

use super::dependents::DependentLookup;

/// Result of [`transitive_dependents`]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Closure {
    /// Seeds plus every module that reaches them through references
    pub modules: ModuleSet,
    /// Number of lookups performed; the last one found nothing new
    pub rounds: usize,
}

/// Expand `seeds` level by level until no new dependents appear.
///
/// Each round only looks up the modules discovered in the previous round, so
/// every module is searched for at most once and the loop ends once a round
/// adds nothing. The result always contains the seeds.
pub fn transitive_dependents<L>(seeds: &ModuleSet, lookup: &L) -> Result<Closure, SearchError>
where
    L: DependentLookup + ?Sized,
{
    let _span = tracing::info_span!("transitive_dependents", seeds = seeds.len()).entered();

    let mut all = seeds.clone();
    let mut frontier = seeds.clone();
    let mut rounds = 0;

    while !frontier.is_empty() {
        let deps = lookup.find_dependents(&frontier)?;
        rounds += 1;
        let fresh: ModuleSet = deps.difference(&all).cloned().collect();
        tracing::debug!(
            round = rounds,
            found = deps.len(),
            fresh = fresh.len(),
            "Closure round"
        );
        all.extend(fresh.iter().cloned());
        frontier = fresh;
    }

    tracing::info!(modules = all.len(), rounds, "Closure complete");
    Ok(Closure {
        modules: all,
        rounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleId;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet};

    /// In-memory reverse graph: module -> modules that reference it
    #[derive(Default)]
    struct Graph {
        reverse: BTreeMap<ModuleId, BTreeSet<ModuleId>>,
        lookups: RefCell<Vec<ModuleSet>>,
    }

    impl Graph {
        /// `from` depends on `to`
        fn edge(mut self, from: &str, to: &str) -> Self {
            self.reverse
                .entry(ModuleId::from(to))
                .or_default()
                .insert(ModuleId::from(from));
            self
        }
    }

    impl DependentLookup for Graph {
        fn find_dependents(&self, modules: &ModuleSet) -> Result<ModuleSet, SearchError> {
            self.lookups.borrow_mut().push(modules.clone());
            Ok(modules
                .iter()
                .filter_map(|m| self.reverse.get(m))
                .flatten()
                .cloned()
                .collect())
        }
    }

    fn set(ids: &[&str]) -> ModuleSet {
        ids.iter().map(|s| ModuleId::from(*s)).collect()
    }

    #[test]
    fn test_empty_seeds_never_look_up() {
        let graph = Graph::default().edge("b", "a");
        let closure = transitive_dependents(&ModuleSet::new(), &graph).unwrap();
        assert!(closure.modules.is_empty());
        assert_eq!(closure.rounds, 0);
        assert!(graph.lookups.borrow().is_empty());
    }

    #[test]
    fn test_no_dependents_is_one_round() {
        let graph = Graph::default();
        let closure = transitive_dependents(&set(&["a"]), &graph).unwrap();
        assert_eq!(closure.modules, set(&["a"]));
        assert_eq!(closure.rounds, 1);
    }

    #[test]
    fn test_chain_takes_three_rounds() {
        // C depends on B, B depends on A; only A changed
        let graph = Graph::default().edge("B", "A").edge("C", "B");
        let closure = transitive_dependents(&set(&["A"]), &graph).unwrap();
        assert_eq!(closure.modules, set(&["A", "B", "C"]));
        assert_eq!(closure.rounds, 3);
        // Each round only asks about the previous round's discoveries
        assert_eq!(
            *graph.lookups.borrow(),
            vec![set(&["A"]), set(&["B"]), set(&["C"])]
        );
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = Graph::default().edge("b", "a").edge("a", "b").edge("c", "b");
        let closure = transitive_dependents(&set(&["a"]), &graph).unwrap();
        assert_eq!(closure.modules, set(&["a", "b", "c"]));
        // a -> {b}, b -> {a, c} (c fresh), c -> {}
        assert_eq!(closure.rounds, 3);
    }

    #[test]
    fn test_diamond_visits_each_module_once() {
        // b and c depend on a, d depends on both
        let graph = Graph::default()
            .edge("b", "a")
            .edge("c", "a")
            .edge("d", "b")
            .edge("d", "c");
        let closure = transitive_dependents(&set(&["a"]), &graph).unwrap();
        assert_eq!(closure.modules, set(&["a", "b", "c", "d"]));
        let looked_up: Vec<ModuleId> = graph
            .lookups
            .borrow()
            .iter()
            .flatten()
            .cloned()
            .collect();
        let unique: BTreeSet<_> = looked_up.iter().cloned().collect();
        assert_eq!(looked_up.len(), unique.len());
    }

    #[test]
    fn test_lookup_error_propagates() {
        struct Failing;
        impl DependentLookup for Failing {
            fn find_dependents(&self, _: &ModuleSet) -> Result<ModuleSet, SearchError> {
                Err(SearchError::NoSearchTool)
            }
        }
        let result = transitive_dependents(&set(&["a"]), &Failing);
        assert!(matches!(result, Err(SearchError::NoSearchTool)));
    }

    fn arb_graph() -> impl Strategy<Value = Vec<(u8, u8)>> {
        prop::collection::vec((0u8..12, 0u8..12), 0..40)
    }

    fn build(edges: &[(u8, u8)]) -> Graph {
        edges.iter().fold(Graph::default(), |g, (from, to)| {
            g.edge(&format!("m{}", from), &format!("m{}", to))
        })
    }

    fn arb_seeds() -> impl Strategy<Value = ModuleSet> {
        prop::collection::btree_set(0u8..12, 0..5)
            .prop_map(|s| s.into_iter().map(|n| ModuleId::new(format!("m{}", n))).collect())
    }

    proptest! {
        #[test]
        fn prop_closure_contains_seeds(edges in arb_graph(), seeds in arb_seeds()) {
            let graph = build(&edges);
            let closure = transitive_dependents(&seeds, &graph).unwrap();
            prop_assert!(closure.modules.is_superset(&seeds));
        }

        #[test]
        fn prop_closure_is_a_fixed_point(edges in arb_graph(), seeds in arb_seeds()) {
            let graph = build(&edges);
            let once = transitive_dependents(&seeds, &graph).unwrap();
            let twice = transitive_dependents(&once.modules, &graph).unwrap();
            prop_assert_eq!(once.modules, twice.modules);
        }

        #[test]
        fn prop_rounds_bounded_by_universe(edges in arb_graph(), seeds in arb_seeds()) {
            let graph = build(&edges);
            let closure = transitive_dependents(&seeds, &graph).unwrap();
            prop_assert!(closure.rounds <= closure.modules.len());
        }
    }
}
