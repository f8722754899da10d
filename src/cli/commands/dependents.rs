//! Dependents command: transitive dependents of named namespaces, no tests run

use std::path::Path;

use anyhow::{Context, Result};

use affected::{transitive_dependents, FallbackSearch, ModuleId, ModuleSet, SearchDependents};

use crate::cli::display::display_dependents;
use crate::cli::Cli;

pub(crate) fn cmd_dependents(cli: &Cli, root: &Path, modules: &[String]) -> Result<()> {
    let _span = tracing::info_span!("cmd_dependents", count = modules.len()).entered();

    let seeds: ModuleSet = modules.iter().map(|m| ModuleId::from(m.trim())).collect();
    let search = FallbackSearch::new(root);

    for &variant in cli.lang.variants() {
        let closure = transitive_dependents(&seeds, &SearchDependents::new(&search, variant))
            .with_context(|| format!("Dependency search failed for {}", variant))?;
        display_dependents(variant, &closure, cli.json)?;
    }
    Ok(())
}
