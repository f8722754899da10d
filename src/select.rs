//! Per-variant selection pipeline
//!
//! changed files -> seed modules -> closure -> existing test namespaces.

use anyhow::{Context, Result};

use crate::changes::ChangeSource;
use crate::impact::{resolve_tests, transitive_dependents, SearchDependents};
use crate::module::{files_to_modules, ModuleId, ModuleSet};
use crate::search::SearchBackend;
use crate::variant::Variant;

/// Everything learned about one variant
#[derive(Debug, Clone, serde::Serialize)]
pub struct Selection {
    pub variant: Variant,
    /// Changed files that belong to the variant
    pub changed_files: Vec<String>,
    /// Modules owning those files
    pub changed: ModuleSet,
    /// Changed modules plus their transitive dependents
    pub affected: ModuleSet,
    /// Test namespaces that exist for the affected modules
    pub tests: Vec<ModuleId>,
    /// Closure rounds performed
    pub rounds: usize,
}

/// How a variant's pipeline ended
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// No changed files (or none inside the source conventions)
    NothingChanged { variant: Variant },
    /// Something changed but no test namespace covers it
    NoTests(Selection),
    /// Tests to run
    Tests(Selection),
}

impl Outcome {
    pub fn variant(&self) -> Variant {
        match self {
            Outcome::NothingChanged { variant } => *variant,
            Outcome::NoTests(s) | Outcome::Tests(s) => s.variant,
        }
    }
}

/// Run the selection pipeline for one variant.
pub fn select_tests<C, B>(changes: &C, backend: &B, variant: Variant) -> Result<Outcome>
where
    C: ChangeSource + ?Sized,
    B: SearchBackend + ?Sized,
{
    let _span = tracing::info_span!("select_tests", %variant).entered();

    let changed_files = changes
        .changed_files(variant)
        .with_context(|| format!("Failed to list changed {} files", variant))?;
    let changed = files_to_modules(changed_files.iter().map(String::as_str), variant);
    if changed.is_empty() {
        tracing::info!("No changed modules");
        return Ok(Outcome::NothingChanged { variant });
    }

    let closure = transitive_dependents(&changed, &SearchDependents::new(backend, variant))
        .context("Dependency search failed")?;
    let tests = resolve_tests(&closure.modules, variant, backend)
        .context("Test namespace search failed")?;

    let selection = Selection {
        variant,
        changed_files,
        changed,
        affected: closure.modules,
        tests,
        rounds: closure.rounds,
    };
    tracing::info!(
        changed = selection.changed.len(),
        affected = selection.affected.len(),
        tests = selection.tests.len(),
        "Selection complete"
    );

    if selection.tests.is_empty() {
        Ok(Outcome::NoTests(selection))
    } else {
        Ok(Outcome::Tests(selection))
    }
}
