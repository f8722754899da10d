//! Output and display functions for CLI results

use anyhow::Result;
use colored::Colorize;

use affected::{Closure, ModuleId, Outcome, Selection, Variant};

fn header(variant: Variant) -> String {
    format!("== {} ==", variant.def().label).bold().to_string()
}

fn module_list<'a>(modules: impl IntoIterator<Item = &'a ModuleId>) {
    for module in modules {
        println!("  {}", module);
    }
}

/// Print one variant's outcome
pub(crate) fn display_outcome(outcome: &Outcome, json: bool, quiet: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!("{}", header(outcome.variant()));
    match outcome {
        Outcome::NothingChanged { .. } => {
            println!("{}", "No changed namespaces.".dimmed());
        }
        Outcome::NoTests(selection) => {
            display_changed(selection);
            println!("{}", "No affected tests found.".dimmed());
        }
        Outcome::Tests(selection) => {
            display_changed(selection);
            println!(
                "{} ({} affected, {} round{}):",
                "Tests".green().bold(),
                selection.affected.len(),
                selection.rounds,
                if selection.rounds == 1 { "" } else { "s" }
            );
            module_list(&selection.tests);
        }
    }
    Ok(())
}

fn display_changed(selection: &Selection) {
    println!("{}:", "Changed".yellow().bold());
    module_list(&selection.changed);
}

/// Print a variant whose executor cannot handle the selector
pub(crate) fn display_unsupported(variant: Variant, selector: &str, quiet: bool) {
    if !quiet {
        eprintln!(
            "{} {} does not support selector '{}', skipping",
            "Warning:".yellow().bold(),
            variant.def().label,
            selector
        );
    }
}

/// Print the transitive dependents of a set of namespaces
pub(crate) fn display_dependents(variant: Variant, closure: &Closure, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "variant": variant,
            "modules": closure.modules,
            "rounds": closure.rounds,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }
    println!("{}", header(variant));
    module_list(&closure.modules);
    println!(
        "{}",
        format!("{} namespaces, {} rounds", closure.modules.len(), closure.rounds).dimmed()
    );
    Ok(())
}
