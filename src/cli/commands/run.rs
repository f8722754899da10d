//! Default command: select affected tests per variant and run them

use std::path::Path;
use std::process::{ExitCode, ExitStatus};

use anyhow::{Context, Result};

use affected::config::Config;
use affected::executor::{run_primary, run_secondary};
use affected::{
    select_tests, ChangeSource, FallbackSearch, GitChanges, Outcome, StaticChanges, Variant,
};

use crate::cli::display::{display_outcome, display_unsupported};
use crate::cli::signal::{check_interrupted, setup_signal_handler};
use crate::cli::{Cli, LangArg};

pub(crate) fn cmd_run(cli: &Cli, root: &Path, config: &Config, selector: &str) -> Result<ExitCode> {
    let _span = tracing::info_span!("cmd_run", selector, lang = ?cli.lang).entered();

    let changes: Box<dyn ChangeSource> = match &cli.files {
        Some(files) => Box::new(StaticChanges(files.clone())),
        None => {
            let base = cli.base.as_deref().unwrap_or(config.base_or_default());
            Box::new(GitChanges::new(root, base))
        }
    };
    let search = FallbackSearch::new(root);

    setup_signal_handler();

    let mut exit = ExitCode::SUCCESS;
    let mut failed = false;
    for &variant in cli.lang.variants() {
        if check_interrupted() {
            break;
        }
        if cli.lang == LangArg::Both && !variant.present_in(root) {
            tracing::info!(%variant, "No source directories, skipping");
            continue;
        }
        if !supports(config, variant, selector) {
            display_unsupported(variant, selector, cli.quiet);
            continue;
        }

        let outcome = select_tests(changes.as_ref(), &search, variant)?;
        display_outcome(&outcome, cli.json, cli.quiet)?;

        let Outcome::Tests(selection) = outcome else {
            continue;
        };
        if cli.dry_run {
            continue;
        }

        let status = match variant {
            Variant::Clj => run_primary(root, &config.primary, selector, &selection.tests),
            Variant::Cljs => run_secondary(root, &config.secondary, &selection.tests),
        }
        .with_context(|| format!("Failed to run {} tests", variant))?;

        if !status.success() && !failed {
            tracing::warn!(%variant, %status, "Tests failed");
            failed = true;
            exit = exit_code(status);
        }
    }

    Ok(exit)
}

fn supports(config: &Config, variant: Variant, selector: &str) -> bool {
    match variant {
        Variant::Clj => config.primary.supports(selector),
        Variant::Cljs => config.secondary.supports(selector),
    }
}

/// Exit code mirroring a child's status; signals and out-of-range codes map to 1.
fn exit_code(status: ExitStatus) -> ExitCode {
    status
        .code()
        .and_then(|c| u8::try_from(c).ok())
        .filter(|&c| c != 0)
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}
