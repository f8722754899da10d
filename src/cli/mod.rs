//! CLI implementation for affected

mod commands;
mod config;
mod display;
mod signal;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

use affected::Variant;

/// Language variant(s) to select tests for
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LangArg {
    /// Clojure (src/clj, src/cljc)
    #[value(alias = "clj")]
    Primary,
    /// ClojureScript (src/cljs, src/cljc)
    #[value(alias = "cljs")]
    Secondary,
    /// Both, primary first
    Both,
}

impl LangArg {
    pub(crate) fn variants(self) -> &'static [Variant] {
        match self {
            LangArg::Primary => &[Variant::Clj],
            LangArg::Secondary => &[Variant::Cljs],
            LangArg::Both => &Variant::ALL,
        }
    }
}

#[derive(Parser)]
#[command(name = "affected")]
#[command(about = "Run only the Clojure/ClojureScript tests affected by your changes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Test selector passed to the runner (e.g. unit, integration)
    selector: Option<String>,

    /// Project directory (default: nearest deps.edn/project.clj/shadow-cljs.edn/.git)
    #[arg(short = 'p', long, global = true)]
    project: Option<PathBuf>,

    /// Language variant
    #[arg(short = 'l', long, value_enum, default_value = "both", global = true)]
    lang: LangArg,

    /// Revision to diff the working tree against (default: HEAD)
    #[arg(long, env = "AFFECTED_BASE")]
    base: Option<String>,

    /// Treat these files as changed instead of asking git
    #[arg(long, num_args = 1..)]
    files: Option<Vec<String>>,

    /// Report the selection without running anything
    #[arg(long)]
    dry_run: bool,

    /// Output as JSON (one object per variant)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show debug info (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the transitive dependents of namespaces
    Dependents {
        /// Namespaces to start from (e.g. app.core)
        #[arg(required = true)]
        modules: Vec<String>,
    },
}

/// Run CLI with pre-parsed arguments (used when main.rs needs to inspect args first)
pub fn run_with(cli: Cli) -> Result<ExitCode> {
    let root = config::resolve_project(cli.project.as_deref())?;
    let config = affected::config::Config::load(&root);

    match &cli.command {
        Some(Commands::Dependents { modules }) => {
            commands::cmd_dependents(&cli, &root, modules)?;
            Ok(ExitCode::SUCCESS)
        }
        None => match cli.selector.as_deref() {
            Some(selector) => commands::cmd_run(&cli, &root, &config, selector),
            None => {
                Cli::command().print_help()?;
                Ok(ExitCode::from(2))
            }
        },
    }
}
