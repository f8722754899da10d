//! Text search over project files
//!
//! Dependency discovery asks one question: which files under these roots
//! contain this pattern? [`SearchBackend`] answers it. The production backend
//! is [`FallbackSearch`], which shells out to ripgrep and falls back to grep
//! when ripgrep is missing or errors, so the tool works on hosts that have
//! either one installed.

mod grep;
mod ripgrep;

pub use grep::Grep;
pub use ripgrep::Ripgrep;

use std::path::{Path, PathBuf};
use std::process::Output;

use thiserror::Error;

use crate::module::normalize_path;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{0} is not installed")]
    Unavailable(&'static str),
    #[error("{tool} failed (exit status {status}): {stderr}")]
    Failed {
        tool: &'static str,
        status: String,
        stderr: String,
    },
    #[error("No search tool available. Install ripgrep (rg) or grep.")]
    NoSearchTool,
    #[error("IO error running {tool}: {source}")]
    Io {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// One search request: a pattern, where to look, which files to consider
#[derive(Debug, Clone)]
pub struct SearchPlan {
    /// Extended regular expression, valid for both Rust regex and POSIX ERE
    pub pattern: String,
    /// Directories to search, relative to the project root
    pub roots: Vec<String>,
    /// File extensions to include, without the leading dot
    pub extensions: Vec<&'static str>,
}

impl SearchPlan {
    pub fn new(pattern: impl Into<String>, roots: Vec<String>, extensions: &[&'static str]) -> Self {
        Self {
            pattern: pattern.into(),
            roots,
            extensions: extensions.to_vec(),
        }
    }

    /// Glob form of the extension filter (`*.clj`)
    pub fn globs(&self) -> impl Iterator<Item = String> + '_ {
        self.extensions.iter().map(|ext| format!("*.{}", ext))
    }
}

/// Something that can run a [`SearchPlan`] and list matching files.
pub trait SearchBackend {
    /// Return project-relative paths of files matching the plan.
    ///
    /// No matches is `Ok(vec![])`, not an error.
    fn search(&self, plan: &SearchPlan) -> Result<Vec<String>, SearchError>;
}

/// A single external search program
pub trait SearchTool {
    /// Program name, for logs and errors
    fn name(&self) -> &'static str;

    /// Run the plan with `project` as the working directory.
    fn run(&self, project: &Path, plan: &SearchPlan) -> Result<Vec<String>, SearchError>;
}

/// Runs tools in order until one succeeds.
pub struct FallbackSearch {
    project: PathBuf,
    tools: Vec<Box<dyn SearchTool>>,
}

impl FallbackSearch {
    /// ripgrep first, grep second
    pub fn new(project: impl Into<PathBuf>) -> Self {
        Self::with_tools(project, vec![Box::new(Ripgrep), Box::new(Grep)])
    }

    pub fn with_tools(project: impl Into<PathBuf>, tools: Vec<Box<dyn SearchTool>>) -> Self {
        Self {
            project: project.into(),
            tools,
        }
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Drop roots that do not exist; both tools error on missing paths.
    fn existing_roots(&self, plan: &SearchPlan) -> Vec<String> {
        plan.roots
            .iter()
            .filter(|r| self.project.join(r).is_dir())
            .cloned()
            .collect()
    }
}

impl SearchBackend for FallbackSearch {
    fn search(&self, plan: &SearchPlan) -> Result<Vec<String>, SearchError> {
        let roots = self.existing_roots(plan);
        if roots.is_empty() {
            tracing::debug!(roots = ?plan.roots, "No search roots exist, skipping search");
            return Ok(Vec::new());
        }
        let plan = SearchPlan {
            roots,
            ..plan.clone()
        };

        let mut last_failure = None;
        for tool in &self.tools {
            match tool.run(&self.project, &plan) {
                Ok(files) => {
                    tracing::debug!(tool = tool.name(), matches = files.len(), "Search complete");
                    return Ok(files);
                }
                Err(SearchError::Unavailable(name)) => {
                    tracing::debug!(tool = name, "Search tool not installed, trying next");
                }
                Err(e) => {
                    tracing::warn!(tool = tool.name(), error = %e, "Search tool failed, trying next");
                    last_failure = Some(e);
                }
            }
        }

        Err(last_failure.unwrap_or(SearchError::NoSearchTool))
    }
}

/// Interpret the output of a grep-like tool: 0 = matches, 1 = none, else failure.
///
/// Exit code 2 with files listed is a partial error (an unreadable file, a
/// broken symlink): the listed matches are kept.
pub(crate) fn collect_matches(tool: &'static str, output: Output) -> Result<Vec<String>, SearchError> {
    let stderr = || String::from_utf8_lossy(&output.stderr).trim().to_string();
    match output.status.code() {
        Some(0) => Ok(parse_file_list(&String::from_utf8_lossy(&output.stdout))),
        Some(1) => Ok(Vec::new()),
        Some(2) if !output.stdout.iter().all(u8::is_ascii_whitespace) => {
            tracing::warn!(tool, stderr = %stderr(), "Search finished with errors, keeping matches");
            Ok(parse_file_list(&String::from_utf8_lossy(&output.stdout)))
        }
        code => Err(SearchError::Failed {
            tool,
            status: code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
            stderr: stderr(),
        }),
    }
}

/// Map a spawn error: a missing binary is "unavailable", anything else is IO.
pub(crate) fn spawn_error(tool: &'static str, e: std::io::Error) -> SearchError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SearchError::Unavailable(tool)
    } else {
        SearchError::Io { tool, source: e }
    }
}

/// One path per line, blank lines dropped, separators normalized.
pub(crate) fn parse_file_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(normalize_path)
        .collect()
}
