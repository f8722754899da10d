//! Changed files from version control
//!
//! [`GitChanges`] compares the working tree (staged, unstaged and untracked
//! files) against a base revision and keeps the files that belong to the
//! requested variant.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::module::normalize_path;
use crate::variant::Variant;

#[derive(Error, Debug)]
pub enum ChangeError {
    #[error("Failed to run 'git'. Is git installed? ({0})")]
    Spawn(#[from] std::io::Error),
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),
    #[error("Unknown revision '{0}'")]
    UnknownRevision(String),
    #[error("Invalid revision '{0}': must not start with '-'")]
    InvalidRevision(String),
    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

/// Supplies the changed files of a variant, relative to the project root
pub trait ChangeSource {
    fn changed_files(&self, variant: Variant) -> Result<Vec<String>, ChangeError>;
}

/// Working tree vs. a base revision
pub struct GitChanges {
    project: PathBuf,
    base: String,
}

impl GitChanges {
    pub fn new(project: impl Into<PathBuf>, base: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            base: base.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<String, ChangeError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.project)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("not a git repository") {
                return Err(ChangeError::NotARepository(self.project.clone()));
            }
            if stderr.contains("unknown revision") || stderr.contains("bad revision") {
                return Err(ChangeError::UnknownRevision(self.base.clone()));
            }
            return Err(ChangeError::Git {
                command: args.join(" "),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Every path git reports as different from the base, any variant
    fn all_changed(&self) -> Result<BTreeSet<String>, ChangeError> {
        if self.base.starts_with('-') {
            return Err(ChangeError::InvalidRevision(self.base.clone()));
        }
        let _span = tracing::info_span!("git_changes", base = %self.base).entered();

        let diff = self.git(&["--no-pager", "diff", "--name-only", "--relative", &self.base, "--"])?;
        let untracked = self.git(&["ls-files", "--others", "--exclude-standard"])?;

        let files: BTreeSet<String> = diff
            .lines()
            .chain(untracked.lines())
            .filter(|l| !l.trim().is_empty())
            .map(normalize_path)
            .collect();
        tracing::debug!(files = files.len(), "Changed files from git");
        Ok(files)
    }

    pub fn project(&self) -> &Path {
        &self.project
    }
}

impl ChangeSource for GitChanges {
    fn changed_files(&self, variant: Variant) -> Result<Vec<String>, ChangeError> {
        Ok(filter_for_variant(self.all_changed()?, variant))
    }
}

/// Keep the paths that live under the variant's directories with its extensions.
pub fn filter_for_variant<I>(paths: I, variant: Variant) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    paths.into_iter().filter(|p| variant.owns(p)).collect()
}

/// A fixed list of changed files, for callers that already know them
pub struct StaticChanges(pub Vec<String>);

impl ChangeSource for StaticChanges {
    fn changed_files(&self, variant: Variant) -> Result<Vec<String>, ChangeError> {
        Ok(filter_for_variant(
            self.0.iter().map(|p| normalize_path(p)),
            variant,
        ))
    }
}
