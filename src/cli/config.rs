//! Project root detection
//!
//! An explicit `--project` wins; otherwise walk up from the working directory
//! looking for a Clojure build file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Find project root by looking for common markers.
pub(crate) fn find_project_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_project_root_from(&cwd).unwrap_or_else(|| {
        // Fall back to CWD with warning
        tracing::warn!("No project root found, using current directory");
        cwd
    })
}

fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    // Listed in priority order: if multiple exist, first match wins
    let markers = [
        "deps.edn",        // tools.deps
        "project.clj",     // Leiningen
        "shadow-cljs.edn", // shadow-cljs
        "build.boot",      // Boot
        ".git",            // Git repository root (fallback)
    ];

    let mut current = start;
    loop {
        if markers.iter().any(|m| current.join(m).exists()) {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Resolve the project directory from `--project` or by detection.
pub(crate) fn resolve_project(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => find_project_root(),
    };
    let root = dunce::canonicalize(&root)
        .with_context(|| format!("Project directory not found: {}", root.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }
    tracing::debug!(root = %root.display(), "Project root");
    Ok(root)
}
