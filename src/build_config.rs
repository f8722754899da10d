//! Scoped rewrite of the ClojureScript build configuration
//!
//! The browser test build compiles every namespace matching a regex stored in
//! the build file (`:ns-regexp` in `shadow-cljs.edn`). To compile only the
//! selected tests the value is rewritten before compilation and the original
//! bytes are put back afterwards.
//!
//! [`BuildConfigPatch`] restores on [`Drop`], so early returns and unwinding
//! panics leave the file as it was. A process killed outright (SIGKILL, a
//! forced second Ctrl+C) cannot restore it; the file then keeps the patched
//! pattern until checked out again.

use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use thiserror::Error;

use crate::module::{alternation, ModuleId};

#[derive(Error, Debug)]
pub enum BuildConfigError {
    #[error("Failed to read build config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write build config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Build config {path} is not valid UTF-8")]
    Encoding { path: PathBuf },
    #[error("No string value for {key} in {path}")]
    KeyNotFound { key: String, path: PathBuf },
}

/// Anchored alternation of test namespaces: `^(a\.b-test|c-test)$`
pub fn namespace_pattern(tests: &[ModuleId]) -> String {
    format!("^({})$", alternation(tests))
}

/// Escape a value for an EDN string literal
fn edn_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Replace the string value following `key` with `pattern`.
///
/// Every occurrence of the key is rewritten; a build file normally carries a
/// single test build. `None` if the key has no string value anywhere.
pub fn rewrite_pattern(content: &str, key: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(&format!(r#"({})(\s+)"(?:[^"\\]|\\.)*""#, regex::escape(key)))
        .expect("escaped key always forms a valid regex");
    if !re.is_match(content) {
        return None;
    }
    let value = edn_string(pattern);
    let rewritten = re.replace_all(content, |caps: &Captures| {
        format!("{}{}{}", &caps[1], &caps[2], value)
    });
    Some(rewritten.into_owned())
}

/// A patched build file; restores the original bytes when dropped
#[derive(Debug)]
pub struct BuildConfigPatch {
    path: PathBuf,
    original: Vec<u8>,
    restored: bool,
}

impl BuildConfigPatch {
    /// Read `path`, rewrite the value of `key` to `pattern`, write it back.
    pub fn apply(path: &Path, key: &str, pattern: &str) -> Result<Self, BuildConfigError> {
        let _span = tracing::info_span!("patch_build_config", path = %path.display()).entered();

        let original = std::fs::read(path).map_err(|source| BuildConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = std::str::from_utf8(&original).map_err(|_| BuildConfigError::Encoding {
            path: path.to_path_buf(),
        })?;
        let patched =
            rewrite_pattern(text, key, pattern).ok_or_else(|| BuildConfigError::KeyNotFound {
                key: key.to_string(),
                path: path.to_path_buf(),
            })?;

        std::fs::write(path, patched).map_err(|source| BuildConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(key, pattern, "Build config patched");

        Ok(Self {
            path: path.to_path_buf(),
            original,
            restored: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Put the original bytes back, reporting failure.
    pub fn restore(mut self) -> Result<(), BuildConfigError> {
        self.write_original()
    }

    fn write_original(&mut self) -> Result<(), BuildConfigError> {
        if self.restored {
            return Ok(());
        }
        std::fs::write(&self.path, &self.original).map_err(|source| BuildConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.restored = true;
        tracing::info!(path = %self.path.display(), "Build config restored");
        Ok(())
    }
}

impl Drop for BuildConfigPatch {
    fn drop(&mut self) {
        if let Err(e) = self.write_original() {
            tracing::error!(error = %e, "Build config left patched");
            eprintln!(
                "Warning: could not restore {}: {}. Restore it from version control.",
                self.path.display(),
                e
            );
        }
    }
}
