//! Module identifiers and the path <-> namespace convention
//!
//! `src/clj/app/http_server.clj` is the namespace `app.http-server`: the
//! conventional root is stripped, then the extension, path separators become
//! dots and underscores become hyphens.

use std::collections::BTreeSet;

use crate::variant::Variant;

/// Suffix that turns a namespace into its test namespace
pub const TEST_SUFFIX: &str = "-test";

/// Logical name of a namespace within one variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

/// A set of modules. Ordered so reports and JSON are stable.
pub type ModuleSet = BTreeSet<ModuleId>;

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The conventional test namespace for this module (`app.core` -> `app.core-test`)
    pub fn test_module(&self) -> ModuleId {
        ModuleId(format!("{}{}", self.0, TEST_SUFFIX))
    }

    /// Whether this id already names a test namespace
    pub fn is_test_module(&self) -> bool {
        self.0.ends_with(TEST_SUFFIX)
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Map a project-relative file path to its module id.
///
/// Returns `None` for paths outside the variant's conventional directories or
/// without one of its extensions; callers skip those.
pub fn file_to_module(path: &str, variant: Variant) -> Option<ModuleId> {
    let path = normalize_path(path);
    let rest = variant.strip_root_prefix(&path)?;
    let stem = variant.strip_extension(rest)?;
    Some(ModuleId(stem.replace('/', ".").replace('_', "-")))
}

/// Map every path, dropping the ones outside the convention.
pub fn files_to_modules<'a, I>(paths: I, variant: Variant) -> ModuleSet
where
    I: IntoIterator<Item = &'a str>,
{
    paths
        .into_iter()
        .filter_map(|p| {
            let module = file_to_module(p, variant);
            if module.is_none() {
                tracing::debug!(path = p, %variant, "Path outside source conventions, skipping");
            }
            module
        })
        .collect()
}

/// Normalize tool output into the `a/b/c` form the mapper expects.
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    match path.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => path,
    }
}

/// Escape a module id for literal use inside a pattern.
///
/// Only the metacharacters shared by POSIX ERE and Rust's regex syntax are
/// escaped; `-` stays bare because `\-` is undefined in ERE.
pub fn escape_literal(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 8);
    for c in id.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape and join modules into a single alternation group body.
pub fn alternation<'a, I>(modules: I) -> String
where
    I: IntoIterator<Item = &'a ModuleId>,
{
    modules
        .into_iter()
        .map(|m| escape_literal(m.as_str()))
        .collect::<Vec<_>>()
        .join("|")
}
