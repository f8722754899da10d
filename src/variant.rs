//! Source variants
//!
//! A project carries two flavours of source: Clojure for the JVM and
//! ClojureScript for the browser, sharing `.cljc` files between them. Each
//! variant is described by a static [`VariantDef`] so mapping, search and
//! resolution take the conventions as data instead of branching on the tag.

use std::path::Path;

/// Top-level directories that hold sources and tests respectively.
pub const SOURCE_ROOT: &str = "src";
pub const TEST_ROOT: &str = "test";

/// Path and extension conventions for one variant
#[derive(Debug)]
pub struct VariantDef {
    /// Short name used on the command line and in JSON ("clj", "cljs")
    pub name: &'static str,
    /// Human-readable name for reports
    pub label: &'static str,
    /// Language subdirectories under `src/` and `test/`, in search order
    pub source_dirs: &'static [&'static str],
    /// File extensions without the leading dot
    pub extensions: &'static [&'static str],
}

static CLJ: VariantDef = VariantDef {
    name: "clj",
    label: "Clojure",
    source_dirs: &["clj", "cljc"],
    extensions: &["clj", "cljc"],
};

static CLJS: VariantDef = VariantDef {
    name: "cljs",
    label: "ClojureScript",
    source_dirs: &["cljs", "cljc"],
    extensions: &["cljs", "cljc"],
};

/// The closed set of source variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Primary variant: Clojure on the JVM
    Clj,
    /// Secondary, browser-targeted variant: ClojureScript
    Cljs,
}

impl Variant {
    /// Every variant, primary first
    pub const ALL: [Variant; 2] = [Variant::Clj, Variant::Cljs];

    /// Static conventions for this variant
    pub fn def(self) -> &'static VariantDef {
        match self {
            Variant::Clj => &CLJ,
            Variant::Cljs => &CLJS,
        }
    }

    /// Whether `path` carries one of this variant's extensions
    pub fn matches_extension(self, path: &str) -> bool {
        self.strip_extension(path).is_some()
    }

    /// Strip the variant's extension from `path`, if present
    pub(crate) fn strip_extension(self, path: &str) -> Option<&str> {
        self.def().extensions.iter().find_map(|ext| {
            path.strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))
                .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
        })
    }

    /// Strip a conventional `src/<dir>/` or `test/<dir>/` prefix from `path`
    pub(crate) fn strip_root_prefix(self, path: &str) -> Option<&str> {
        [SOURCE_ROOT, TEST_ROOT].iter().find_map(|root| {
            let rest = path.strip_prefix(root)?.strip_prefix('/')?;
            self.def()
                .source_dirs
                .iter()
                .find_map(|dir| rest.strip_prefix(dir)?.strip_prefix('/'))
        })
    }

    /// Source and test directories to search, relative to the project root
    pub fn search_roots(self) -> Vec<String> {
        [SOURCE_ROOT, TEST_ROOT]
            .iter()
            .flat_map(|root| self.dirs_under(root))
            .collect()
    }

    /// Test directories only, relative to the project root
    pub fn test_roots(self) -> Vec<String> {
        self.dirs_under(TEST_ROOT)
    }

    fn dirs_under(self, root: &str) -> Vec<String> {
        self.def()
            .source_dirs
            .iter()
            .map(|dir| format!("{}/{}", root, dir))
            .collect()
    }

    /// Whether `rel_path` (relative to the project root) is a file of this
    /// variant that lives under one of its conventional directories
    pub fn owns(self, rel_path: &str) -> bool {
        self.strip_root_prefix(rel_path)
            .is_some_and(|rest| self.matches_extension(rest))
    }

    /// Whether the variant has any conventional directory under `project`
    pub fn present_in(self, project: &Path) -> bool {
        self.search_roots()
            .iter()
            .any(|dir| project.join(dir).is_dir())
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.def().name)
    }
}
