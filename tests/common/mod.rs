//! Common test fixtures and helpers
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::{TestProject, MemorySearch};
//! ```

#![allow(dead_code)]

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use affected::{ModuleId, ModuleSet, SearchBackend, SearchError, SearchPlan};
use regex::Regex;
use tempfile::TempDir;

/// A throwaway Clojure project with automatic cleanup
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Empty project with a `deps.edn` marker
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("deps.edn"), "{:paths [\"src/clj\" \"src/cljc\"]}")
            .expect("Failed to write deps.edn");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// The two-module app used by most scenarios:
    /// `app.api` requires `app.core`; only `app.api` has a test namespace.
    pub fn with_core_and_api() -> Self {
        let project = Self::new();
        project.write("src/clj/app/core.clj", "(ns app.core)\n\n(defn handler [req] req)\n");
        project.write(
            "src/clj/app/api.clj",
            "(ns app.api\n  (:require [app.core :as core]))\n\n(def routes [core/handler])\n",
        );
        project.write(
            "test/clj/app/api_test.clj",
            "(ns app.api-test\n  (:require [clojure.test :refer [deftest is]]\n            [app.api :as api]))\n",
        );
        project
    }
}

/// In-process [`SearchBackend`]: walks the plan's roots and matches the
/// pattern line by line, like `rg --files-with-matches` does.
pub struct MemorySearch {
    root: PathBuf,
}

impl MemorySearch {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    fn walk(&self, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, out);
            } else {
                out.push(path);
            }
        }
    }
}

impl SearchBackend for MemorySearch {
    fn search(&self, plan: &SearchPlan) -> Result<Vec<String>, SearchError> {
        let re = Regex::new(&plan.pattern).expect("pattern must be a valid regex");
        let mut files = Vec::new();
        for root in &plan.roots {
            self.walk(&self.root.join(root), &mut files);
        }
        let mut matches: Vec<String> = files
            .into_iter()
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| plan.extensions.contains(&e))
            })
            .filter(|p| {
                fs::read_to_string(p).is_ok_and(|content| content.lines().any(|l| re.is_match(l)))
            })
            .filter_map(|p| {
                p.strip_prefix(&self.root)
                    .ok()
                    .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        matches.sort();
        Ok(matches)
    }
}

/// Wraps a backend and counts how often it is asked
pub struct CountingSearch<B> {
    inner: B,
    calls: Cell<usize>,
}

impl<B> CountingSearch<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<B: SearchBackend> SearchBackend for CountingSearch<B> {
    fn search(&self, plan: &SearchPlan) -> Result<Vec<String>, SearchError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.search(plan)
    }
}

/// Build a module set from string ids
pub fn modules(ids: &[&str]) -> ModuleSet {
    ids.iter().map(|id| ModuleId::from(*id)).collect()
}

/// Whether a program can be spawned at all
pub fn has_program(name: &str) -> bool {
    std::process::Command::new(name)
        .arg("--version")
        .output()
        .is_ok()
}
