//! Configuration file support for affected
//!
//! Config files are loaded in order (later overrides earlier):
//! 1. `~/.config/affected/config.toml` (user defaults)
//! 2. `.affected.toml` in project root (project overrides)
//!
//! CLI flags override all config file values.

use serde::Deserialize;
use std::path::Path;

/// Project-level config file name
pub const PROJECT_CONFIG: &str = ".affected.toml";

/// Test runner for the primary (Clojure) variant
///
/// Invoked as `command <selector> <focus_flag> <ns> <focus_flag> <ns> ...`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrimaryConfig {
    /// Runner command line (split with shell quoting rules)
    pub command: Option<String>,
    /// Flag placed before every test namespace
    pub focus_flag: Option<String>,
    /// Selectors this runner understands
    pub selectors: Option<Vec<String>>,
}

impl PrimaryConfig {
    pub const DEFAULT_COMMAND: &'static str = "bin/kaocha";
    pub const DEFAULT_FOCUS_FLAG: &'static str = "--focus";

    pub fn command_or_default(&self) -> &str {
        self.command.as_deref().unwrap_or(Self::DEFAULT_COMMAND)
    }

    pub fn focus_flag_or_default(&self) -> &str {
        self.focus_flag.as_deref().unwrap_or(Self::DEFAULT_FOCUS_FLAG)
    }

    pub fn supports(&self, selector: &str) -> bool {
        match &self.selectors {
            Some(list) => list.iter().any(|s| s == selector),
            None => ["unit", "integration"].contains(&selector),
        }
    }

    fn override_with(self, other: Self) -> Self {
        Self {
            command: other.command.or(self.command),
            focus_flag: other.focus_flag.or(self.focus_flag),
            selectors: other.selectors.or(self.selectors),
        }
    }
}

/// Compiler + runner for the secondary (ClojureScript) variant
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecondaryConfig {
    /// Build configuration file, relative to the project root
    pub build_config: Option<String>,
    /// Key whose string value scopes the test build to a namespace regex
    pub pattern_key: Option<String>,
    /// Compile command
    pub compile: Option<String>,
    /// Runner command, executed only if compilation succeeds
    pub run: Option<String>,
    /// Selectors this toolchain understands
    pub selectors: Option<Vec<String>>,
}

impl SecondaryConfig {
    pub const DEFAULT_BUILD_CONFIG: &'static str = "shadow-cljs.edn";
    pub const DEFAULT_PATTERN_KEY: &'static str = ":ns-regexp";
    pub const DEFAULT_COMPILE: &'static str = "npx shadow-cljs compile test";
    pub const DEFAULT_RUN: &'static str = "npx karma start --single-run";

    pub fn build_config_or_default(&self) -> &str {
        self.build_config
            .as_deref()
            .unwrap_or(Self::DEFAULT_BUILD_CONFIG)
    }

    pub fn pattern_key_or_default(&self) -> &str {
        self.pattern_key.as_deref().unwrap_or(Self::DEFAULT_PATTERN_KEY)
    }

    pub fn compile_or_default(&self) -> &str {
        self.compile.as_deref().unwrap_or(Self::DEFAULT_COMPILE)
    }

    pub fn run_or_default(&self) -> &str {
        self.run.as_deref().unwrap_or(Self::DEFAULT_RUN)
    }

    pub fn supports(&self, selector: &str) -> bool {
        match &self.selectors {
            Some(list) => list.iter().any(|s| s == selector),
            None => selector == "unit",
        }
    }

    fn override_with(self, other: Self) -> Self {
        Self {
            build_config: other.build_config.or(self.build_config),
            pattern_key: other.pattern_key.or(self.pattern_key),
            compile: other.compile.or(self.compile),
            run: other.run.or(self.run),
            selectors: other.selectors.or(self.selectors),
        }
    }
}

/// Configuration options loaded from config files
///
/// # Example
///
/// ```toml
/// # ~/.config/affected/config.toml or .affected.toml
/// base = "origin/main"   # Revision to diff against
///
/// [primary]
/// command = "clojure -M:test"
/// focus_flag = "--focus"
/// selectors = ["unit", "integration"]
///
/// [secondary]
/// build_config = "shadow-cljs.edn"
/// pattern_key = ":ns-regexp"
/// compile = "npx shadow-cljs compile test"
/// run = "npx karma start --single-run"
/// selectors = ["unit"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Revision the working tree is compared against (overridden by --base)
    pub base: Option<String>,
    pub primary: PrimaryConfig,
    pub secondary: SecondaryConfig,
}

impl Config {
    /// Default revision to diff against
    pub const DEFAULT_BASE: &'static str = "HEAD";

    /// Load configuration from user and project config files
    pub fn load(project_root: &Path) -> Self {
        let user_config = dirs::config_dir()
            .map(|d| d.join("affected/config.toml"))
            .and_then(|p| Self::load_file(&p))
            .unwrap_or_default();

        let project_config =
            Self::load_file(&project_root.join(PROJECT_CONFIG)).unwrap_or_default();

        // Project overrides user
        let merged = user_config.override_with(project_config);
        tracing::debug!(
            base = ?merged.base,
            primary = ?merged.primary,
            secondary = ?merged.secondary,
            "Effective config after merge"
        );
        merged
    }

    /// Load configuration from a specific file
    fn load_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return None;
            }
        };

        match toml::from_str::<Self>(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), base = ?config.base, "Loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Layer another config on top (other overrides self where present)
    fn override_with(self, other: Self) -> Self {
        Config {
            base: other.base.or(self.base),
            primary: self.primary.override_with(other.primary),
            secondary: self.secondary.override_with(other.secondary),
        }
    }

    /// Base revision with default fallback
    pub fn base_or_default(&self) -> &str {
        self.base.as_deref().unwrap_or(Self::DEFAULT_BASE)
    }
}
