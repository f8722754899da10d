//! ripgrep backend
//!
//! `--no-ignore --hidden` makes rg see the same files grep does; without them
//! gitignored or dot-prefixed sources would drop out only when rg is used.

use std::path::Path;
use std::process::Command;

use super::{collect_matches, spawn_error, SearchError, SearchPlan, SearchTool};

/// `rg --files-with-matches`
pub struct Ripgrep;

impl Ripgrep {
    pub(crate) fn args(plan: &SearchPlan) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--files-with-matches".into(),
            "--no-messages".into(),
            "--color".into(),
            "never".into(),
            "--case-sensitive".into(),
            "--no-ignore".into(),
            "--hidden".into(),
        ];
        for glob in plan.globs() {
            args.push("-g".into());
            args.push(glob);
        }
        args.push("-e".into());
        args.push(plan.pattern.clone());
        args.push("--".into());
        args.extend(plan.roots.iter().cloned());
        args
    }
}

impl SearchTool for Ripgrep {
    fn name(&self) -> &'static str {
        "rg"
    }

    fn run(&self, project: &Path, plan: &SearchPlan) -> Result<Vec<String>, SearchError> {
        let _span = tracing::debug_span!("rg", pattern = %plan.pattern).entered();
        let output = Command::new("rg")
            .args(Self::args(plan))
            .current_dir(project)
            .output()
            .map_err(|e| spawn_error("rg", e))?;
        collect_matches("rg", output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_layout() {
        let plan = SearchPlan::new(
            r"\[app\.core",
            vec!["src/clj".into(), "test/clj".into()],
            &["clj", "cljc"],
        );
        let args = Ripgrep::args(&plan);
        assert_eq!(
            args,
            vec![
                "--files-with-matches",
                "--no-messages",
                "--color",
                "never",
                "--case-sensitive",
                "--no-ignore",
                "--hidden",
                "-g",
                "*.clj",
                "-g",
                "*.cljc",
                "-e",
                r"\[app\.core",
                "--",
                "src/clj",
                "test/clj",
            ]
        );
    }
}
