//! grep backend, used when ripgrep is unavailable

use std::path::Path;
use std::process::Command;

use super::{collect_matches, spawn_error, SearchError, SearchPlan, SearchTool};

/// `grep -rlE`
pub struct Grep;

impl Grep {
    pub(crate) fn args(plan: &SearchPlan) -> Vec<String> {
        let mut args: Vec<String> = vec!["-r".into(), "-l".into(), "-E".into()];
        for glob in plan.globs() {
            args.push(format!("--include={}", glob));
        }
        args.push("-e".into());
        args.push(plan.pattern.clone());
        args.push("--".into());
        args.extend(plan.roots.iter().cloned());
        args
    }
}

impl SearchTool for Grep {
    fn name(&self) -> &'static str {
        "grep"
    }

    fn run(&self, project: &Path, plan: &SearchPlan) -> Result<Vec<String>, SearchError> {
        let _span = tracing::debug_span!("grep", pattern = %plan.pattern).entered();
        let output = Command::new("grep")
            .args(Self::args(plan))
            .current_dir(project)
            .output()
            .map_err(|e| spawn_error("grep", e))?;
        collect_matches("grep", output)
    }
}
