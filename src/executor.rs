//! Test executors
//!
//! The primary variant hands the selected namespaces straight to its runner.
//! The secondary variant compiles a browser bundle first, scoped through the
//! build configuration, then runs it.

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

use crate::build_config::{namespace_pattern, BuildConfigError, BuildConfigPatch};
use crate::config::{PrimaryConfig, SecondaryConfig};
use crate::module::ModuleId;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Empty command line")]
    EmptyCommand,
    #[error("Invalid command line '{command}': {source}")]
    Parse {
        command: String,
        #[source]
        source: shell_words::ParseError,
    },
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    BuildConfig(#[from] BuildConfigError),
}

/// Split a configured command string into program + arguments.
pub fn split_command(command: &str) -> Result<(String, Vec<String>), ExecutorError> {
    let mut words = shell_words::split(command).map_err(|source| ExecutorError::Parse {
        command: command.to_string(),
        source,
    })?;
    if words.is_empty() {
        return Err(ExecutorError::EmptyCommand);
    }
    let program = words.remove(0);
    Ok((program, words))
}

/// Argument list for the primary runner: `<selector> <flag> <ns> <flag> <ns> ...`
pub fn primary_args(config: &PrimaryConfig, selector: &str, tests: &[ModuleId]) -> Vec<String> {
    let flag = config.focus_flag_or_default();
    let mut args = Vec::with_capacity(1 + tests.len() * 2);
    args.push(selector.to_string());
    for test in tests {
        if !flag.is_empty() {
            args.push(flag.to_string());
        }
        args.push(test.to_string());
    }
    args
}

/// Spawn and wait, inheriting stdio so the runner's output reaches the user.
fn run_command(
    project: &Path,
    command: &str,
    extra_args: &[String],
) -> Result<ExitStatus, ExecutorError> {
    let (program, mut args) = split_command(command)?;
    args.extend_from_slice(extra_args);
    tracing::info!(program = %program, args = ?args, "Running");
    Command::new(&program)
        .args(&args)
        .current_dir(project)
        .status()
        .map_err(|source| ExecutorError::Spawn { program, source })
}

/// Run the primary runner on the selected test namespaces.
pub fn run_primary(
    project: &Path,
    config: &PrimaryConfig,
    selector: &str,
    tests: &[ModuleId],
) -> Result<ExitStatus, ExecutorError> {
    let _span = tracing::info_span!("run_primary", selector, tests = tests.len()).entered();
    run_command(
        project,
        config.command_or_default(),
        &primary_args(config, selector, tests),
    )
}

/// Scope the build to `tests`, compile, run, and restore the build file.
///
/// The runner is skipped when compilation fails; the compiler's status is
/// returned instead. The build file is restored on every path out of this
/// function, including errors.
pub fn run_secondary(
    project: &Path,
    config: &SecondaryConfig,
    tests: &[ModuleId],
) -> Result<ExitStatus, ExecutorError> {
    let _span = tracing::info_span!("run_secondary", tests = tests.len()).entered();

    let build_file = project.join(config.build_config_or_default());
    let patch = BuildConfigPatch::apply(
        &build_file,
        config.pattern_key_or_default(),
        &namespace_pattern(tests),
    )?;

    let status = run_command(project, config.compile_or_default(), &[])?;
    let status = if status.success() {
        run_command(project, config.run_or_default(), &[])?
    } else {
        tracing::warn!(%status, "Compilation failed, skipping runner");
        status
    };

    patch.restore()?;
    Ok(status)
}
