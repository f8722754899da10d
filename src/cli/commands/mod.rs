//! CLI command handlers
//!
//! Each submodule handles one CLI command.

mod dependents;
mod run;

pub(crate) use dependents::cmd_dependents;
pub(crate) use run::cmd_run;
