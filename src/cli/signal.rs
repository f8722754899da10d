//! Signal handling for graceful shutdown
//!
//! Provides Ctrl+C handling with two-phase shutdown:
//! - First Ctrl+C: the running test command receives it too and exits; we
//!   restore the build config and skip the remaining variants
//! - Second Ctrl+C: Force exit with code 130, possibly leaving the build
//!   config patched

use std::sync::atomic::{AtomicBool, Ordering};

/// Exit codes for CLI commands
#[repr(i32)]
pub enum ExitCode {
    /// User interrupted with Ctrl+C twice
    Interrupted = 130,
}

/// Global flag indicating user requested interruption
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install Ctrl+C handler for graceful shutdown
pub fn setup_signal_handler() {
    if let Err(e) = ctrlc::set_handler(|| {
        if INTERRUPTED.swap(true, Ordering::AcqRel) {
            eprintln!(
                "\nForced exit. The ClojureScript build config may still be patched; \
                 restore it with 'git checkout -- <build config>'."
            );
            std::process::exit(ExitCode::Interrupted as i32);
        }
        eprintln!("\nInterrupted. Waiting for the running command to exit...");
    }) {
        eprintln!("Warning: Failed to set Ctrl+C handler: {e}");
    }
}

/// Check if user requested interruption via Ctrl+C
pub fn check_interrupted() -> bool {
    INTERRUPTED.load(Ordering::Acquire)
}
