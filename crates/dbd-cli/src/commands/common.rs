//! Shared utilities for CLI commands

use dbd_core::ChangeScript;
use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main prints nothing for it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Print one line per script, prefixed with `marker`
pub(crate) fn print_scripts(marker: &str, scripts: &[ChangeScript]) {
    for script in scripts {
        println!("  {marker} {script}");
    }
}

/// `"1 change script"` / `"3 change scripts"`
pub(crate) fn plural_scripts(count: usize) -> String {
    if count == 1 {
        "1 change script".to_string()
    } else {
        format!("{count} change scripts")
    }
}
