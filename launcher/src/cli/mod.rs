mod types;

pub use types::{LaunchArgs, SetupCli, SetupCmd};

use std::process::ExitCode;

/// Print a clap parse failure and map it to an exit code.
///
/// `--help` goes to stdout with status 0. Any other parse error prints the
/// usage to stderr and exits 1.
pub fn parse_failure(err: &clap::Error) -> ExitCode {
    // A closed stdout/stderr leaves nowhere to report to; the exit code
    // still carries the outcome.
    if let Err(io_err) = err.print() {
        log::debug!("failed to print usage: {io_err}");
    }
    if err.use_stderr() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
