//! Command-line layer: argument parsing, config merging, console output.
//!
//! Kept apart from `core` so the engine can be used as a library.

use anyhow::Result;

pub mod args;
pub mod exit_status;
pub mod report;
pub mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let summary = run::run(args)?;

    Ok(if summary.has_failures() {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    })
}
