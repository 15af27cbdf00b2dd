//! branch-ops: confirmed purge, rebase and aggregate workflows for git branches.
//!
//! This is the main entry point for the `branch-ops` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod cli;
mod commands;
pub mod branches;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod logging;
pub mod orchestrator;
pub mod prompt;
pub mod report;
pub mod repository;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
