//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; operator-facing output goes
//! through the `Reporter`. `RUST_LOG` picks the filter, defaulting to `warn`.
//! `--verbose` forces `debug`, which traces every git command.

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        eprintln!("branch-ops: logging init skipped (global subscriber already set)");
    }
}
