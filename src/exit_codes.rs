//! Exit code constants for the branch-ops CLI.
//!
//! - 0: Success (a declined confirmation is a success)
//! - 1: User error (bad args, unreadable input, invalid config, not a repository)
//! - 3: Git failure (no branches loaded, aggregate aborted on conflict)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or an invalid repository path.
pub const USER_ERROR: i32 = 1;

/// Git failure: empty branch set or an aggregate run aborted by a conflict.
pub const GIT_FAILURE: i32 = 3;
