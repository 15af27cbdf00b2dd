//! Error types for the branch-ops CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for branch-ops operations.
///
/// Only hard stops live here. A declined confirmation and a per-branch
/// rebase conflict are outcomes, not errors.
#[derive(Error, Debug)]
pub enum BranchOpsError {
    /// User provided invalid arguments or the environment is unusable.
    #[error("{0}")]
    UserError(String),

    /// Git-level configuration failure (e.g. no branches loaded).
    #[error("{0}")]
    GitError(String),

    /// An aggregate run hit a conflict and was rolled back.
    #[error("Aggregation aborted: branch '{branch}' conflicts, {release} was removed")]
    AggregateConflict { branch: String, release: String },
}

impl BranchOpsError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            BranchOpsError::UserError(_) => exit_codes::USER_ERROR,
            BranchOpsError::GitError(_) => exit_codes::GIT_FAILURE,
            BranchOpsError::AggregateConflict { .. } => exit_codes::GIT_FAILURE,
        }
    }
}

/// Result type alias for branch-ops operations.
pub type Result<T> = std::result::Result<T, BranchOpsError>;
