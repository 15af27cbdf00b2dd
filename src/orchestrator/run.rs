//! Per-invocation record of what an operation did.

use crate::branches::Branch;
use std::fmt;

/// The three branch workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Purge,
    Rebase,
    Aggregate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Purge => "purge",
            Operation::Rebase => "rebase",
            Operation::Aggregate => "aggregate",
        })
    }
}

/// What happened to one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Local and remote deletion were attempted.
    Removed,
    /// Rebased cleanly and force-pushed.
    Rebased,
    /// Rebase hit conflicts and was aborted; nothing was pushed.
    Conflicted,
    /// Merged into the release branch.
    Merged,
}

/// Result of one operation call. Lives only as long as the caller keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub operation: Operation,
    /// Whether the operator accepted the confirmation prompt.
    pub confirmed: bool,
    /// Processed branches in set order.
    pub outcomes: Vec<(Branch, BranchOutcome)>,
}

impl WorkflowRun {
    pub(crate) fn accepted(operation: Operation) -> Self {
        Self {
            operation,
            confirmed: true,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn declined(operation: Operation) -> Self {
        Self {
            operation,
            confirmed: false,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, branch: &Branch, outcome: BranchOutcome) {
        self.outcomes.push((branch.clone(), outcome));
    }

    /// Branches that ended with `outcome`, in set order.
    pub fn with_outcome(&self, outcome: BranchOutcome) -> Vec<&Branch> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == outcome)
            .map(|(b, _)| b)
            .collect()
    }
}
