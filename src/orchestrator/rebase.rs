//! Rebase every branch onto trunk and force-push the clean ones.

use super::{BranchOutcome, Operation, Orchestrator, WorkflowRun};
use crate::git::GitCommand;

impl Orchestrator {
    /// Rebase each branch onto `<remote>/<trunk>`.
    ///
    /// A clean rebase is force-pushed. A conflicting one is aborted, reported
    /// and skipped; the loop carries on. Local copies of every branch are
    /// deleted at the end, leaving the working copy on trunk.
    pub fn rebase(&mut self) -> WorkflowRun {
        let question = format!("Proceed rebasing these branches with {}", self.trunk);
        if !self.confirm(&question) {
            return WorkflowRun::declined(Operation::Rebase);
        }

        let mut run = WorkflowRun::accepted(Operation::Rebase);
        self.pull_trunk();

        let branches: Vec<_> = self.branches.iter().cloned().collect();
        for branch in &branches {
            self.out.warning(&format!("Rebasing branch: {}", branch));
            self.switch_to(branch.name());
            self.exec(GitCommand::Pull {
                remote: Some(self.remote.clone()),
                branch: Some(branch.name().to_string()),
            });

            if !self.rebase_onto_trunk() {
                run.record(branch, BranchOutcome::Conflicted);
                continue;
            }

            self.exec(GitCommand::ForcePush {
                remote: self.remote.clone(),
                branch: branch.name().to_string(),
            });
            self.out.success("Rebased successfully!");
            run.record(branch, BranchOutcome::Rebased);
        }

        self.remove_locals(None);
        run
    }
}
