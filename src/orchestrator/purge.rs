//! Bulk deletion of branches, locally and on the remote.

use super::{BranchOutcome, Operation, Orchestrator, WorkflowRun};
use crate::git::GitCommand;

impl Orchestrator {
    /// Delete every branch in the set, locally and on the remote.
    ///
    /// The local copy is force-deleted only when `<remote>/<branch>` still
    /// resolves; the remote deletion is always attempted. Each step is best
    /// effort and never stops the loop.
    pub fn purge(&mut self) -> WorkflowRun {
        if !self.confirm("Proceed removing these branches") {
            return WorkflowRun::declined(Operation::Purge);
        }

        let mut run = WorkflowRun::accepted(Operation::Purge);
        self.pull_trunk();

        let branches: Vec<_> = self.branches.iter().cloned().collect();
        for branch in &branches {
            self.out.warning(&format!("Removing branch: {}", branch));

            if branch.exists_on_remote(&self.repo, self.git.as_ref(), &self.remote) {
                self.exec(GitCommand::DeleteLocalBranch {
                    name: branch.name().to_string(),
                    force: true,
                });
            }
            self.exec(GitCommand::DeleteRemoteBranch {
                remote: self.remote.clone(),
                name: branch.name().to_string(),
            });

            run.record(branch, BranchOutcome::Removed);
        }

        run
    }
}
