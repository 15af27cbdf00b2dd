//! Merge every branch into one dated release branch.

use super::{BranchOutcome, Operation, Orchestrator, WorkflowRun};
use crate::branches::Branch;
use crate::error::{BranchOpsError, Result};
use crate::git::GitCommand;

impl Orchestrator {
    /// Build `<release_prefix>/<timestamp>` from trunk plus every branch.
    ///
    /// Each branch is copied into `<temp_prefix>/<timestamp>` from its remote
    /// tip, rebased onto trunk, then onto the release branch, and merged.
    /// All or nothing: the first conflict removes both scratch branches and
    /// returns `BranchOpsError::AggregateConflict`.
    pub fn aggregate(&mut self) -> Result<WorkflowRun> {
        let temp = self.temp_branch();
        let release = self.release_branch();

        if !self.confirm(&format!("Aggregate branches into {}", release)) {
            return Ok(WorkflowRun::declined(Operation::Aggregate));
        }

        let mut run = WorkflowRun::accepted(Operation::Aggregate);
        self.pull_trunk();
        self.exec(GitCommand::CreateBranch {
            name: release.clone(),
            from: None,
            no_track: false,
        });

        let branches: Vec<_> = self.branches.iter().cloned().collect();
        for branch in &branches {
            self.out.warning(&format!("Merging branch: {}", branch));
            self.exec(GitCommand::CreateBranch {
                name: temp.clone(),
                from: Some(format!("{}/{}", self.remote, branch)),
                no_track: true,
            });

            if !self.rebase_onto_trunk() || !self.rebase_onto(&release) {
                return Err(self.abort_aggregate(branch, &temp, &release));
            }

            self.switch_to(&release);
            self.exec(GitCommand::Merge(temp.clone()));
            self.exec(GitCommand::DeleteLocalBranch {
                name: temp.clone(),
                force: true,
            });
            run.record(branch, BranchOutcome::Merged);
        }

        self.switch_to(&self.trunk);
        self.out.success(&format!("{} branch created", release));
        Ok(run)
    }

    fn abort_aggregate(&mut self, branch: &Branch, temp: &str, release: &str) -> BranchOpsError {
        self.remove_locals(Some(&[temp.to_string(), release.to_string()]));
        self.out
            .error(&format!("Aggregation aborted, {} was removed", release));
        BranchOpsError::AggregateConflict {
            branch: branch.name().to_string(),
            release: release.to_string(),
        }
    }
}
