//! Branch-operation orchestrator.
//!
//! Sequences git commands for the purge, rebase and aggregate workflows
//! against one repository and one [`BranchSet`]:
//!
//! - every operation is gated by a single confirmation; a decline runs nothing
//! - branches are processed strictly in set order, one at a time
//! - git commands are fire-and-forget; the lock state read after each rebase
//!   is the only result that steers the workflow
//! - every confirmed run finishes with the working copy on trunk
//!
//! Collaborators are injected at construction (see [`Collaborators`]) so tests
//! can swap git, the prompt and both factories for doubles.

mod aggregate;
mod purge;
mod rebase;
mod run;

#[cfg(test)]
pub(crate) mod fakes;

pub use run::{BranchOutcome, Operation, WorkflowRun};

use crate::branches::{BranchSet, BranchSetFactory, SystemBranchSetFactory};
use crate::config::{Config, render_date_tag};
use crate::error::{BranchOpsError, Result};
use crate::git::{GitCommand, GitRunner, SystemGit};
use crate::prompt::{AssumeYes, Prompt, TerminalPrompt};
use crate::report::Reporter;
use crate::repository::{Repository, RepositoryFactory, SystemRepositoryFactory};
use chrono::{Local, NaiveDate};
use std::path::Path;
use tracing::{debug, info};

/// External collaborators the orchestrator drives.
pub struct Collaborators {
    pub repositories: Box<dyn RepositoryFactory>,
    pub branches: Box<dyn BranchSetFactory>,
    pub git: Box<dyn GitRunner>,
    pub prompt: Box<dyn Prompt>,
}

impl Collaborators {
    /// Real git, real filesystem, interactive prompt unless `assume_yes`.
    pub fn system(remote: &str, assume_yes: bool) -> Self {
        let prompt: Box<dyn Prompt> = if assume_yes {
            Box::new(AssumeYes::stderr())
        } else {
            Box::new(TerminalPrompt::stdio())
        };
        Self {
            repositories: Box::new(SystemRepositoryFactory),
            branches: Box::new(SystemBranchSetFactory::new(remote)),
            git: Box::new(SystemGit),
            prompt,
        }
    }
}

/// Per-instance settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub trunk: String,
    pub remote: String,
    pub date_format: String,
    pub release_prefix: String,
    pub temp_prefix: String,
    /// Date the timestamp tag is computed from.
    pub date: NaiveDate,
}

impl OrchestratorOptions {
    /// Settings from `config`, dated today.
    pub fn from_config(config: &Config) -> Self {
        Self {
            trunk: config.trunk.clone(),
            remote: config.remote.clone(),
            date_format: config.date_format.clone(),
            release_prefix: config.release_prefix.clone(),
            temp_prefix: config.temp_prefix.clone(),
            date: Local::now().date_naive(),
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

/// Runs purge/rebase/aggregate against one repository and branch set.
pub struct Orchestrator {
    repo: Repository,
    branches: BranchSet,
    git: Box<dyn GitRunner>,
    prompt: Box<dyn Prompt>,
    out: Reporter,
    trunk: String,
    remote: String,
    release_prefix: String,
    temp_prefix: String,
    timestamp: String,
}

impl Orchestrator {
    /// Resolve the repository, load the branch set and report it.
    ///
    /// Fails with `BranchOpsError::GitError("No branches loaded!")` when the
    /// set is empty, and with `BranchOpsError::UserError` when `date_format`
    /// cannot render a date. No mutating git command has run at that point.
    pub fn new(
        location: &Path,
        raw_branches: &[String],
        collaborators: Collaborators,
        options: OrchestratorOptions,
        out: Reporter,
    ) -> Result<Self> {
        let Collaborators {
            repositories,
            branches,
            git,
            prompt,
        } = collaborators;

        let timestamp = render_date_tag(&options.date_format, options.date)?;
        let repo = repositories.open(location)?;
        let branches = branches.build(&repo, raw_branches, &options.trunk)?;

        let mut orchestrator = Self {
            repo,
            branches,
            git,
            prompt,
            out,
            trunk: options.trunk,
            remote: options.remote,
            release_prefix: options.release_prefix,
            temp_prefix: options.temp_prefix,
            timestamp,
        };
        orchestrator.print_branches()?;
        Ok(orchestrator)
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn branches(&self) -> &BranchSet {
        &self.branches
    }

    pub fn trunk(&self) -> &str {
        &self.trunk
    }

    /// Date tag fixed at construction.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// `<release_prefix>/<timestamp>`
    pub fn release_branch(&self) -> String {
        format!("{}/{}", self.release_prefix, self.timestamp)
    }

    /// `<temp_prefix>/<timestamp>`
    pub fn temp_branch(&self) -> String {
        format!("{}/{}", self.temp_prefix, self.timestamp)
    }

    fn print_branches(&mut self) -> Result<()> {
        for rejected in self.branches.rejected() {
            self.out
                .warning(&format!("Skipping '{}': {}", rejected.name, rejected.reason));
        }

        if self.branches.is_empty() {
            return Err(BranchOpsError::GitError("No branches loaded!".to_string()));
        }

        let size = self.branches.len();
        let plural = if size > 1 { "es" } else { "" };
        self.out
            .success(&format!("Successfully loaded {} branch{}:", size, plural));
        for (i, branch) in self.branches.iter().enumerate() {
            self.out.line(&format!("{:02}. {}", i + 1, branch));
        }
        self.out.line("");
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> bool {
        let accepted = self.prompt.confirm(question);
        debug!(question, accepted, "confirmation");
        accepted
    }

    /// Run one command, ignoring its outcome beyond a debug trace.
    fn exec(&self, command: GitCommand) {
        if let Err(e) = self.git.run(self.repo.path(), &command) {
            debug!(?command, error = %e, "git command failed, continuing");
        }
    }

    fn switch_to(&self, branch: &str) {
        self.exec(GitCommand::SwitchBranch(branch.to_string()));
    }

    fn pull_trunk(&self) {
        self.switch_to(&self.trunk);
        self.exec(GitCommand::Pull {
            remote: None,
            branch: None,
        });
    }

    /// Rebase the checked-out branch onto `onto`.
    ///
    /// Returns `false` when the rebase left the repository locked; the rebase
    /// has then been aborted and the conflict reported.
    fn rebase_onto(&mut self, onto: &str) -> bool {
        self.exec(GitCommand::Rebase {
            onto: onto.to_string(),
        });
        if !self.repo.is_locked(self.git.as_ref()) {
            return true;
        }
        info!(onto, "rebase left conflicts, aborting");
        self.exec(GitCommand::AbortRebase);
        self.out.error("Got conflicts, aborting rebase!");
        false
    }

    fn rebase_onto_trunk(&mut self) -> bool {
        let onto = format!("{}/{}", self.remote, self.trunk);
        self.rebase_onto(&onto)
    }

    /// Switch to trunk and force-delete local branches.
    ///
    /// `None` means every branch in the working set.
    fn remove_locals(&self, branches: Option<&[String]>) {
        self.switch_to(&self.trunk);
        let names = match branches {
            Some(names) => names.to_vec(),
            None => self.branches.names(),
        };
        for name in names {
            self.exec(GitCommand::DeleteLocalBranch { name, force: true });
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("repo", &self.repo)
            .field("branches", &self.branches)
            .field("trunk", &self.trunk)
            .field("remote", &self.remote)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}
