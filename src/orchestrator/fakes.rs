//! Test doubles for the orchestrator's collaborators.

use super::{Collaborators, Orchestrator, OrchestratorOptions};
use crate::branches::{BranchSet, BranchSetFactory};
use crate::config::Config;
use crate::error::{BranchOpsError, Result};
use crate::git::{GitCommand, GitOutput, GitRunner};
use crate::prompt::scripted::ScriptedPrompt;
use crate::report::Reporter;
use crate::report::capture::SharedBuffer;
use crate::repository::{Repository, RepositoryFactory};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

#[derive(Default)]
struct FakeGitState {
    log: Vec<GitCommand>,
    /// Branches whose rebases leave the repository locked.
    conflicts: HashSet<String>,
    /// Refs that `VerifyRef` resolves.
    refs: HashSet<String>,
    /// Every command except `VerifyRef` fails.
    failing: bool,
    /// Branch whose content is checked out, by source name.
    current: String,
    locked: bool,
}

/// Records commands and simulates lock state per branch.
#[derive(Clone, Default)]
pub(crate) struct FakeGit(Rc<RefCell<FakeGitState>>);

impl FakeGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rebasing `branch` (or a temp branch created from it) conflicts.
    pub(crate) fn conflicting(self, branch: &str) -> Self {
        self.0.borrow_mut().conflicts.insert(branch.to_string());
        self
    }

    /// `reference` resolves, e.g. `refs/remotes/origin/feature/a`.
    pub(crate) fn with_ref(self, reference: &str) -> Self {
        self.0.borrow_mut().refs.insert(reference.to_string());
        self
    }

    pub(crate) fn failing(self) -> Self {
        self.0.borrow_mut().failing = true;
        self
    }

    pub(crate) fn log(&self) -> Vec<GitCommand> {
        self.0.borrow().log.clone()
    }

    /// Rendered `git ...` lines, for readable assertions.
    pub(crate) fn commands(&self) -> Vec<String> {
        self.log()
            .iter()
            .map(|c| format!("git {}", c.args().join(" ")))
            .collect()
    }

    pub(crate) fn is_locked_now(&self) -> bool {
        self.0.borrow().locked
    }

    pub(crate) fn count(&self, predicate: impl Fn(&GitCommand) -> bool) -> usize {
        self.log().iter().filter(|c| predicate(c)).count()
    }
}

impl GitRunner for FakeGit {
    fn run(&self, _repo: &Path, command: &GitCommand) -> Result<GitOutput> {
        let mut state = self.0.borrow_mut();
        state.log.push(command.clone());

        match command {
            GitCommand::VerifyRef(reference) => {
                return if state.refs.contains(reference) {
                    Ok(GitOutput::default())
                } else {
                    Err(BranchOpsError::GitError(format!("unknown ref {}", reference)))
                };
            }
            GitCommand::SwitchBranch(name) => state.current = name.clone(),
            GitCommand::CreateBranch {
                from: Some(from),
                no_track: true,
                ..
            } => {
                state.current = from.split_once('/').map_or(from.clone(), |(_, b)| b.to_string());
            }
            GitCommand::Rebase { .. } => {
                if state.conflicts.contains(&state.current) {
                    state.locked = true;
                }
            }
            GitCommand::AbortRebase => state.locked = false,
            _ => {}
        }

        if state.failing {
            Err(BranchOpsError::GitError("simulated failure".to_string()))
        } else {
            Ok(GitOutput::default())
        }
    }

    fn is_locked(&self, _repo: &Path) -> bool {
        self.0.borrow().locked
    }
}

/// Returns the raw names as the set, untouched.
#[derive(Clone, Default)]
pub(crate) struct FakeBranches {
    calls: Rc<RefCell<usize>>,
}

impl FakeBranches {
    pub(crate) fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl BranchSetFactory for FakeBranches {
    fn build(&self, _repo: &Repository, raw: &[String], _trunk: &str) -> Result<BranchSet> {
        *self.calls.borrow_mut() += 1;
        Ok(BranchSet::from_names(raw.iter().cloned()))
    }
}

/// Accepts any location as-is, or refuses every one.
#[derive(Clone, Copy, Default)]
pub(crate) struct FakeRepositories {
    pub(crate) refuse: bool,
}

impl RepositoryFactory for FakeRepositories {
    fn open(&self, location: &Path) -> Result<Repository> {
        if self.refuse {
            Err(BranchOpsError::UserError(format!(
                "'{}' is not inside a git repository",
                location.display()
            )))
        } else {
            Ok(Repository::new(location))
        }
    }
}

/// Everything a test needs to build and inspect an orchestrator.
pub(crate) struct Harness {
    pub(crate) git: FakeGit,
    pub(crate) prompt: ScriptedPrompt,
    pub(crate) branches: FakeBranches,
    pub(crate) repositories: FakeRepositories,
    pub(crate) output: SharedBuffer,
    pub(crate) options: OrchestratorOptions,
}

impl Harness {
    pub(crate) fn new(git: FakeGit, answers: &[bool]) -> Self {
        Self {
            git,
            prompt: ScriptedPrompt::answering(answers),
            branches: FakeBranches::default(),
            repositories: FakeRepositories::default(),
            output: SharedBuffer::default(),
            options: OrchestratorOptions::from_config(&Config::default())
                .on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        }
    }

    pub(crate) fn build(&self, names: &[&str]) -> Result<Orchestrator> {
        let raw: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        Orchestrator::new(
            Path::new("/work/repo"),
            &raw,
            Collaborators {
                repositories: Box::new(self.repositories),
                branches: Box::new(self.branches.clone()),
                git: Box::new(self.git.clone()),
                prompt: Box::new(self.prompt.clone()),
            },
            self.options.clone(),
            Reporter::new(self.output.clone()),
        )
    }
}
